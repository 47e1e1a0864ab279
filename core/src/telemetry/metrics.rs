use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Counters accumulated over a drill session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub audio_samples: usize,
    pub gyro_samples: usize,
    pub rejected_samples: usize,
    pub shots: usize,
    pub flinches: usize,
}

pub struct MetricsRecorder {
    inner: Mutex<MetricsSnapshot>,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MetricsSnapshot::default()),
        }
    }

    pub fn record_audio(&self) {
        self.update(|m| m.audio_samples += 1);
    }

    pub fn record_gyro(&self) {
        self.update(|m| m.gyro_samples += 1);
    }

    pub fn record_rejected(&self) {
        self.update(|m| m.rejected_samples += 1);
    }

    pub fn record_shot(&self, flinch: bool) {
        self.update(|m| {
            m.shots += 1;
            if flinch {
                m.flinches += 1;
            }
        });
    }

    pub fn reset(&self) {
        self.update(|m| *m = MetricsSnapshot::default());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            MetricsSnapshot::default()
        }
    }

    fn update(&self, apply: impl FnOnce(&mut MetricsSnapshot)) {
        if let Ok(mut metrics) = self.inner.lock() {
            apply(&mut *metrics);
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
