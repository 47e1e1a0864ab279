use crate::detection::rolling::RollingWindow;
use crate::math::stats::StatsHelper;
use crate::prelude::{CoreResult, FlinchConfig};
use crate::sensor::GyroReading;

#[derive(Debug, Clone, Copy)]
struct TimedGyro {
    timestamp: u64,
    reading: GyroReading,
}

/// Looks back from a shot for anticipatory bracing movement.
///
/// The history is capped by sample count, not time: 30 samples cover roughly
/// the last half second at 60 Hz.
pub struct FlinchDetector {
    config: FlinchConfig,
    history: RollingWindow<TimedGyro>,
}

impl FlinchDetector {
    pub fn new(config: FlinchConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            history: RollingWindow::with_capacity(config.history),
            config,
        })
    }

    /// Returns `false` when the sample was malformed and dropped.
    pub fn add_gyro_sample(&mut self, timestamp: u64, x: f32, y: f32, z: f32) -> bool {
        let reading = GyroReading::new(x, y, z);
        if !reading.is_finite() {
            return false;
        }
        self.history.push(TimedGyro { timestamp, reading });
        true
    }

    /// Mean magnitude over the pre-shot window, or `None` below the evidence floor.
    pub fn window_magnitude(&self, shot_timestamp: u64) -> Option<f32> {
        let window_ms = self.config.window_ms;
        let magnitudes: Vec<f32> = self
            .history
            .iter()
            .filter(|sample| {
                sample.timestamp < shot_timestamp && shot_timestamp - sample.timestamp < window_ms
            })
            .map(|sample| sample.reading.magnitude())
            .collect();

        if magnitudes.len() < self.config.min_samples {
            return None;
        }
        Some(StatsHelper::mean(magnitudes))
    }

    pub fn detect_flinch(&self, shot_timestamp: u64) -> bool {
        self.window_magnitude(shot_timestamp)
            .is_some_and(|magnitude| magnitude > self.config.threshold)
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn reset(&mut self) {
        self.history.reset();
    }
}
