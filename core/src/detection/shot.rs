use crate::detection::rolling::RollingWindow;
use crate::math::stats::StatsHelper;
use crate::prelude::{CoreResult, DetectorConfig};
use crate::sensor::{DetectionMethod, ShotEvent};
use crate::telemetry::log::SessionLog;

/// Turns audio-level and gyroscope streams into debounced shot events.
///
/// Both channels share one debounce clock, so a bang and its recoil landing
/// inside the same debounce span count as a single shot.
pub struct ShotDetector {
    config: DetectorConfig,
    audio_levels: RollingWindow<f32>,
    last_shot: Option<u64>,
    monitoring: bool,
    logger: SessionLog,
}

impl ShotDetector {
    pub fn new(config: DetectorConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            audio_levels: RollingWindow::with_capacity(config.baseline_window),
            config,
            last_shot: None,
            monitoring: false,
            logger: SessionLog::new("shot-detector"),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn start_monitoring(&mut self) {
        if !self.monitoring {
            self.monitoring = true;
            self.logger.record("monitoring started");
        }
    }

    pub fn stop_monitoring(&mut self) {
        if self.monitoring {
            self.monitoring = false;
            self.logger.record("monitoring stopped");
        }
    }

    pub fn is_monitoring(&self) -> bool {
        self.monitoring
    }

    /// Clears the debounce clock and audio baseline; the monitoring state is kept.
    pub fn reset(&mut self) {
        self.last_shot = None;
        self.audio_levels.reset();
    }

    pub fn last_shot_timestamp(&self) -> Option<u64> {
        self.last_shot
    }

    /// Mean of the buffered audio levels.
    pub fn baseline(&self) -> f32 {
        StatsHelper::mean(self.audio_levels.iter().copied())
    }

    pub fn process_audio_level(&mut self, timestamp: u64, level: f32) -> Option<ShotEvent> {
        let confidence = self.audio_trigger(level)?;
        self.accept(ShotEvent::new(timestamp, confidence, DetectionMethod::Audio))
    }

    pub fn process_gyro_data(&mut self, timestamp: u64, x: f32, y: f32, z: f32) -> Option<ShotEvent> {
        let confidence = self.gyro_trigger(x, y, z)?;
        self.accept(ShotEvent::new(timestamp, confidence, DetectionMethod::Gyro))
    }

    /// Merges the two channels' views of one shot.
    pub fn combine_detections(
        audio: Option<ShotEvent>,
        gyro: Option<ShotEvent>,
    ) -> Option<ShotEvent> {
        match (audio, gyro) {
            (Some(audio), Some(gyro)) => Some(ShotEvent::new(
                audio.timestamp,
                (audio.confidence + gyro.confidence) / 2.0,
                DetectionMethod::Combined,
            )),
            (Some(event), None) | (None, Some(event)) => Some(event),
            (None, None) => None,
        }
    }

    /// Feeds the baseline and reports a trigger confidence, ignoring the debounce clock.
    pub(crate) fn audio_trigger(&mut self, level: f32) -> Option<f32> {
        if !self.monitoring {
            return None;
        }
        let Some(level) = StatsHelper::unit(level) else {
            self.logger.trace_sample("ignored non-finite audio level");
            return None;
        };

        self.audio_levels.push(level);
        let baseline = self.baseline();
        let threshold = self.config.audio_threshold;

        (level > baseline * self.config.baseline_ratio && level > threshold)
            .then(|| (level / threshold).min(1.0))
    }

    pub(crate) fn gyro_trigger(&self, x: f32, y: f32, z: f32) -> Option<f32> {
        if !self.monitoring {
            return None;
        }
        let magnitude = StatsHelper::magnitude(x, y, z);
        if !magnitude.is_finite() {
            self.logger.trace_sample("ignored non-finite gyro sample");
            return None;
        }

        (magnitude > self.config.gyro_threshold)
            .then(|| (magnitude / self.config.gyro_full_scale).min(1.0))
    }

    /// Applies the shared debounce clock and advances it on acceptance.
    pub(crate) fn accept(&mut self, event: ShotEvent) -> Option<ShotEvent> {
        if let Some(last) = self.last_shot {
            if event.timestamp.saturating_sub(last) < self.config.debounce_ms {
                self.logger.trace_sample(&format!(
                    "debounced {:?} trigger at {}ms",
                    event.method, event.timestamp
                ));
                return None;
            }
        }
        self.last_shot = Some(event.timestamp);
        Some(event)
    }
}
