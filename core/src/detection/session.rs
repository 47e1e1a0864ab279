use crate::detection::flinch::FlinchDetector;
use crate::detection::shot::ShotDetector;
use crate::prelude::{CoreError, CoreResult, DetectorConfig, FlinchConfig};
use crate::scoring::{DrillRun, TargetZoneTally};
use crate::sensor::{DetectionMethod, SensorReading, SensorSample, ShotEvent, ShotRecord};
use crate::telemetry::{MetricsRecorder, MetricsSnapshot, SessionLog};
use serde::{Deserialize, Serialize};

/// How triggers from the audio and gyro channels are turned into shots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FusionPolicy {
    /// Each channel emits on its own; the shared debounce clock merges overlaps.
    #[default]
    SharedDebounce,
    /// The first trigger is held for `window_ms` waiting for the other channel.
    Correlated { window_ms: u64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub detector: DetectorConfig,
    pub flinch: FlinchConfig,
    pub fusion: FusionPolicy,
}

impl SessionConfig {
    pub fn validate(&self) -> CoreResult<()> {
        self.detector.validate()?;
        self.flinch.validate()?;
        if let FusionPolicy::Correlated { window_ms } = self.fusion {
            if window_ms == 0 || window_ms >= self.detector.debounce_ms {
                return Err(CoreError::InvalidConfig(format!(
                    "correlation window {}ms must be non-zero and shorter than the {}ms debounce",
                    window_ms, self.detector.debounce_ms
                )));
            }
        }
        Ok(())
    }
}

/// Owns the detectors for one drill and records accepted shots.
pub struct DrillSession {
    detector: ShotDetector,
    flinch: FlinchDetector,
    fusion: FusionPolicy,
    pending: Option<ShotEvent>,
    started_at: Option<u64>,
    shots: Vec<ShotRecord>,
    metrics: MetricsRecorder,
    logger: SessionLog,
}

impl DrillSession {
    pub fn new(config: SessionConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            detector: ShotDetector::new(config.detector)?,
            flinch: FlinchDetector::new(config.flinch)?,
            fusion: config.fusion,
            pending: None,
            started_at: None,
            shots: Vec::new(),
            metrics: MetricsRecorder::new(),
            logger: SessionLog::new("session"),
        })
    }

    pub fn start(&mut self, timestamp: u64) {
        self.detector.reset();
        self.flinch.reset();
        self.metrics.reset();
        self.shots.clear();
        self.pending = None;
        self.started_at = Some(timestamp);
        self.detector.start_monitoring();
        self.logger.record(&format!("drill started at {}ms", timestamp));
    }

    pub fn is_active(&self) -> bool {
        self.detector.is_monitoring()
    }

    pub fn shots(&self) -> &[ShotRecord] {
        &self.shots
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Feeds one sample; returns the shot it completed, if any.
    pub fn ingest(&mut self, sample: &SensorSample) -> Option<ShotRecord> {
        if !self.is_active() {
            return None;
        }

        let trigger = match sample.reading {
            SensorReading::Audio { level } => {
                self.metrics.record_audio();
                if !level.is_finite() {
                    self.metrics.record_rejected();
                    return self.release_expired(sample.timestamp);
                }
                self.audio_trigger(sample.timestamp, level)
            }
            SensorReading::Gyro(reading) => {
                self.metrics.record_gyro();
                if !self
                    .flinch
                    .add_gyro_sample(sample.timestamp, reading.x, reading.y, reading.z)
                {
                    self.metrics.record_rejected();
                    return self.release_expired(sample.timestamp);
                }
                self.gyro_trigger(sample.timestamp, reading.x, reading.y, reading.z)
            }
        };

        match self.fusion {
            FusionPolicy::SharedDebounce => trigger.and_then(|event| self.record(event)),
            FusionPolicy::Correlated { window_ms } => {
                let released = self.release_expired(sample.timestamp);
                if let Some(candidate) = trigger {
                    self.hold(candidate, window_ms);
                }
                released
            }
        }
    }

    /// Ends the drill and assembles the run for scoring.
    pub fn stop(
        &mut self,
        timestamp: u64,
        expected_rounds: u32,
        par_time: Option<f64>,
        target_zone_tally: Option<TargetZoneTally>,
    ) -> DrillRun {
        if let Some(pending) = self.pending.take() {
            self.record(pending);
        }
        self.detector.stop_monitoring();

        let splits: Vec<f64> = self.shots.iter().filter_map(|shot| shot.split_s).collect();
        let flinch_count = self.shots.iter().filter(|shot| shot.flinch).count() as u32;
        let total_time = match (self.started_at, self.shots.last()) {
            (Some(start), Some(last)) => millis_to_secs(last.event.timestamp.saturating_sub(start)),
            (Some(start), None) => millis_to_secs(timestamp.saturating_sub(start)),
            (None, _) => 0.0,
        };

        let run = DrillRun {
            expected_rounds,
            shot_count: self.shots.len() as u32,
            splits,
            total_time,
            par_time,
            flinch_count,
            target_zone_tally,
        };
        self.logger.record(&format!(
            "drill stopped: {} shots in {:.2}s, {} flinches",
            run.shot_count, run.total_time, run.flinch_count
        ));
        run
    }

    fn audio_trigger(&mut self, timestamp: u64, level: f32) -> Option<ShotEvent> {
        match self.fusion {
            FusionPolicy::SharedDebounce => self.detector.process_audio_level(timestamp, level),
            FusionPolicy::Correlated { .. } => self
                .detector
                .audio_trigger(level)
                .map(|confidence| ShotEvent::new(timestamp, confidence, DetectionMethod::Audio)),
        }
    }

    fn gyro_trigger(&mut self, timestamp: u64, x: f32, y: f32, z: f32) -> Option<ShotEvent> {
        match self.fusion {
            FusionPolicy::SharedDebounce => self.detector.process_gyro_data(timestamp, x, y, z),
            FusionPolicy::Correlated { .. } => self
                .detector
                .gyro_trigger(x, y, z)
                .map(|confidence| ShotEvent::new(timestamp, confidence, DetectionMethod::Gyro)),
        }
    }

    fn hold(&mut self, candidate: ShotEvent, window_ms: u64) {
        self.pending = match self.pending.take() {
            None => Some(candidate),
            Some(held) => {
                let in_window = candidate.timestamp.saturating_sub(held.timestamp) <= window_ms;
                match (held.method, candidate.method) {
                    (DetectionMethod::Audio, DetectionMethod::Gyro) if in_window => {
                        ShotDetector::combine_detections(Some(held), Some(candidate))
                    }
                    (DetectionMethod::Gyro, DetectionMethod::Audio) if in_window => {
                        ShotDetector::combine_detections(Some(candidate), Some(held))
                    }
                    // Same channel again, or already merged: still the held shot.
                    _ => Some(held),
                }
            }
        };
    }

    fn release_expired(&mut self, now: u64) -> Option<ShotRecord> {
        let FusionPolicy::Correlated { window_ms } = self.fusion else {
            return None;
        };
        let held = self.pending?;
        if now.saturating_sub(held.timestamp) <= window_ms {
            return None;
        }
        self.pending = None;
        self.record(held)
    }

    fn record(&mut self, event: ShotEvent) -> Option<ShotRecord> {
        let event = match self.fusion {
            FusionPolicy::SharedDebounce => event,
            FusionPolicy::Correlated { .. } => self.detector.accept(event)?,
        };

        let flinch = self.flinch.detect_flinch(event.timestamp);
        let split_s = self
            .shots
            .last()
            .map(|previous| millis_to_secs(event.timestamp.saturating_sub(previous.event.timestamp)));
        let record = ShotRecord {
            event,
            flinch,
            split_s,
        };

        self.shots.push(record);
        self.metrics.record_shot(flinch);
        self.logger.record_shot(self.shots.len(), &record);
        Some(record)
    }
}

fn millis_to_secs(millis: u64) -> f64 {
    millis as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_audio(session: &mut DrillSession, from: u64, to: u64) {
        for timestamp in (from..to).step_by(50) {
            session.ingest(&SensorSample::audio(timestamp, 0.1));
        }
    }

    #[test]
    fn idle_session_ignores_samples() {
        let mut session = DrillSession::new(SessionConfig::default()).unwrap();
        assert!(session.ingest(&SensorSample::gyro(10, 9.0, 0.0, 0.0)).is_none());
        assert_eq!(session.metrics().gyro_samples, 0);
    }

    #[test]
    fn gyro_only_session_records_splits_and_flinch() {
        let mut session = DrillSession::new(SessionConfig::default()).unwrap();
        session.start(0);

        assert!(session.ingest(&SensorSample::gyro(500, 4.0, 0.0, 0.0)).is_some());
        for timestamp in [820, 840, 860, 880, 900, 920] {
            assert!(session
                .ingest(&SensorSample::gyro(timestamp, 2.0, 0.0, 0.0))
                .is_none());
        }
        let second = session.ingest(&SensorSample::gyro(940, 4.0, 0.0, 0.0)).unwrap();
        assert!(second.flinch);
        assert_eq!(second.split_s, Some(0.44));

        let run = session.stop(2000, 3, Some(2.0), None);
        assert_eq!(run.shot_count, 2);
        assert_eq!(run.splits, vec![0.44]);
        assert_eq!(run.flinch_count, 1);
        assert_eq!(run.total_time, 0.94);
        assert!(run.is_consistent());
        assert!(!session.is_active());
    }

    #[test]
    fn bang_and_recoil_count_once_under_shared_debounce() {
        let mut session = DrillSession::new(SessionConfig::default()).unwrap();
        session.start(0);
        quiet_audio(&mut session, 0, 1000);

        let first = session.ingest(&SensorSample::gyro(1000, 4.0, 0.0, 0.0));
        let second = session.ingest(&SensorSample::audio(1030, 0.95));
        assert_eq!(first.map(|shot| shot.event.method), Some(DetectionMethod::Gyro));
        assert!(second.is_none());
        assert_eq!(session.metrics().shots, 1);
    }

    #[test]
    fn correlated_policy_merges_channels_into_one_event() {
        let config = SessionConfig {
            fusion: FusionPolicy::Correlated { window_ms: 60 },
            ..Default::default()
        };
        let mut session = DrillSession::new(config).unwrap();
        session.start(0);
        quiet_audio(&mut session, 0, 1000);

        assert!(session.ingest(&SensorSample::gyro(1000, 3.0, 4.0, 0.0)).is_none());
        assert!(session.ingest(&SensorSample::audio(1030, 0.91)).is_none());
        let shot = session.ingest(&SensorSample::audio(1100, 0.1)).unwrap();

        assert_eq!(shot.event.method, DetectionMethod::Combined);
        assert_eq!(shot.event.timestamp, 1030);
        assert_eq!(shot.event.confidence, 1.0);
    }

    #[test]
    fn correlated_policy_flushes_single_channel_shot_on_stop() {
        let config = SessionConfig {
            fusion: FusionPolicy::Correlated { window_ms: 60 },
            ..Default::default()
        };
        let mut session = DrillSession::new(config).unwrap();
        session.start(100);
        assert!(session.ingest(&SensorSample::gyro(400, 4.0, 0.0, 0.0)).is_none());

        let run = session.stop(420, 1, None, None);
        assert_eq!(run.shot_count, 1);
        assert_eq!(session.shots()[0].event.method, DetectionMethod::Gyro);
        assert_eq!(run.total_time, 0.3);
    }

    #[test]
    fn malformed_samples_are_counted_not_propagated() {
        let mut session = DrillSession::new(SessionConfig::default()).unwrap();
        session.start(0);
        assert!(session.ingest(&SensorSample::audio(10, f32::NAN)).is_none());
        assert!(session.ingest(&SensorSample::gyro(20, f32::NAN, 1.0, 1.0)).is_none());
        assert_eq!(session.metrics().rejected_samples, 2);
    }

    #[test]
    fn run_without_shots_uses_stop_time() {
        let mut session = DrillSession::new(SessionConfig::default()).unwrap();
        session.start(1000);
        quiet_audio(&mut session, 1000, 3000);
        let run = session.stop(3500, 5, Some(2.0), None);
        assert_eq!(run.shot_count, 0);
        assert_eq!(run.total_time, 2.5);
    }

    #[test]
    fn correlation_window_must_fit_inside_debounce() {
        let config = SessionConfig {
            fusion: FusionPolicy::Correlated { window_ms: 150 },
            ..Default::default()
        };
        assert!(DrillSession::new(config).is_err());
    }
}
