use serde::{Deserialize, Serialize};

/// Thresholds and timing for the shot detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Absolute audio level a shot must exceed.
    pub audio_threshold: f32,
    /// Angular-rate magnitude a recoil must exceed.
    pub gyro_threshold: f32,
    /// Magnitude at which gyro confidence saturates.
    pub gyro_full_scale: f32,
    /// Factor over the rolling audio baseline required to trigger.
    pub baseline_ratio: f32,
    /// Number of audio levels in the rolling baseline.
    pub baseline_window: usize,
    /// Minimum spacing between two accepted shots, shared across channels.
    pub debounce_ms: u64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            audio_threshold: 0.7,
            gyro_threshold: 2.5,
            gyro_full_scale: 5.0,
            baseline_ratio: 2.0,
            baseline_window: 10,
            debounce_ms: 100,
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if !(self.audio_threshold > 0.0 && self.audio_threshold <= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "audio_threshold must be in (0, 1], got {}",
                self.audio_threshold
            )));
        }
        if !(self.gyro_threshold.is_finite() && self.gyro_threshold > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "gyro_threshold must be positive, got {}",
                self.gyro_threshold
            )));
        }
        if !(self.gyro_full_scale.is_finite() && self.gyro_full_scale > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "gyro_full_scale must be positive, got {}",
                self.gyro_full_scale
            )));
        }
        if !(self.baseline_ratio.is_finite() && self.baseline_ratio >= 1.0) {
            return Err(CoreError::InvalidConfig(format!(
                "baseline_ratio must be at least 1, got {}",
                self.baseline_ratio
            )));
        }
        if self.baseline_window == 0 {
            return Err(CoreError::InvalidConfig(
                "baseline_window must hold at least one sample".into(),
            ));
        }
        Ok(())
    }
}

/// Window and threshold for the retroactive flinch check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlinchConfig {
    /// Gyro samples retained, oldest evicted first.
    pub history: usize,
    /// Span before the shot that is inspected.
    pub window_ms: u64,
    /// Fewer qualifying samples than this never counts as a flinch.
    pub min_samples: usize,
    /// Mean magnitude above which the window is a flinch.
    pub threshold: f32,
}

impl Default for FlinchConfig {
    fn default() -> Self {
        Self {
            history: 30,
            window_ms: 200,
            min_samples: 5,
            threshold: 1.5,
        }
    }
}

impl FlinchConfig {
    pub fn validate(&self) -> CoreResult<()> {
        if self.history == 0 || self.min_samples == 0 {
            return Err(CoreError::InvalidConfig(
                "flinch history and min_samples must be non-zero".into(),
            ));
        }
        if self.min_samples > self.history {
            return Err(CoreError::InvalidConfig(format!(
                "min_samples {} exceeds history {}",
                self.min_samples, self.history
            )));
        }
        if self.window_ms == 0 {
            return Err(CoreError::InvalidConfig("flinch window_ms must be non-zero".into()));
        }
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(CoreError::InvalidConfig(format!(
                "flinch threshold must be positive, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}

/// Common error type for the parts of the core that can fail.
///
/// Sample processing and scoring never return this; it covers configuration,
/// timer scheduling and the collaborator seams.
#[derive(thiserror::Error, Debug)]
pub enum CoreError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("timer unavailable: {0}")]
    TimerUnavailable(String),
    #[error("cue playback failed: {0}")]
    Cue(String),
    #[error("backend failure: {0}")]
    Backend(String),
}

pub type CoreResult<T> = Result<T, CoreError>;

pub use crate::detection::{DrillSession, FlinchDetector, FusionPolicy, SessionConfig, ShotDetector};
pub use crate::scoring::{Classification, DrillRun, ScoreResult, ScoringEngine, TargetZoneTally};
pub use crate::sensor::{DetectionMethod, SensorReading, SensorSample, ShotEvent, ShotRecord};
