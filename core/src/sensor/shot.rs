use serde::{Deserialize, Serialize};

/// Which channel produced a shot event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DetectionMethod {
    Audio,
    Gyro,
    Combined,
}

/// A discrete, debounced shot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotEvent {
    pub timestamp: u64,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f32,
    pub method: DetectionMethod,
}

impl ShotEvent {
    pub fn new(timestamp: u64, confidence: f32, method: DetectionMethod) -> Self {
        Self {
            timestamp,
            confidence: confidence.clamp(0.0, 1.0),
            method,
        }
    }
}

/// A shot as recorded by a drill session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub event: ShotEvent,
    /// Anticipatory movement in the window before the shot.
    pub flinch: bool,
    /// Seconds since the previous shot, `None` for the first one.
    pub split_s: Option<f64>,
}
