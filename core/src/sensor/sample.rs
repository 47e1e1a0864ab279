use crate::math::StatsHelper;
use serde::{Deserialize, Serialize};

/// Angular rate on the three device axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GyroReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl GyroReading {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn magnitude(&self) -> f32 {
        StatsHelper::magnitude(self.x, self.y, self.z)
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Payload of one sensor callback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", rename_all = "snake_case")]
pub enum SensorReading {
    /// Normalized microphone level in `[0, 1]`.
    Audio { level: f32 },
    Gyro(GyroReading),
}

/// A timestamped reading as delivered by the host sensor layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorSample {
    /// Milliseconds on the host clock.
    pub timestamp: u64,
    #[serde(flatten)]
    pub reading: SensorReading,
}

impl SensorSample {
    pub fn audio(timestamp: u64, level: f32) -> Self {
        Self {
            timestamp,
            reading: SensorReading::Audio { level },
        }
    }

    pub fn gyro(timestamp: u64, x: f32, y: f32, z: f32) -> Self {
        Self {
            timestamp,
            reading: SensorReading::Gyro(GyroReading::new(x, y, z)),
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self.reading, SensorReading::Audio { .. })
    }
}
