pub mod sample;
pub mod shot;

pub use sample::{GyroReading, SensorReading, SensorSample};
pub use shot::{DetectionMethod, ShotEvent, ShotRecord};
