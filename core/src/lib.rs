//! Shot-detection and scoring core for drill training.
//!
//! Sensor samples flow through the detectors in [`detection`], accepted shots are
//! assembled into a [`scoring::DrillRun`] by [`detection::DrillSession`], and the
//! [`scoring::ScoringEngine`] turns the finished run into a classification.

pub mod detection;
pub mod math;
pub mod prelude;
pub mod scoring;
pub mod sensor;
pub mod telemetry;
pub mod timer;

pub use prelude::{CoreError, CoreResult, DetectorConfig, FlinchConfig};
