use crate::sensor::ShotRecord;
use log::{debug, info};

/// Thin wrapper over the `log` facade used by detectors and sessions.
pub struct SessionLog {
    component: &'static str,
}

impl SessionLog {
    pub fn new(component: &'static str) -> Self {
        Self { component }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    /// Per-sample diagnostics stay at debug level to keep the sensor path quiet.
    pub fn trace_sample(&self, message: &str) {
        debug!("[{}] {}", self.component, message);
    }

    pub fn record_shot(&self, index: usize, shot: &ShotRecord) {
        match serde_json::to_string(shot) {
            Ok(json) => info!("[{}] shot #{} {}", self.component, index, json),
            Err(_) => info!(
                "[{}] shot #{} at {}ms",
                self.component, index, shot.event.timestamp
            ),
        }
    }
}

impl Default for SessionLog {
    fn default() -> Self {
        Self::new("session")
    }
}
