use crate::prelude::CoreResult;
use log::info;
use serde::{Deserialize, Serialize};

/// Audible signals played around a drill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Start,
    Par,
}

/// Output device for drill cues.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue) -> CoreResult<()>;

    /// Releases any audio resources held by the player.
    fn release(&self) {}
}

/// Player that only writes cues to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCuePlayer;

impl CuePlayer for LogCuePlayer {
    fn play(&self, cue: Cue) -> CoreResult<()> {
        info!("cue: {:?}", cue);
        Ok(())
    }
}
