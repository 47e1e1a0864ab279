pub mod cue;
pub mod par;

pub use cue::{Cue, CuePlayer, LogCuePlayer};
pub use par::{ParTimer, TimerPhase};
