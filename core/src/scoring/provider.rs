use crate::prelude::CoreResult;
use crate::scoring::drill::{TargetType, TargetZoneTally};
use crate::scoring::engine::ScoreResult;
use serde::{Deserialize, Serialize};

/// Source of hit-zone tallies for a shot target.
///
/// Implementations are constructed by the owner of a drill session and passed
/// in explicitly; the scoring path only sees the returned tally.
pub trait TargetAnalysisProvider {
    fn analyze(&self, target_type: TargetType, rounds: u32) -> Option<TargetZoneTally>;
}

/// A tally known ahead of time, e.g. entered by hand after walking the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedTally {
    pub alpha_hits: u32,
    pub charlie_hits: u32,
    pub delta_hits: u32,
}

impl TargetAnalysisProvider for FixedTally {
    fn analyze(&self, target_type: TargetType, rounds: u32) -> Option<TargetZoneTally> {
        Some(TargetZoneTally::from_hits(
            target_type,
            rounds,
            self.alpha_hits,
            self.charlie_hits,
            self.delta_hits,
        ))
    }
}

/// One scored drill as submitted to a leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub shooter: String,
    pub drill: String,
    pub result: ScoreResult,
    pub total_time: f64,
    pub recorded_at_ms: u64,
}

/// Destination for scored drills.
pub trait LeaderboardBackend {
    fn submit(&self, entry: &LeaderboardEntry) -> CoreResult<()>;
}
