pub mod classification;
pub mod drill;
pub mod engine;
pub mod provider;

pub use classification::Classification;
pub use drill::{DrillRun, SplitSummary, TargetType, TargetZoneTally};
pub use engine::{ScoreResult, ScoringEngine};
pub use provider::{FixedTally, LeaderboardBackend, LeaderboardEntry, TargetAnalysisProvider};
