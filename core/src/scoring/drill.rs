use serde::{Deserialize, Serialize};

/// Scoring rules of the paper target in use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    /// Additive A/C/D zones.
    Uspsa,
    /// Penalty-based down-zero / down-one / down-three zones.
    Idpa,
}

impl TargetType {
    /// Points for the centre, middle and edge zones.
    pub fn zone_values(self) -> [i32; 3] {
        match self {
            TargetType::Uspsa => [5, 3, 1],
            TargetType::Idpa => [0, -1, -3],
        }
    }

    pub fn is_penalty_based(self) -> bool {
        matches!(self, TargetType::Idpa)
    }

    pub fn max_points(self, rounds: u32) -> i32 {
        let best = self.zone_values()[0];
        best.saturating_mul(rounds.min(i32::MAX as u32) as i32)
    }
}

/// Hit-zone counts read off a target after the drill.
///
/// For IDPA targets `alpha_hits`, `charlie_hits` and `delta_hits` hold the
/// down-zero, down-one and down-three counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetZoneTally {
    pub target_type: TargetType,
    pub alpha_hits: u32,
    pub charlie_hits: u32,
    pub delta_hits: u32,
    pub total_points: i32,
    pub max_points: i32,
}

impl TargetZoneTally {
    pub fn from_hits(
        target_type: TargetType,
        rounds: u32,
        alpha_hits: u32,
        charlie_hits: u32,
        delta_hits: u32,
    ) -> Self {
        let [alpha, charlie, delta] = target_type.zone_values();
        let total_points = [(alpha_hits, alpha), (charlie_hits, charlie), (delta_hits, delta)]
            .iter()
            .map(|&(hits, value)| (hits as i64) * (value as i64))
            .sum::<i64>()
            .clamp(i32::MIN as i64, i32::MAX as i64) as i32;

        Self {
            target_type,
            alpha_hits,
            charlie_hits,
            delta_hits,
            total_points,
            max_points: target_type.max_points(rounds),
        }
    }

    pub fn hits(&self) -> u32 {
        self.alpha_hits
            .saturating_add(self.charlie_hits)
            .saturating_add(self.delta_hits)
    }
}

/// A finished drill as handed to the scoring engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DrillRun {
    pub expected_rounds: u32,
    pub shot_count: u32,
    /// Seconds between consecutive shots.
    pub splits: Vec<f64>,
    /// Seconds from the start signal.
    pub total_time: f64,
    pub par_time: Option<f64>,
    pub flinch_count: u32,
    pub target_zone_tally: Option<TargetZoneTally>,
}

/// Fastest, slowest and mean split of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SplitSummary {
    pub fastest: f64,
    pub slowest: f64,
    pub average: f64,
}

impl DrillRun {
    pub fn new(expected_rounds: u32) -> Self {
        Self {
            expected_rounds,
            ..Default::default()
        }
    }

    /// Checks `splits.len() == shot_count - 1` for non-empty runs.
    pub fn is_consistent(&self) -> bool {
        match self.shot_count {
            0 => self.splits.is_empty(),
            n => self.splits.len() as u64 == u64::from(n) - 1,
        }
    }

    pub fn split_summary(&self) -> Option<SplitSummary> {
        let splits: Vec<f64> = self.splits.iter().copied().filter(|s| s.is_finite()).collect();
        if splits.is_empty() {
            return None;
        }
        let fastest = splits.iter().copied().fold(f64::INFINITY, f64::min);
        let slowest = splits.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let average = splits.iter().sum::<f64>() / splits.len() as f64;
        Some(SplitSummary {
            fastest,
            slowest,
            average,
        })
    }
}
