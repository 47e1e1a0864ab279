use crate::scoring::classification::Classification;
use crate::scoring::drill::{DrillRun, TargetZoneTally};
use serde::{Deserialize, Serialize};

const TIME_PENALTY_PER_SECOND: f64 = 2.0;
const MISSED_ROUND_PENALTY: f64 = 5.0;
const FLINCH_PENALTY: f64 = 3.0;
/// Score lost per average penalty point per round on penalty-based targets.
const PENALTY_SCALE: f64 = 33.33;

/// Final outcome of a drill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    /// 0 to 100.
    pub score: u8,
    pub hit_factor: f64,
    pub classification: Classification,
}

/// Stateless scorer; every call is a pure function of the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScoringEngine;

impl ScoringEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, run: &DrillRun) -> ScoreResult {
        let (score, points) = match run.target_zone_tally.as_ref() {
            Some(tally) => (
                Self::to_score(Self::zone_accuracy(tally, run.expected_rounds)),
                f64::from(tally.total_points),
            ),
            None => {
                let score = Self::timing_score(run);
                (score, f64::from(score))
            }
        };

        let hit_factor = Self::hit_factor(points, run.total_time);
        ScoreResult {
            score,
            hit_factor,
            classification: Classification::from_hit_factor(hit_factor),
        }
    }

    /// Zone accuracy in percent; a tally with nothing to compare against scores 0.
    pub fn zone_accuracy(tally: &TargetZoneTally, expected_rounds: u32) -> f64 {
        if tally.target_type.is_penalty_based() {
            let expected_hits = if expected_rounds > 0 {
                expected_rounds
            } else {
                tally.hits()
            };
            if expected_hits == 0 {
                return 0.0;
            }
            let penalty = f64::from(tally.total_points).abs() / f64::from(expected_hits);
            100.0 - penalty * PENALTY_SCALE
        } else {
            if tally.max_points <= 0 {
                return 0.0;
            }
            f64::from(tally.total_points) / f64::from(tally.max_points) * 100.0
        }
    }

    /// Penalty score used when no target analysis is available.
    pub fn timing_score(run: &DrillRun) -> u8 {
        let total_time = finite_or_zero(run.total_time);
        let overtime = run
            .par_time
            .filter(|par| par.is_finite())
            .map(|par| (total_time - par).max(0.0))
            .unwrap_or(0.0);
        let missed = f64::from(run.expected_rounds.saturating_sub(run.shot_count));

        let raw = 100.0
            - overtime * TIME_PENALTY_PER_SECOND
            - missed * MISSED_ROUND_PENALTY
            - f64::from(run.flinch_count) * FLINCH_PENALTY;
        Self::to_score(raw)
    }

    pub fn hit_factor(points: f64, total_time: f64) -> f64 {
        let total_time = finite_or_zero(total_time);
        if total_time <= 0.0 || !points.is_finite() {
            return 0.0;
        }
        (points / total_time).max(0.0)
    }

    fn to_score(raw: f64) -> u8 {
        finite_or_zero(raw).clamp(0.0, 100.0).round() as u8
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
