use serde::{Deserialize, Serialize};
use std::fmt;

/// Competition skill tier derived from hit factor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Classification {
    Novice,
    Marksman,
    Sharpshooter,
    Expert,
    Master,
    #[serde(rename = "Grand Master")]
    GrandMaster,
}

/// Minimum hit factor per tier, highest first.
const TIERS: [(f64, Classification); 5] = [
    (7.0, Classification::GrandMaster),
    (5.5, Classification::Master),
    (4.0, Classification::Expert),
    (2.5, Classification::Sharpshooter),
    (1.5, Classification::Marksman),
];

impl Classification {
    pub fn from_hit_factor(hit_factor: f64) -> Self {
        TIERS
            .iter()
            .find(|(floor, _)| hit_factor >= *floor)
            .map(|(_, tier)| *tier)
            .unwrap_or(Classification::Novice)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Novice => "Novice",
            Classification::Marksman => "Marksman",
            Classification::Sharpshooter => "Sharpshooter",
            Classification::Expert => "Expert",
            Classification::Master => "Master",
            Classification::GrandMaster => "Grand Master",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
