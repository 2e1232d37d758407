//! Achievement tiers earned from check-in points

use serde::{Deserialize, Serialize};
use std::fmt;

/// Relationship achievement tier, ordered from lowest to highest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTier {
    Seedling,
    Sprout,
    Blossom,
    Evergreen,
    Soulmates,
}

/// Minimum points per tier, ascending
const THRESHOLDS: &[(AchievementTier, u32)] = &[
    (AchievementTier::Seedling, 0),
    (AchievementTier::Sprout, 100),
    (AchievementTier::Blossom, 250),
    (AchievementTier::Evergreen, 500),
    (AchievementTier::Soulmates, 1000),
];

impl AchievementTier {
    /// Highest tier whose threshold `points` reaches
    pub fn for_points(points: u32) -> Self {
        THRESHOLDS
            .iter()
            .rev()
            .find(|(_, min)| points >= *min)
            .map(|(tier, _)| *tier)
            .unwrap_or(Self::Seedling)
    }

    pub fn min_points(&self) -> u32 {
        THRESHOLDS
            .iter()
            .find(|(tier, _)| tier == self)
            .map(|(_, min)| *min)
            .unwrap_or(0)
    }

    /// `None` at the top tier
    pub fn next_tier(&self) -> Option<Self> {
        THRESHOLDS
            .iter()
            .map(|(tier, _)| *tier)
            .find(|tier| tier > self)
    }

    /// Points still needed for the next tier; `None` at the top tier
    pub fn points_to_next(points: u32) -> Option<u32> {
        Self::for_points(points)
            .next_tier()
            .map(|next| next.min_points().saturating_sub(points))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Seedling => "seedling",
            Self::Sprout => "sprout",
            Self::Blossom => "blossom",
            Self::Evergreen => "evergreen",
            Self::Soulmates => "soulmates",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Seedling => "Seedling",
            Self::Sprout => "Sprout",
            Self::Blossom => "Blossom",
            Self::Evergreen => "Evergreen",
            Self::Soulmates => "Soulmates",
        }
    }
}

impl fmt::Display for AchievementTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
