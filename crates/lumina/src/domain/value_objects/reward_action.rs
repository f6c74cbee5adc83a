//! RewardAction - Throttle key for once-per-day rewards

use serde::{Deserialize, Serialize};

/// A rewarded action that may be granted at most once per calendar day
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RewardAction {
    /// XP bonus for generating recommendations
    RecommendationBonus,
}

impl std::fmt::Display for RewardAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RewardAction::RecommendationBonus => write!(f, "recommendation_bonus"),
        }
    }
}

impl std::str::FromStr for RewardAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recommendation_bonus" => Ok(RewardAction::RecommendationBonus),
            _ => Err(format!("Unknown reward action: {}", s)),
        }
    }
}
