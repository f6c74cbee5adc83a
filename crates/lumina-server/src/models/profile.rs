//! Profile DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lumina::{Goal, Profile};

/// Reading preferences sent by the client
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProfileRequest {
    /// Reader age, 8-90 when stored (default: 20)
    pub age: Option<u32>,
    /// Daily reading time in minutes, 5-240 when stored (default: 20)
    pub minutes_per_day: Option<u32>,
    /// entertain | learn | habit | productivity | emotional (Spanish names accepted)
    #[schema(value_type = Option<String>, example = "entertain")]
    pub goal: Option<Goal>,
    #[serde(default)]
    pub prefers_short: bool,
    /// Highest acceptable difficulty, 1-5 (default: 5)
    pub difficulty_max: Option<u8>,
    /// Free-text interest tags
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<ProfileRequest> for Profile {
    fn from(req: ProfileRequest) -> Self {
        let defaults = Profile::default();
        Self {
            age: req.age.unwrap_or(defaults.age),
            minutes_per_day: req.minutes_per_day.unwrap_or(defaults.minutes_per_day),
            goal: req.goal.unwrap_or_default(),
            prefers_short: req.prefers_short,
            difficulty_max: req.difficulty_max,
            tags: req.tags,
        }
    }
}

/// Stored profile
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub age: u32,
    pub minutes_per_day: u32,
    #[schema(value_type = String, example = "learn")]
    pub goal: Goal,
    pub prefers_short: bool,
    pub difficulty_max: u8,
    pub tags: Vec<String>,
}

impl From<Profile> for ProfileResponse {
    fn from(profile: Profile) -> Self {
        Self {
            difficulty_max: profile.effective_difficulty_max(),
            age: profile.age,
            minutes_per_day: profile.minutes_per_day,
            goal: profile.goal,
            prefers_short: profile.prefers_short,
            tags: profile.tags,
        }
    }
}
