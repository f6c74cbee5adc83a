//! Profile - Declared reading preferences
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::services::tags;
use crate::domain::value_objects::Goal;

pub const AGE_RANGE: std::ops::RangeInclusive<u32> = 8..=90;
pub const MINUTES_PER_DAY_RANGE: std::ops::RangeInclusive<u32> = 5..=240;
pub const DIFFICULTY_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

/// Difficulty ceiling assumed when the profile does not set one
pub const DEFAULT_DIFFICULTY_MAX: u8 = 5;

/// Profile - What the reader likes and how much time they have
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    #[serde(default = "default_age")]
    pub age: u32,
    #[serde(default = "default_minutes_per_day")]
    pub minutes_per_day: u32,
    #[serde(default)]
    pub goal: Goal,
    #[serde(default)]
    pub prefers_short: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty_max: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_age() -> u32 {
    20
}

fn default_minutes_per_day() -> u32 {
    20
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            age: default_age(),
            minutes_per_day: default_minutes_per_day(),
            goal: Goal::default(),
            prefers_short: false,
            difficulty_max: None,
            tags: Vec::new(),
        }
    }
}

impl Profile {
    /// Tags in canonical form (see [`tags::normalize_set`])
    pub fn normalized_tags(&self) -> Vec<String> {
        tags::normalize_set(&self.tags)
    }

    pub fn effective_difficulty_max(&self) -> u8 {
        self.difficulty_max.unwrap_or(DEFAULT_DIFFICULTY_MAX)
    }

    /// Check the ranges accepted at onboarding.
    ///
    /// The scorer itself never calls this; it is applied before a profile is
    /// stored.
    pub fn validate(&self) -> Result<(), DomainError> {
        if !AGE_RANGE.contains(&self.age) {
            return Err(DomainError::Validation(format!(
                "age must be between {} and {}",
                AGE_RANGE.start(),
                AGE_RANGE.end()
            )));
        }
        if !MINUTES_PER_DAY_RANGE.contains(&self.minutes_per_day) {
            return Err(DomainError::Validation(format!(
                "minutes_per_day must be between {} and {}",
                MINUTES_PER_DAY_RANGE.start(),
                MINUTES_PER_DAY_RANGE.end()
            )));
        }
        if let Some(max) = self.difficulty_max {
            if !DIFFICULTY_RANGE.contains(&max) {
                return Err(DomainError::Validation(format!(
                    "difficulty_max must be between {} and {}",
                    DIFFICULTY_RANGE.start(),
                    DIFFICULTY_RANGE.end()
                )));
            }
        }
        if self.normalized_tags().is_empty() {
            return Err(DomainError::Validation(
                "profile must include at least 1 tag".to_string(),
            ));
        }
        Ok(())
    }

    /// Same profile with its tags replaced by their canonical form
    pub fn normalized(mut self) -> Self {
        self.tags = self.normalized_tags();
        self
    }
}
