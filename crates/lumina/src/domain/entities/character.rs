//! Character - The reader's progression record
//!
//! Pure domain entity without infrastructure dependencies. Every change to a
//! character goes through the functions in `domain::services`, which take a
//! snapshot and return a new one.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;
use crate::domain::value_objects::{EquipSlot, RewardAction};

pub const STARTING_LEVEL: u32 = 1;
pub const STARTING_XP_TO_NEXT_LEVEL: u64 = 100;
pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 20;
pub const DEFAULT_AVATAR: &str = "🧙";

/// One credited book in the reading history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReadingEntry {
    pub id: String,
    pub title: String,
    pub author: String,
    pub read_at: DateTime<Utc>,
    pub xp_gained: u64,
}

/// Character - Level, currency and cosmetics earned by reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    #[serde(default)]
    pub books_read_count: u32,
    #[serde(default)]
    pub books_read_ids: BTreeSet<String>,
    #[serde(default)]
    pub books_history: Vec<ReadingEntry>,
    #[serde(default)]
    pub coins: u64,
    #[serde(default)]
    pub inventory: BTreeSet<String>,
    #[serde(default)]
    pub equipped: BTreeMap<EquipSlot, String>,
    /// Last calendar date each throttled reward was granted
    #[serde(default)]
    pub last_reward_dates: BTreeMap<RewardAction, NaiveDate>,
    /// Bumped by the repository on every successful save
    #[serde(default)]
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    /// Stamped by the repository on save
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// Create a fresh level-1 character
    pub fn new(name: &str, avatar: Option<&str>) -> Result<Self, DomainError> {
        let name = validate_name(name)?;
        let now = Utc::now();
        Ok(Self {
            name,
            avatar: avatar_or_default(avatar),
            level: STARTING_LEVEL,
            xp: 0,
            xp_to_next_level: STARTING_XP_TO_NEXT_LEVEL,
            books_read_count: 0,
            books_read_ids: BTreeSet::new(),
            books_history: Vec::new(),
            coins: 0,
            inventory: BTreeSet::new(),
            equipped: BTreeMap::new(),
            last_reward_dates: BTreeMap::new(),
            revision: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Change name and/or avatar, keeping all progress
    pub fn with_identity(&self, name: Option<&str>, avatar: Option<&str>) -> Result<Self, DomainError> {
        let mut next = self.clone();
        if let Some(name) = name {
            next.name = validate_name(name)?;
        }
        if let Some(avatar) = avatar {
            next.avatar = avatar_or_default(Some(avatar));
        }
        Ok(next)
    }

    pub fn has_read(&self, book_id: &str) -> bool {
        self.books_read_ids.contains(book_id)
    }

    pub fn owns(&self, item_id: &str) -> bool {
        self.inventory.contains(item_id)
    }

    pub fn equipped_in(&self, slot: EquipSlot) -> Option<&str> {
        self.equipped.get(&slot).map(String::as_str)
    }

    /// Fraction of the current level completed, in `0.0..1.0`
    pub fn level_progress(&self) -> f64 {
        if self.xp_to_next_level == 0 {
            return 0.0;
        }
        self.xp as f64 / self.xp_to_next_level as f64
    }

    /// Whether the record satisfies the invariants every operation restores
    pub fn invariants_hold(&self) -> bool {
        self.level >= 1
            && self.xp_to_next_level > 0
            && self.xp < self.xp_to_next_level
            && self.equipped.values().all(|id| self.inventory.contains(id))
    }
}

fn validate_name(name: &str) -> Result<String, DomainError> {
    let trimmed = name.trim();
    let len = trimmed.chars().count();
    if len < NAME_MIN_CHARS {
        return Err(DomainError::Validation(format!(
            "character name must have at least {} characters",
            NAME_MIN_CHARS
        )));
    }
    if len > NAME_MAX_CHARS {
        return Err(DomainError::Validation(format!(
            "character name must have at most {} characters",
            NAME_MAX_CHARS
        )));
    }
    Ok(trimmed.to_string())
}

fn avatar_or_default(avatar: Option<&str>) -> String {
    match avatar.map(str::trim) {
        Some(a) if !a.is_empty() => a.to_string(),
        _ => DEFAULT_AVATAR.to_string(),
    }
}
