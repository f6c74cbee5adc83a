//! Character DTOs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lumina::domain::services::progression::{BookCredit, XpGrant};
use lumina::domain::services::economy::Purchase;
use lumina::{Badge, BookMeta, Character, ReadingEntry};

use crate::application::Outcome;

// ============================================
// Request DTOs
// ============================================

/// Create Character request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateCharacterRequest {
    /// 2-20 characters
    pub name: String,
    /// Avatar glyph (default: 🧙)
    pub avatar: Option<String>,
}

/// Update Character request
#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCharacterRequest {
    pub name: Option<String>,
    pub avatar: Option<String>,
}

/// Mark a book as read.
///
/// Metadata is only needed for books outside the catalog.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct MarkReadRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub pages: Option<u32>,
    pub difficulty: Option<u8>,
    /// Completion time (default: now)
    pub read_at: Option<DateTime<Utc>>,
}

impl MarkReadRequest {
    /// Metadata supplied by the client, if it gave a title
    pub fn meta(&self) -> Option<BookMeta> {
        let title = self.title.as_ref()?;
        Some(BookMeta {
            title: title.clone(),
            author: self.author.clone().unwrap_or_default(),
            pages: self.pages,
            difficulty: self.difficulty,
        })
    }
}

// ============================================
// Response DTOs
// ============================================

/// Reading history entry
#[derive(Debug, Serialize, ToSchema)]
pub struct ReadingEntryResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub read_at: DateTime<Utc>,
    pub xp_gained: u64,
}

impl From<ReadingEntry> for ReadingEntryResponse {
    fn from(entry: ReadingEntry) -> Self {
        Self {
            id: entry.id,
            title: entry.title,
            author: entry.author,
            read_at: entry.read_at,
            xp_gained: entry.xp_gained,
        }
    }
}

/// Character response
#[derive(Debug, Serialize, ToSchema)]
pub struct CharacterResponse {
    pub name: String,
    pub avatar: String,
    pub level: u32,
    pub xp: u64,
    pub xp_to_next_level: u64,
    /// Progress towards the next level, 0.0-1.0
    pub level_progress: f64,
    pub books_read_count: u32,
    pub books_read_ids: Vec<String>,
    pub books_history: Vec<ReadingEntryResponse>,
    pub coins: u64,
    pub inventory: Vec<String>,
    /// Slot name to item id
    pub equipped: BTreeMap<String, String>,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Character> for CharacterResponse {
    fn from(c: Character) -> Self {
        Self {
            level_progress: c.level_progress(),
            equipped: c
                .equipped
                .iter()
                .map(|(slot, item)| (slot.to_string(), item.clone()))
                .collect(),
            name: c.name,
            avatar: c.avatar,
            level: c.level,
            xp: c.xp,
            xp_to_next_level: c.xp_to_next_level,
            books_read_count: c.books_read_count,
            books_read_ids: c.books_read_ids.into_iter().collect(),
            books_history: c.books_history.into_iter().map(Into::into).collect(),
            coins: c.coins,
            inventory: c.inventory.into_iter().collect(),
            revision: c.revision,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Badge response
#[derive(Debug, Serialize, ToSchema)]
pub struct BadgeResponse {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub unlocked: bool,
}

impl From<Badge> for BadgeResponse {
    fn from(badge: Badge) -> Self {
        Self {
            id: badge.id,
            name: badge.name,
            emoji: badge.emoji,
            unlocked: badge.unlocked,
        }
    }
}

/// Result of a progression or store action.
///
/// Rejected actions report `success: false` with the reason and the
/// unchanged character.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub success: bool,
    pub message: String,
    /// Machine-readable rejection code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Human-readable rejection reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    /// What the action granted, when it succeeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<serde_json::Value>,
    pub character: CharacterResponse,
}

impl ActionResponse {
    fn from_outcome<T: Serialize>(outcome: Outcome<T>, message: impl FnOnce(&T) -> String) -> Self {
        let success = outcome.is_success();
        let character = outcome.character.into();
        match outcome.result {
            Ok(receipt) => Self {
                success,
                message: message(&receipt),
                code: None,
                reason: None,
                receipt: serde_json::to_value(&receipt).ok().filter(|v| !v.is_null()),
                character,
            },
            Err(rejection) => Self {
                success,
                message: rejection.to_string(),
                code: Some(rejection.code().to_string()),
                reason: Some(rejection.to_string()),
                receipt: None,
                character,
            },
        }
    }
}

impl From<Outcome<BookCredit>> for ActionResponse {
    fn from(outcome: Outcome<BookCredit>) -> Self {
        Self::from_outcome(outcome, |credit| {
            if credit.levels_gained > 0 {
                format!(
                    "+{} XP, +{} coins. Level up! Now level {}",
                    credit.xp_gained, credit.coins_gained, credit.level
                )
            } else {
                format!("+{} XP, +{} coins", credit.xp_gained, credit.coins_gained)
            }
        })
    }
}

impl From<Outcome<XpGrant>> for ActionResponse {
    fn from(outcome: Outcome<XpGrant>) -> Self {
        Self::from_outcome(outcome, |grant| format!("+{} XP", grant.xp_gained))
    }
}

impl From<Outcome<Purchase>> for ActionResponse {
    fn from(outcome: Outcome<Purchase>) -> Self {
        Self::from_outcome(outcome, Purchase::message)
    }
}

impl From<Outcome<()>> for ActionResponse {
    fn from(outcome: Outcome<()>) -> Self {
        Self::from_outcome(outcome, |_| "Equipment updated".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumina::{EquipSlot, Rejection};

    #[test]
    fn test_character_response_flattens_collections() {
        let mut c = Character::new("Ada", None).unwrap();
        c.inventory.insert("hat_cap".to_string());
        c.equipped.insert(EquipSlot::Hat, "hat_cap".to_string());

        let res = CharacterResponse::from(c);
        assert_eq!(res.inventory, vec!["hat_cap"]);
        assert_eq!(res.equipped.get("hat").map(String::as_str), Some("hat_cap"));
        assert_eq!(res.level_progress, 0.0);
    }

    #[test]
    fn test_rejected_outcome() {
        let outcome: Outcome<Purchase> = Outcome {
            character: Character::new("Ada", None).unwrap(),
            result: Err(Rejection::InsufficientFunds {
                price: 150,
                balance: 0,
            }),
        };
        let res = ActionResponse::from(outcome);
        assert!(!res.success);
        assert_eq!(res.code.as_deref(), Some("insufficient_funds"));
        assert!(res.receipt.is_none());
    }

    #[test]
    fn test_equip_outcome_has_no_receipt() {
        let outcome = Outcome {
            character: Character::new("Ada", None).unwrap(),
            result: Ok(()),
        };
        let res = ActionResponse::from(outcome);
        assert!(res.success);
        assert!(res.receipt.is_none());
    }

    #[test]
    fn test_meta_requires_title() {
        assert!(MarkReadRequest::default().meta().is_none());
        let req = MarkReadRequest {
            title: Some("Outside".to_string()),
            pages: Some(120),
            ..Default::default()
        };
        let meta = req.meta().unwrap();
        assert_eq!(meta.author, "");
        assert_eq!(meta.pages, Some(120));
    }
}
