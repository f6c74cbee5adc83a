//! Progress Mirror Port
//!
//! Best-effort outbound copy of character changes to a remote store (for
//! example a hosted profile/history table). Progression never waits on it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{errors::DomainError, Character};

/// Kind of change being mirrored
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MirrorEventKind {
    CharacterCreated,
    CharacterUpdated,
    BookRead,
    RewardGranted,
    ItemPurchased,
    EquipmentChanged,
}

/// Snapshot sent to the mirror after a successful write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorEvent {
    /// Unique per event; receivers can drop redeliveries by id
    pub id: Uuid,
    pub user_id: String,
    pub kind: MirrorEventKind,
    pub character: Character,
    pub occurred_at: DateTime<Utc>,
}

impl MirrorEvent {
    pub fn new(user_id: &str, kind: MirrorEventKind, character: Character) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            character,
            occurred_at: Utc::now(),
        }
    }
}

/// Remote mirror of character snapshots
///
/// Failures are reported to the caller, which logs and drops them.
#[async_trait]
pub trait ProgressMirror: Send + Sync {
    /// Push one event to the mirror
    async fn mirror(&self, event: &MirrorEvent) -> Result<(), DomainError>;
}
