//! Character Repository Port
//!
//! Abstract interface for Character persistence operations.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Character};

/// Repository interface for Character records, keyed by external user id
///
/// Writes are optimistic: `save` only succeeds when the stored revision still
/// equals `character.revision`, and returns the record with the revision
/// bumped. A stale write fails with [`DomainError::Conflict`].
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Find the character of a user
    async fn find(&self, user_id: &str) -> Result<Option<Character>, DomainError>;

    /// Store a new character (Conflict if the user already has one)
    async fn create(&self, user_id: &str, character: &Character) -> Result<Character, DomainError>;

    /// Replace the stored character, checking its revision
    async fn save(&self, user_id: &str, character: &Character) -> Result<Character, DomainError>;

    /// Delete the character of a user
    async fn delete(&self, user_id: &str) -> Result<bool, DomainError>;
}
