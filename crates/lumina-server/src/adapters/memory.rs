//! In-memory repository implementations
//!
//! Used for local runs without a database and by the application tests.
//! They follow the same revision rules as the PostgreSQL adapters.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use lumina::{Character, CharacterRepository, DomainError, Profile, ProfileRepository};

/// In-memory implementation of CharacterRepository
#[derive(Default)]
pub struct InMemoryCharacterRepository {
    records: RwLock<HashMap<String, Character>>,
}

impl InMemoryCharacterRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CharacterRepository for InMemoryCharacterRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Character>, DomainError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn create(&self, user_id: &str, character: &Character) -> Result<Character, DomainError> {
        let mut records = self.records.write().await;
        if records.contains_key(user_id) {
            return Err(DomainError::Conflict(format!(
                "user {user_id} already has a character"
            )));
        }
        let mut stored = character.clone();
        stored.revision = 0;
        records.insert(user_id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn save(&self, user_id: &str, character: &Character) -> Result<Character, DomainError> {
        let mut records = self.records.write().await;
        let current = records
            .get(user_id)
            .ok_or_else(|| DomainError::not_found("Character", user_id))?;

        if current.revision != character.revision {
            return Err(DomainError::Conflict(format!(
                "character of {user_id} changed (revision {} != {})",
                current.revision, character.revision
            )));
        }

        let mut stored = character.clone();
        stored.revision += 1;
        stored.updated_at = chrono::Utc::now();
        records.insert(user_id.to_string(), stored.clone());
        Ok(stored)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, DomainError> {
        Ok(self.records.write().await.remove(user_id).is_some())
    }
}

/// In-memory implementation of ProfileRepository
#[derive(Default)]
pub struct InMemoryProfileRepository {
    records: RwLock<HashMap<String, Profile>>,
}

impl InMemoryProfileRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        Ok(self.records.read().await.get(user_id).cloned())
    }

    async fn save(&self, user_id: &str, profile: &Profile) -> Result<Profile, DomainError> {
        self.records
            .write()
            .await
            .insert(user_id.to_string(), profile.clone());
        Ok(profile.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stale_save_conflicts() {
        let repo = InMemoryCharacterRepository::new();
        let created = repo
            .create("u1", &Character::new("Ada", None).unwrap())
            .await
            .unwrap();

        let mut first = created.clone();
        first.coins = 10;
        let saved = repo.save("u1", &first).await.unwrap();
        assert_eq!(saved.revision, 1);

        let mut stale = created;
        stale.coins = 99;
        assert!(matches!(
            repo.save("u1", &stale).await,
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(repo.find("u1").await.unwrap().unwrap().coins, 10);
    }

    #[tokio::test]
    async fn test_create_twice_conflicts() {
        let repo = InMemoryCharacterRepository::new();
        let c = Character::new("Ada", None).unwrap();
        repo.create("u1", &c).await.unwrap();
        assert!(matches!(
            repo.create("u1", &c).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_save_missing_is_not_found() {
        let repo = InMemoryCharacterRepository::new();
        let c = Character::new("Ada", None).unwrap();
        assert!(matches!(
            repo.save("ghost", &c).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
