//! Profile Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Profile};

/// Repository interface for reading profiles, keyed by external user id
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Find the profile of a user
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, DomainError>;

    /// Save a profile (insert or update)
    async fn save(&self, user_id: &str, profile: &Profile) -> Result<Profile, DomainError>;
}
