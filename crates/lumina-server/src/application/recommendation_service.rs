//! Recommendation Application Service (Use Case)

use std::sync::Arc;

use lumina::domain::services::ranking;
use lumina::{Book, BookCatalog, DomainError, Profile, ProfileRepository, ScoredBook};

/// Application service for profiles and recommendations
pub struct RecommendationService<P: ProfileRepository + ?Sized, C: BookCatalog + ?Sized> {
    profiles: Arc<P>,
    catalog: Arc<C>,
}

impl<P: ProfileRepository + ?Sized, C: BookCatalog + ?Sized> RecommendationService<P, C> {
    pub fn new(profiles: Arc<P>, catalog: Arc<C>) -> Self {
        Self { profiles, catalog }
    }

    /// Every book in the catalog
    pub async fn catalog(&self) -> Result<Vec<Book>, DomainError> {
        self.catalog.list().await
    }

    /// Rank the catalog for an ad-hoc profile
    pub async fn recommend(&self, profile: &Profile) -> Result<Vec<ScoredBook>, DomainError> {
        let books = self.catalog.list().await?;
        let ranked = ranking::rank(profile, &books)?;

        tracing::debug!(
            "Ranked {} books for tags {:?}, returning {}",
            books.len(),
            profile.normalized_tags(),
            ranked.len()
        );
        Ok(ranked)
    }

    pub async fn get_profile(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        self.profiles.find(user_id).await
    }

    /// Validate and store a user's profile with canonical tags
    pub async fn save_profile(&self, user_id: &str, profile: Profile) -> Result<Profile, DomainError> {
        profile.validate()?;
        let saved = self.profiles.save(user_id, &profile.normalized()).await?;
        tracing::info!("Saved profile for user {}", user_id);
        Ok(saved)
    }

    /// Rank the catalog for a user's stored profile
    pub async fn recommend_for_user(&self, user_id: &str) -> Result<Vec<ScoredBook>, DomainError> {
        let profile = self
            .profiles
            .find(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Profile", user_id))?;
        self.recommend(&profile).await
    }
}
