//! Character Application Service (Use Case)
//!
//! Loads the character, applies a domain transition and stores the result
//! while holding the user's write lock. Successful writes are mirrored in the
//! background when a mirror is configured.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use lumina::domain::services::achievements;
use lumina::domain::services::economy::{self, Purchase};
use lumina::domain::services::progression::{self, BookCredit, XpGrant};
use lumina::ports::MirrorEventKind;
use lumina::{
    Badge, BookCatalog, BookMeta, Character, CharacterRepository, DomainError, EquipSlot,
    MirrorEvent, ProgressMirror, Rejection, StoreItem,
};

use super::UserLocks;

/// Result of a mutating operation.
///
/// `character` is the stored snapshot after the operation: the new one on
/// success, the unchanged one when a business rule rejected the request.
#[derive(Debug, Clone)]
pub struct Outcome<T> {
    pub character: Character,
    pub result: Result<T, Rejection>,
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Application service for Character operations
pub struct CharacterService<R: CharacterRepository + ?Sized, C: BookCatalog + ?Sized> {
    repo: Arc<R>,
    catalog: Arc<C>,
    store: Vec<StoreItem>,
    mirror: Option<Arc<dyn ProgressMirror>>,
    locks: UserLocks,
}

impl<R: CharacterRepository + ?Sized, C: BookCatalog + ?Sized> CharacterService<R, C> {
    pub fn new(repo: Arc<R>, catalog: Arc<C>) -> Self {
        Self {
            repo,
            catalog,
            store: StoreItem::catalog(),
            mirror: None,
            locks: UserLocks::new(),
        }
    }

    pub fn with_mirror(mut self, mirror: Arc<dyn ProgressMirror>) -> Self {
        self.mirror = Some(mirror);
        self
    }

    /// Items on sale
    pub fn store(&self) -> &[StoreItem] {
        &self.store
    }

    fn store_item(&self, item_id: &str) -> Option<&StoreItem> {
        self.store.iter().find(|item| item.id == item_id)
    }

    /// Get a user's character
    pub async fn get(&self, user_id: &str) -> Result<Option<Character>, DomainError> {
        self.repo.find(user_id).await
    }

    /// Create the character at onboarding
    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        avatar: Option<&str>,
    ) -> Result<Character, DomainError> {
        let character = Character::new(name, avatar)?;

        let _guard = self.locks.acquire(user_id).await;
        let saved = self.repo.create(user_id, &character).await?;

        tracing::info!("Created character {} for user {}", saved.name, user_id);
        self.mirror_in_background(user_id, MirrorEventKind::CharacterCreated, &saved);

        Ok(saved)
    }

    /// Change name and/or avatar
    pub async fn update_identity(
        &self,
        user_id: &str,
        name: Option<String>,
        avatar: Option<String>,
    ) -> Result<Character, DomainError> {
        let _guard = self.locks.acquire(user_id).await;
        let current = self.load(user_id).await?;
        let updated = current.with_identity(name.as_deref(), avatar.as_deref())?;
        let saved = self.repo.save(user_id, &updated).await?;

        self.mirror_in_background(user_id, MirrorEventKind::CharacterUpdated, &saved);
        Ok(saved)
    }

    /// Delete a user's character
    pub async fn delete(&self, user_id: &str) -> Result<bool, DomainError> {
        let _guard = self.locks.acquire(user_id).await;
        let deleted = self.repo.delete(user_id).await?;
        if deleted {
            tracing::info!("Deleted character of user {}", user_id);
        }
        Ok(deleted)
    }

    /// Badges of a user's character
    pub async fn badges(&self, user_id: &str) -> Result<Vec<Badge>, DomainError> {
        let character = self.load(user_id).await?;
        Ok(achievements::badges(&character))
    }

    /// Credit a finished book.
    ///
    /// Catalog data wins over `meta` when the book is in the catalog; books
    /// outside the catalog need `meta`.
    pub async fn mark_book_read(
        &self,
        user_id: &str,
        book_id: &str,
        meta: Option<BookMeta>,
        read_at: DateTime<Utc>,
    ) -> Result<Outcome<BookCredit>, DomainError> {
        let book_id = book_id.trim();
        if book_id.is_empty() {
            return Err(DomainError::Validation("book id must not be empty".to_string()));
        }

        let meta = match self.catalog.find(book_id).await? {
            Some(book) => book.meta(),
            None => meta.ok_or_else(|| DomainError::not_found("Book", book_id))?,
        };

        let outcome = self
            .transact(user_id, MirrorEventKind::BookRead, |c| {
                progression::credit_book_read(c, book_id, &meta, read_at)
            })
            .await?;

        if let Ok(credit) = &outcome.result {
            tracing::info!(
                "User {} read {}: +{} XP, +{} coins, level {}",
                user_id,
                book_id,
                credit.xp_gained,
                credit.coins_gained,
                credit.level
            );
        }
        Ok(outcome)
    }

    /// Grant the once-a-day XP bonus for generating recommendations
    pub async fn claim_recommendation_bonus(
        &self,
        user_id: &str,
        xp_amount: u64,
        today: NaiveDate,
    ) -> Result<Outcome<XpGrant>, DomainError> {
        self.transact(user_id, MirrorEventKind::RewardGranted, |c| {
            progression::credit_recommendation_generation(c, xp_amount, today)
        })
        .await
    }

    /// Buy an item from the store
    pub async fn purchase(&self, user_id: &str, item_id: &str) -> Result<Outcome<Purchase>, DomainError> {
        let item = self.store_item(item_id).cloned();

        self.transact(user_id, MirrorEventKind::ItemPurchased, |c| match &item {
            Some(item) => economy::purchase(c, item),
            None => Err(Rejection::UnknownItem {
                item_id: item_id.to_string(),
            }),
        })
        .await
    }

    /// Equip an owned item in `slot`, or clear the slot with `None`
    pub async fn equip(
        &self,
        user_id: &str,
        slot: EquipSlot,
        item_id: Option<&str>,
    ) -> Result<Outcome<()>, DomainError> {
        // Items the store knows about must go in their own slot
        let item_slot = item_id.and_then(|id| self.store_item(id)).map(StoreItem::slot);

        self.transact(user_id, MirrorEventKind::EquipmentChanged, |c| {
            if let (Some(id), Some(expected)) = (item_id, item_slot) {
                if expected != Some(slot) {
                    return Err(Rejection::WrongSlot {
                        item_id: id.to_string(),
                        slot,
                    });
                }
            }
            economy::equip(c, slot, item_id).map(|next| (next, ()))
        })
        .await
    }

    async fn load(&self, user_id: &str) -> Result<Character, DomainError> {
        self.repo
            .find(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Character", user_id))
    }

    /// Load, transform and store a character under the user's lock
    async fn transact<T, F>(
        &self,
        user_id: &str,
        kind: MirrorEventKind,
        op: F,
    ) -> Result<Outcome<T>, DomainError>
    where
        F: FnOnce(&Character) -> Result<(Character, T), Rejection> + Send,
        T: Send,
    {
        let _guard = self.locks.acquire(user_id).await;
        let current = self.load(user_id).await?;

        match op(&current) {
            Ok((next, value)) => {
                let saved = self.repo.save(user_id, &next).await?;
                self.mirror_in_background(user_id, kind, &saved);
                Ok(Outcome {
                    character: saved,
                    result: Ok(value),
                })
            }
            Err(rejection) => {
                tracing::info!("Rejected {:?} for user {}: {}", kind, user_id, rejection);
                Ok(Outcome {
                    character: current,
                    result: Err(rejection),
                })
            }
        }
    }

    fn mirror_in_background(&self, user_id: &str, kind: MirrorEventKind, character: &Character) {
        let Some(mirror) = self.mirror.clone() else {
            return;
        };
        let event = MirrorEvent::new(user_id, kind, character.clone());

        tokio::spawn(async move {
            if let Err(e) = mirror.mirror(&event).await {
                tracing::warn!("⚠️  Failed to mirror {:?} for {}: {}", event.kind, event.user_id, e);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::mpsc;
    use tokio::time::timeout;

    use crate::adapters::{InMemoryCharacterRepository, StaticBookCatalog};

    type Service = CharacterService<InMemoryCharacterRepository, StaticBookCatalog>;

    fn service() -> Service {
        CharacterService::new(
            Arc::new(InMemoryCharacterRepository::new()),
            Arc::new(StaticBookCatalog::bundled().unwrap()),
        )
    }

    async fn service_with_character(user_id: &str) -> Service {
        let svc = service();
        svc.create(user_id, "Reader", None).await.unwrap();
        svc
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    /// Forwards mirrored event kinds to the test
    struct ChannelMirror {
        events: mpsc::UnboundedSender<MirrorEventKind>,
    }

    #[async_trait]
    impl ProgressMirror for ChannelMirror {
        async fn mirror(&self, event: &MirrorEvent) -> Result<(), DomainError> {
            let _ = self.events.send(event.kind);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let svc = service_with_character("u1").await;
        let c = svc.get("u1").await.unwrap().unwrap();
        assert_eq!(c.level, 1);
        assert!(svc.get("u2").await.unwrap().is_none());

        let err = svc.create("u1", "Again", None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_missing_character_is_not_found() {
        let svc = service();
        let err = svc
            .mark_book_read("ghost", "b001", None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let err = svc.purchase("ghost", "hat_cap").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mark_catalog_book_read_twice() {
        let svc = service_with_character("u1").await;

        // b003: 256 pages, difficulty 2 -> 50 + 25 + 10 xp, 50 + 20 coins
        let first = svc.mark_book_read("u1", "b003", None, Utc::now()).await.unwrap();
        let credit = first.result.clone().unwrap();
        assert_eq!(credit.xp_gained, 85);
        assert_eq!(credit.coins_gained, 70);
        assert_eq!(first.character.books_read_count, 1);
        assert_eq!(first.character.books_history[0].title, "Asesinato en el Orient Express");

        let second = svc.mark_book_read("u1", "b003", None, Utc::now()).await.unwrap();
        assert!(matches!(second.result, Err(Rejection::AlreadyRead { .. })));
        assert_eq!(second.character, first.character);

        let stored = svc.get("u1").await.unwrap().unwrap();
        assert_eq!(stored, first.character);
    }

    #[tokio::test]
    async fn test_mark_external_book_needs_meta() {
        let svc = service_with_character("u1").await;

        let err = svc
            .mark_book_read("u1", "isbn-123", None, Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        let meta = BookMeta {
            title: "Outside".to_string(),
            author: "Someone".to_string(),
            pages: Some(100),
            difficulty: Some(1),
        };
        let outcome = svc
            .mark_book_read("u1", "isbn-123", Some(meta), Utc::now())
            .await
            .unwrap();
        assert_eq!(outcome.result.unwrap().xp_gained, 65);

        let err = svc.mark_book_read("u1", "  ", None, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_recommendation_bonus_throttled() {
        let svc = service_with_character("u1").await;

        let first = svc.claim_recommendation_bonus("u1", 25, today()).await.unwrap();
        assert!(first.is_success());
        assert_eq!(first.character.xp, 25);

        let second = svc.claim_recommendation_bonus("u1", 25, today()).await.unwrap();
        assert!(!second.is_success());
        assert_eq!(second.character.xp, 25);
    }

    #[tokio::test]
    async fn test_purchase_and_equip_flow() {
        let svc = service_with_character("u1").await;

        let poor = svc.purchase("u1", "hat_cap").await.unwrap();
        assert!(matches!(poor.result, Err(Rejection::InsufficientFunds { .. })));

        // Earn coins: b006 difficulty 4 -> 90 coins, b002 difficulty 5 -> 100 coins
        svc.mark_book_read("u1", "b006", None, Utc::now()).await.unwrap();
        svc.mark_book_read("u1", "b002", None, Utc::now()).await.unwrap();

        let bought = svc.purchase("u1", "hat_cap").await.unwrap();
        assert!(bought.is_success());
        assert_eq!(bought.character.coins, 190 - 150);
        assert!(bought.character.owns("hat_cap"));

        let wrong = svc.equip("u1", EquipSlot::Glasses, Some("hat_cap")).await.unwrap();
        assert!(matches!(wrong.result, Err(Rejection::WrongSlot { .. })));

        let unowned = svc.equip("u1", EquipSlot::Hat, Some("hat_crown")).await.unwrap();
        assert!(matches!(unowned.result, Err(Rejection::NotOwned { .. })));

        let worn = svc.equip("u1", EquipSlot::Hat, Some("hat_cap")).await.unwrap();
        assert_eq!(worn.character.equipped_in(EquipSlot::Hat), Some("hat_cap"));

        let bare = svc.equip("u1", EquipSlot::Hat, None).await.unwrap();
        assert!(bare.character.equipped.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_item_rejected() {
        let svc = service_with_character("u1").await;
        let outcome = svc.purchase("u1", "dragon_egg").await.unwrap();
        assert_eq!(
            outcome.result.unwrap_err(),
            Rejection::UnknownItem {
                item_id: "dragon_egg".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_update_identity_and_badges() {
        let svc = service_with_character("u1").await;
        svc.mark_book_read("u1", "b001", None, Utc::now()).await.unwrap();

        let renamed = svc
            .update_identity("u1", Some("Grace".to_string()), None)
            .await
            .unwrap();
        assert_eq!(renamed.name, "Grace");
        assert_eq!(renamed.books_read_count, 1);

        let badges = svc.badges("u1").await.unwrap();
        let first = badges.iter().find(|b| b.id == "first-book").unwrap();
        assert!(first.unlocked);
    }

    #[tokio::test]
    async fn test_concurrent_reads_credit_every_book() {
        let svc = Arc::new(service_with_character("u1").await);

        let handles: Vec<_> = ["b001", "b004", "b007", "b009", "b012"]
            .into_iter()
            .map(|id| {
                let svc = svc.clone();
                tokio::spawn(async move { svc.mark_book_read("u1", id, None, Utc::now()).await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().unwrap().is_success());
        }

        let c = svc.get("u1").await.unwrap().unwrap();
        assert_eq!(c.books_read_count, 5);
        assert_eq!(c.books_history.len(), 5);
        assert!(c.invariants_hold());
    }

    #[tokio::test]
    async fn test_successful_writes_are_mirrored() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let svc = service().with_mirror(Arc::new(ChannelMirror { events: tx }));
        svc.create("u1", "Reader", None).await.unwrap();
        svc.mark_book_read("u1", "b001", None, Utc::now()).await.unwrap();
        // Rejected: not mirrored
        svc.mark_book_read("u1", "b001", None, Utc::now()).await.unwrap();
        svc.update_identity("u1", Some("Grace".to_string()), None)
            .await
            .unwrap();
        drop(svc);

        let mut events = Vec::new();
        // Closes once every spawned delivery has released the mirror
        while let Some(kind) = timeout(Duration::from_secs(1), rx.recv()).await.unwrap() {
            events.push(kind);
        }

        assert_eq!(events.len(), 3);
        for kind in [
            MirrorEventKind::CharacterCreated,
            MirrorEventKind::BookRead,
            MirrorEventKind::CharacterUpdated,
        ] {
            assert_eq!(events.iter().filter(|k| **k == kind).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_locks_are_released_after_each_call() {
        let svc = service_with_character("u1").await;
        svc.mark_book_read("u1", "b001", None, Utc::now()).await.unwrap();
        for i in 0..100 {
            let ghost = format!("ghost-{i}");
            let err = svc
                .mark_book_read(&ghost, "b001", None, Utc::now())
                .await
                .unwrap_err();
            assert!(matches!(err, DomainError::NotFound { .. }));
        }
        assert!(svc.delete("u1").await.unwrap());
        assert_eq!(svc.locks.len(), 0);
    }
}
