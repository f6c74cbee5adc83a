//! PostgreSQL implementation of CharacterRepository
//!
//! Scalar fields live in columns, sets and maps in JSONB columns, and the
//! reading history in its own table.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Transaction};

use lumina::{Character, CharacterRepository, DomainError, EquipSlot, ReadingEntry, RewardAction};

/// PostgreSQL implementation of CharacterRepository
pub struct PgCharacterRepository {
    pool: PgPool,
}

impl PgCharacterRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct CharacterRow {
    #[allow(dead_code)]
    user_id: String,
    name: String,
    avatar: String,
    level: i32,
    xp: i64,
    xp_to_next_level: i64,
    books_read_count: i32,
    books_read_ids: Json<BTreeSet<String>>,
    coins: i64,
    inventory: Json<BTreeSet<String>>,
    equipped: Json<BTreeMap<EquipSlot, String>>,
    last_reward_dates: Json<BTreeMap<RewardAction, NaiveDate>>,
    revision: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct HistoryRow {
    book_id: String,
    title: String,
    author: String,
    xp_gained: i64,
    read_at: DateTime<Utc>,
}

impl From<HistoryRow> for ReadingEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.book_id,
            title: row.title,
            author: row.author,
            xp_gained: row.xp_gained.max(0) as u64,
            read_at: row.read_at,
        }
    }
}

impl CharacterRow {
    fn into_character(self, books_history: Vec<ReadingEntry>) -> Character {
        Character {
            name: self.name,
            avatar: self.avatar,
            level: self.level.max(1) as u32,
            xp: self.xp.max(0) as u64,
            xp_to_next_level: self.xp_to_next_level.max(1) as u64,
            books_read_count: self.books_read_count.max(0) as u32,
            books_read_ids: self.books_read_ids.0,
            books_history,
            coins: self.coins.max(0) as u64,
            inventory: self.inventory.0,
            equipped: self.equipped.0,
            last_reward_dates: self.last_reward_dates.0,
            revision: self.revision.max(0) as u64,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn to_db(value: u64, field: &str) -> Result<i64, DomainError> {
    i64::try_from(value)
        .map_err(|_| DomainError::Validation(format!("{field} out of range: {value}")))
}

fn to_db_i32(value: u32, field: &str) -> Result<i32, DomainError> {
    i32::try_from(value)
        .map_err(|_| DomainError::Validation(format!("{field} out of range: {value}")))
}

fn repo_err(e: sqlx::Error) -> DomainError {
    DomainError::Repository(e.to_string())
}

/// Entries past what is already stored. History is append-only, so the
/// stored rows are always a prefix of the snapshot's history.
fn unsaved_tail(entries: &[ReadingEntry], stored: usize) -> &[ReadingEntry] {
    entries.get(stored..).unwrap_or_default()
}

/// Insert the history entries not yet stored in one statement
async fn append_history(
    tx: &mut Transaction<'_, Postgres>,
    user_id: &str,
    entries: &[ReadingEntry],
) -> Result<(), DomainError> {
    let stored = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM reading_history WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await
    .map_err(repo_err)?;

    let tail = unsaved_tail(entries, usize::try_from(stored).unwrap_or(0));
    if tail.is_empty() {
        return Ok(());
    }

    let mut book_ids = Vec::with_capacity(tail.len());
    let mut titles = Vec::with_capacity(tail.len());
    let mut authors = Vec::with_capacity(tail.len());
    let mut xp = Vec::with_capacity(tail.len());
    let mut read_at = Vec::with_capacity(tail.len());
    for entry in tail {
        book_ids.push(entry.id.clone());
        titles.push(entry.title.clone());
        authors.push(entry.author.clone());
        xp.push(to_db(entry.xp_gained, "xp_gained")?);
        read_at.push(entry.read_at);
    }

    sqlx::query(
        r#"
        INSERT INTO reading_history (user_id, book_id, title, author, xp_gained, read_at)
        SELECT $1::text, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::bigint[], $6::timestamptz[])
        ON CONFLICT (user_id, book_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(&book_ids)
    .bind(&titles)
    .bind(&authors)
    .bind(&xp)
    .bind(&read_at)
    .execute(&mut **tx)
    .await
    .map_err(repo_err)?;

    Ok(())
}

#[async_trait]
impl CharacterRepository for PgCharacterRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Character>, DomainError> {
        let row = sqlx::query_as::<_, CharacterRow>("SELECT * FROM characters WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(repo_err)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let history = sqlx::query_as::<_, HistoryRow>(
            r#"
            SELECT book_id, title, author, xp_gained, read_at
            FROM reading_history
            WHERE user_id = $1
            ORDER BY read_at ASC, id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(repo_err)?;

        Ok(Some(row.into_character(
            history.into_iter().map(Into::into).collect(),
        )))
    }

    async fn create(&self, user_id: &str, character: &Character) -> Result<Character, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let row = sqlx::query_as::<_, CharacterRow>(
            r#"
            INSERT INTO characters (
                user_id, name, avatar, level, xp, xp_to_next_level, books_read_count,
                books_read_ids, coins, inventory, equipped, last_reward_dates, revision
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, 0)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&character.name)
        .bind(&character.avatar)
        .bind(to_db_i32(character.level, "level")?)
        .bind(to_db(character.xp, "xp")?)
        .bind(to_db(character.xp_to_next_level, "xp_to_next_level")?)
        .bind(to_db_i32(character.books_read_count, "books_read_count")?)
        .bind(Json(&character.books_read_ids))
        .bind(to_db(character.coins, "coins")?)
        .bind(Json(&character.inventory))
        .bind(Json(&character.equipped))
        .bind(Json(&character.last_reward_dates))
        .fetch_optional(&mut *tx)
        .await
        .map_err(repo_err)?
        .ok_or_else(|| DomainError::Conflict(format!("user {user_id} already has a character")))?;

        append_history(&mut tx, user_id, &character.books_history).await?;
        tx.commit().await.map_err(repo_err)?;

        Ok(row.into_character(character.books_history.clone()))
    }

    async fn save(&self, user_id: &str, character: &Character) -> Result<Character, DomainError> {
        let mut tx = self.pool.begin().await.map_err(repo_err)?;

        let row = sqlx::query_as::<_, CharacterRow>(
            r#"
            UPDATE characters
            SET name = $2, avatar = $3, level = $4, xp = $5, xp_to_next_level = $6,
                books_read_count = $7, books_read_ids = $8, coins = $9, inventory = $10,
                equipped = $11, last_reward_dates = $12,
                revision = revision + 1, updated_at = NOW()
            WHERE user_id = $1 AND revision = $13
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&character.name)
        .bind(&character.avatar)
        .bind(to_db_i32(character.level, "level")?)
        .bind(to_db(character.xp, "xp")?)
        .bind(to_db(character.xp_to_next_level, "xp_to_next_level")?)
        .bind(to_db_i32(character.books_read_count, "books_read_count")?)
        .bind(Json(&character.books_read_ids))
        .bind(to_db(character.coins, "coins")?)
        .bind(Json(&character.inventory))
        .bind(Json(&character.equipped))
        .bind(Json(&character.last_reward_dates))
        .bind(to_db(character.revision, "revision")?)
        .fetch_optional(&mut *tx)
        .await
        .map_err(repo_err)?;

        let Some(row) = row else {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM characters WHERE user_id = $1)",
            )
            .bind(user_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(repo_err)?;

            return Err(if exists {
                DomainError::Conflict(format!(
                    "character of {user_id} changed since revision {}",
                    character.revision
                ))
            } else {
                DomainError::not_found("Character", user_id)
            });
        };

        append_history(&mut tx, user_id, &character.books_history).await?;
        tx.commit().await.map_err(repo_err)?;

        Ok(row.into_character(character.books_history.clone()))
    }

    async fn delete(&self, user_id: &str) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM characters WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected() > 0)
    }
}
