//! PostgreSQL implementation of ProfileRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use lumina::{DomainError, Goal, Profile, ProfileRepository};

/// PostgreSQL implementation of ProfileRepository
pub struct PgProfileRepository {
    pool: PgPool,
}

impl PgProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ProfileRow {
    age: i32,
    minutes_per_day: i32,
    goal: String,
    prefers_short: bool,
    difficulty_max: Option<i16>,
    tags: Json<Vec<String>>,
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            age: row.age.max(0) as u32,
            minutes_per_day: row.minutes_per_day.max(0) as u32,
            goal: row.goal.parse::<Goal>().unwrap_or_else(|e| {
                tracing::warn!("Stored profile has {}, using default goal", e);
                Goal::default()
            }),
            prefers_short: row.prefers_short,
            difficulty_max: row.difficulty_max.and_then(|d| u8::try_from(d).ok()),
            tags: row.tags.0,
        }
    }
}

#[async_trait]
impl ProfileRepository for PgProfileRepository {
    async fn find(&self, user_id: &str) -> Result<Option<Profile>, DomainError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT age, minutes_per_day, goal, prefers_short, difficulty_max, tags
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.map(Into::into))
    }

    async fn save(&self, user_id: &str, profile: &Profile) -> Result<Profile, DomainError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            INSERT INTO profiles (user_id, age, minutes_per_day, goal, prefers_short, difficulty_max, tags)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE
            SET age = EXCLUDED.age,
                minutes_per_day = EXCLUDED.minutes_per_day,
                goal = EXCLUDED.goal,
                prefers_short = EXCLUDED.prefers_short,
                difficulty_max = EXCLUDED.difficulty_max,
                tags = EXCLUDED.tags,
                updated_at = NOW()
            RETURNING age, minutes_per_day, goal, prefers_short, difficulty_max, tags
            "#,
        )
        .bind(user_id)
        .bind(i32::try_from(profile.age).unwrap_or(i32::MAX))
        .bind(i32::try_from(profile.minutes_per_day).unwrap_or(i32::MAX))
        .bind(profile.goal.to_string())
        .bind(profile.prefers_short)
        .bind(profile.difficulty_max.map(i16::from))
        .bind(Json(&profile.tags))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(row.into())
    }
}
