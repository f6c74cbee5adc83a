//! Recommendation DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lumina::{Book, ScoredBook};

use super::CharacterResponse;

/// Catalog book
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub difficulty: Option<u8>,
    pub tags: Vec<String>,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            author: book.author,
            pages: book.pages,
            difficulty: book.difficulty,
            tags: book.tags,
        }
    }
}

/// A recommended book
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationResponse {
    pub id: String,
    pub title: String,
    pub author: String,
    pub pages: Option<u32>,
    pub difficulty: Option<u8>,
    pub tags: Vec<String>,
    /// Why the book was picked
    pub why: String,
    /// Match score rounded to the nearest integer (may be negative)
    pub score: i64,
}

impl From<ScoredBook> for RecommendationResponse {
    fn from(scored: ScoredBook) -> Self {
        let score = scored.display_score();
        Self {
            id: scored.book.id,
            title: scored.book.title,
            author: scored.book.author,
            pages: scored.book.pages,
            difficulty: scored.book.difficulty,
            tags: scored.book.tags,
            why: scored.rationale,
            score,
        }
    }
}

/// Ranked recommendations, best first
#[derive(Debug, Serialize, ToSchema)]
pub struct RecommendationsResponse {
    pub recommendations: Vec<RecommendationResponse>,
    pub count: usize,
}

impl From<Vec<ScoredBook>> for RecommendationsResponse {
    fn from(ranked: Vec<ScoredBook>) -> Self {
        let recommendations: Vec<RecommendationResponse> =
            ranked.into_iter().map(Into::into).collect();
        Self {
            count: recommendations.len(),
            recommendations,
        }
    }
}

/// Generate recommendations for a stored profile
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UserRecommendationsRequest {
    /// Client's local date, used for the daily bonus (default: server local date)
    pub today: Option<NaiveDate>,
}

/// Recommendations plus the daily bonus outcome
#[derive(Debug, Serialize, ToSchema)]
pub struct UserRecommendationsResponse {
    pub recommendations: Vec<RecommendationResponse>,
    pub count: usize,
    /// Whether today's recommendation bonus was granted by this request
    pub bonus_granted: bool,
    pub xp_gained: u64,
    pub levels_gained: u32,
    /// Present when the user has a character
    pub character: Option<CharacterResponse>,
}
