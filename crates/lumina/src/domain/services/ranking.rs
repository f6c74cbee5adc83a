//! Recommendation ranking
//!
//! Scores a whole catalog against a profile and keeps the best matches.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{Book, Profile};
use crate::domain::errors::DomainError;
use crate::domain::services::scoring;

pub const MAX_RECOMMENDATIONS: usize = 10;

/// A catalog book with its match against a profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredBook {
    #[serde(flatten)]
    pub book: Book,
    /// Unrounded score used for ordering
    pub score: f64,
    pub similarity: f64,
    /// Human-readable justification
    pub rationale: String,
}

impl ScoredBook {
    /// Score rounded to the nearest integer, halves rounding up
    pub fn display_score(&self) -> i64 {
        (self.score + 0.5).floor() as i64
    }

    pub fn similarity_percent(&self) -> i64 {
        similarity_percent(self.similarity)
    }
}

fn similarity_percent(similarity: f64) -> i64 {
    (similarity * 100.0).round() as i64
}

/// Rank `catalog` for `profile`, best first, at most [`MAX_RECOMMENDATIONS`].
///
/// Equal scores keep their catalog order. Fails with
/// [`DomainError::Validation`] when the profile has no usable tag.
pub fn rank(profile: &Profile, catalog: &[Book]) -> Result<Vec<ScoredBook>, DomainError> {
    if profile.normalized_tags().is_empty() {
        return Err(DomainError::Validation(
            "profile must include at least 1 tag".to_string(),
        ));
    }

    let mut scored: Vec<ScoredBook> = catalog
        .iter()
        .map(|book| {
            let m = scoring::score(profile, book);
            ScoredBook {
                book: book.clone(),
                score: m.score,
                similarity: m.similarity,
                rationale: format!(
                    "Matches your interests at {}%",
                    similarity_percent(m.similarity)
                ),
            }
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored.truncate(MAX_RECOMMENDATIONS);

    Ok(scored)
}
