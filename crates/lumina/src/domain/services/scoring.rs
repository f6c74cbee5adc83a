//! Similarity scoring between a profile and a book
//!
//! The score starts from the Jaccard overlap of the two tag sets (scaled to
//! 0-100) and is adjusted by a few preference rules. It is signed and never
//! clamped.

use std::collections::HashSet;

use crate::domain::entities::{Book, Profile, DEFAULT_DIFFICULTY};
use crate::domain::services::tags;
use crate::domain::value_objects::Goal;

/// Books longer than this are penalized for readers who prefer short books
pub const LONG_BOOK_PAGES: u32 = 400;
pub const LONG_BOOK_PENALTY: f64 = 20.0;
pub const TOO_DIFFICULT_PENALTY: f64 = 25.0;
pub const KNOWLEDGE_GOAL_BONUS: f64 = 8.0;
pub const ENTERTAIN_GOAL_BONUS: f64 = 6.0;

const KNOWLEDGE_TAGS: &[&str] = &["non-fiction", "productivity", "no ficcion", "productividad"];
const ENTERTAIN_TAGS: &[&str] = &[
    "adventure",
    "suspense",
    "fantasy",
    "aventura",
    "suspenso",
    "fantasía",
];

/// Result of scoring a single book
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub score: f64,
    /// Jaccard index of the tag sets, in `0.0..=1.0`
    pub similarity: f64,
}

/// Jaccard index `|A ∩ B| / |A ∪ B|`, defined as 0 when both sets are empty
pub fn jaccard<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let a: HashSet<&str> = a.iter().map(AsRef::as_ref).collect();
    let b: HashSet<&str> = b.iter().map(AsRef::as_ref).collect();

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = a.intersection(&b).count();
    intersection as f64 / union as f64
}

/// Score a book against a profile
pub fn score(profile: &Profile, book: &Book) -> MatchScore {
    let profile_tags = profile.normalized_tags();
    let book_tags = tags::normalize_set(&book.tags);

    let similarity = jaccard(&profile_tags, &book_tags);
    let mut score = similarity * 100.0;

    if profile.prefers_short && book.pages.unwrap_or(0) > LONG_BOOK_PAGES {
        score -= LONG_BOOK_PENALTY;
    }

    if book.difficulty.unwrap_or(DEFAULT_DIFFICULTY) > profile.effective_difficulty_max() {
        score -= TOO_DIFFICULT_PENALTY;
    }

    let has_any = |wanted: &[&str]| book_tags.iter().any(|t| wanted.contains(&t.as_str()));
    if profile.goal.seeks_knowledge() && has_any(KNOWLEDGE_TAGS) {
        score += KNOWLEDGE_GOAL_BONUS;
    }
    if profile.goal == Goal::Entertain && has_any(ENTERTAIN_TAGS) {
        score += ENTERTAIN_GOAL_BONUS;
    }

    MatchScore { score, similarity }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(tags: &[&str]) -> Profile {
        Profile {
            goal: Goal::Habit,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..Profile::default()
        }
    }

    fn book(tags: &[&str], pages: Option<u32>, difficulty: Option<u8>) -> Book {
        Book {
            id: "b1".to_string(),
            title: "Title".to_string(),
            author: "Author".to_string(),
            pages,
            difficulty,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_jaccard_properties() {
        let a = ["misterio", "suspenso"];
        let b = ["misterio", "thriller", "terror"];
        assert_eq!(jaccard(&a, &b), jaccard(&b, &a));
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &["romance"]), 0.0);
        let empty: [&str; 0] = [];
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
    }

    #[test]
    fn test_worked_example_long_book_penalty() {
        let p = Profile {
            prefers_short: true,
            difficulty_max: Some(3),
            ..profile(&["misterio", "suspenso"])
        };
        let b = book(&["misterio", "thriller"], Some(500), Some(2));
        let m = score(&p, &b);
        assert!((m.similarity - 1.0 / 3.0).abs() < 1e-9);
        assert!((m.score - (100.0 / 3.0 - 20.0)).abs() < 1e-9);
        assert_eq!(m.score.round(), 13.0);
    }

    #[test]
    fn test_difficulty_defaults() {
        // Unset difficulty is 3, unset ceiling is 5
        let p = profile(&["a"]);
        let b = book(&["a"], None, None);
        assert_eq!(score(&p, &b).score, 100.0);

        let capped = Profile {
            difficulty_max: Some(2),
            ..profile(&["a"])
        };
        assert_eq!(score(&capped, &b).score, 75.0);
    }

    #[test]
    fn test_score_may_go_negative() {
        let p = Profile {
            prefers_short: true,
            difficulty_max: Some(1),
            ..profile(&["romance"])
        };
        let b = book(&["historia"], Some(900), Some(5));
        assert_eq!(score(&p, &b).score, -45.0);
    }

    #[test]
    fn test_goal_bonuses() {
        let learn = Profile {
            goal: Goal::Learn,
            ..profile(&["x"])
        };
        assert_eq!(score(&learn, &book(&["Non-Fiction"], None, None)).score, 8.0);
        assert_eq!(score(&learn, &book(&["adventure"], None, None)).score, 0.0);

        let fun = Profile {
            goal: Goal::Entertain,
            ..profile(&["x"])
        };
        assert_eq!(score(&fun, &book(&["aventura"], None, None)).score, 6.0);
        assert_eq!(score(&fun, &book(&["productivity"], None, None)).score, 0.0);
    }

    #[test]
    fn test_tags_compared_in_canonical_form() {
        let p = profile(&[" MISTERIO "]);
        let b = book(&["misterio"], None, None);
        assert_eq!(score(&p, &b).similarity, 1.0);
    }
}
