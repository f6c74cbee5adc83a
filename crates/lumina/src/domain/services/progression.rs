//! Progression ledger
//!
//! Experience, levels and the book-read record. Each operation takes the
//! current character snapshot and, when the rules allow it, returns the next
//! snapshot together with a receipt describing what was granted. A rejected
//! operation returns the reason and no snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{BookMeta, Character, ReadingEntry, DEFAULT_DIFFICULTY};
use crate::domain::errors::Rejection;
use crate::domain::services::economy;
use crate::domain::services::throttle::DailyThrottle;
use crate::domain::value_objects::RewardAction;

pub const BASE_BOOK_XP: u64 = 50;
pub const XP_PER_DIFFICULTY: u64 = 5;
/// Page count assumed for experience when a book does not declare one
pub const DEFAULT_PAGES_FOR_XP: u32 = 200;

/// What crediting a book granted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BookCredit {
    pub book_id: String,
    pub xp_gained: u64,
    pub coins_gained: u64,
    pub levels_gained: u32,
    pub level: u32,
}

/// What a throttled experience reward granted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct XpGrant {
    pub action: RewardAction,
    pub xp_gained: u64,
    pub levels_gained: u32,
    pub level: u32,
}

/// `50 + floor(pages / 10) + difficulty * 5`
pub fn xp_for_book(book: &BookMeta) -> u64 {
    let pages = book.pages.unwrap_or(DEFAULT_PAGES_FOR_XP) as u64;
    let difficulty = book.difficulty.unwrap_or(DEFAULT_DIFFICULTY) as u64;
    BASE_BOOK_XP + pages / 10 + difficulty * XP_PER_DIFFICULTY
}

/// Threshold after a level-up: `floor(threshold * 1.5)`
pub fn next_threshold(threshold: u64) -> u64 {
    threshold.saturating_add(threshold / 2)
}

/// Convert surplus experience into levels until `xp < xp_to_next_level`.
///
/// Returns the number of levels gained.
pub fn resolve_level_ups(character: &mut Character) -> u32 {
    // A zero threshold would never let the loop finish
    if character.xp_to_next_level == 0 {
        character.xp_to_next_level = 1;
    }

    let mut gained = 0;
    while character.xp >= character.xp_to_next_level {
        character.xp -= character.xp_to_next_level;
        character.level += 1;
        character.xp_to_next_level = next_threshold(character.xp_to_next_level);
        gained += 1;
    }
    gained
}

/// Add experience and resolve any level-ups it causes
pub(crate) fn grant_xp(character: &mut Character, amount: u64) -> u32 {
    character.xp = character.xp.saturating_add(amount);
    resolve_level_ups(character)
}

/// Raise one level directly, carrying current experience over
pub(crate) fn grant_level(character: &mut Character) -> u32 {
    character.level += 1;
    character.xp_to_next_level = next_threshold(character.xp_to_next_level.max(1));
    1 + resolve_level_ups(character)
}

/// Credit a finished book, at most once per book id.
pub fn credit_book_read(
    character: &Character,
    book_id: &str,
    book: &BookMeta,
    read_at: DateTime<Utc>,
) -> Result<(Character, BookCredit), Rejection> {
    if character.has_read(book_id) {
        return Err(Rejection::AlreadyRead {
            book_id: book_id.to_string(),
        });
    }

    let mut next = character.clone();
    next.books_read_ids.insert(book_id.to_string());
    next.books_read_count += 1;

    let xp_gained = xp_for_book(book);
    next.xp = next.xp.saturating_add(xp_gained);
    next.books_history.push(ReadingEntry {
        id: book_id.to_string(),
        title: book.title.clone(),
        author: book.author.clone(),
        read_at,
        xp_gained,
    });

    let coins_gained = economy::award_coins_for_book(&mut next, book);
    let levels_gained = resolve_level_ups(&mut next);

    let credit = BookCredit {
        book_id: book_id.to_string(),
        xp_gained,
        coins_gained,
        levels_gained,
        level: next.level,
    };
    Ok((next, credit))
}

/// Grant the daily bonus for generating recommendations.
///
/// Rejected with [`Rejection::AlreadyRewardedToday`] when it was already
/// granted on `today`.
pub fn credit_recommendation_generation(
    character: &Character,
    xp_amount: u64,
    today: NaiveDate,
) -> Result<(Character, XpGrant), Rejection> {
    let action = RewardAction::RecommendationBonus;
    let mut next = character.clone();

    if !DailyThrottle::new(&mut next.last_reward_dates).try_grant(action, today) {
        return Err(Rejection::AlreadyRewardedToday { action, date: today });
    }

    let levels_gained = grant_xp(&mut next, xp_amount);
    let grant = XpGrant {
        action,
        xp_gained: xp_amount,
        levels_gained,
        level: next.level,
    };
    Ok((next, grant))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn character() -> Character {
        Character::new("Reader", None).unwrap()
    }

    fn meta(pages: Option<u32>, difficulty: Option<u8>) -> BookMeta {
        BookMeta {
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            pages,
            difficulty,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_xp_formula_and_defaults() {
        assert_eq!(xp_for_book(&meta(Some(412), Some(4))), 50 + 41 + 20);
        assert_eq!(xp_for_book(&meta(None, None)), 50 + 20 + 15);
        assert_eq!(xp_for_book(&meta(Some(9), Some(1))), 55);
    }

    #[test]
    fn test_threshold_curve() {
        assert_eq!(next_threshold(100), 150);
        assert_eq!(next_threshold(150), 225);
        assert_eq!(next_threshold(225), 337);
        assert_eq!(next_threshold(337), 505);
    }

    #[test]
    fn test_worked_example_level_up() {
        let mut c = character();
        c.xp = 90;
        c.level = 2;
        // 50 + 0 + 2*5 = 60 xp
        let (next, credit) = credit_book_read(&c, "B1", &meta(Some(0), Some(2)), Utc::now()).unwrap();
        assert_eq!(credit.xp_gained, 60);
        assert_eq!(next.xp, 50);
        assert_eq!(next.level, 3);
        assert_eq!(next.xp_to_next_level, 150);
        assert_eq!(credit.levels_gained, 1);
        assert!(next.invariants_hold());
    }

    #[test]
    fn test_credit_records_history_and_coins() {
        let c = character();
        let read_at = Utc::now();
        let (next, credit) = credit_book_read(&c, "B1", &meta(Some(320), Some(4)), read_at).unwrap();

        assert!(next.has_read("B1"));
        assert_eq!(next.books_read_count, 1);
        assert_eq!(next.coins, 50 + 40);
        assert_eq!(credit.coins_gained, 90);
        assert_eq!(next.books_history.len(), 1);
        let entry = &next.books_history[0];
        assert_eq!(entry.id, "B1");
        assert_eq!(entry.title, "Dune");
        assert_eq!(entry.read_at, read_at);
        assert_eq!(entry.xp_gained, credit.xp_gained);
        // Original snapshot untouched
        assert_eq!(c.books_read_count, 0);
    }

    #[test]
    fn test_same_book_credited_once() {
        let c = character();
        let (after_first, _) = credit_book_read(&c, "B1", &meta(None, None), Utc::now()).unwrap();
        let err = credit_book_read(&after_first, "B1", &meta(None, None), Utc::now()).unwrap_err();
        assert_eq!(
            err,
            Rejection::AlreadyRead {
                book_id: "B1".to_string()
            }
        );
        assert_eq!(after_first.books_read_count, 1);
        assert_eq!(after_first.books_history.len(), 1);
    }

    #[test]
    fn test_large_gain_resolves_multiple_levels() {
        let mut c = character();
        let levels = grant_xp(&mut c, 100 + 150 + 225 + 10);
        assert_eq!(levels, 3);
        assert_eq!(c.level, 4);
        assert_eq!(c.xp, 10);
        assert_eq!(c.xp_to_next_level, 337);
        assert!(c.invariants_hold());
    }

    #[test]
    fn test_invariant_after_many_credits() {
        let mut c = character();
        for i in 0..200 {
            let (next, _) = credit_book_read(
                &c,
                &format!("book-{i}"),
                &meta(Some(i * 7), Some((i % 5) as u8 + 1)),
                Utc::now(),
            )
            .unwrap();
            assert!(next.invariants_hold());
            c = next;
        }
        assert_eq!(c.books_read_ids.len(), 200);
    }

    #[test]
    fn test_zero_threshold_is_repaired() {
        let mut c = character();
        c.xp_to_next_level = 0;
        c.xp = 3;
        resolve_level_ups(&mut c);
        assert!(c.invariants_hold());
    }

    #[test]
    fn test_recommendation_bonus_once_per_day() {
        let c = character();
        let (next, grant) = credit_recommendation_generation(&c, 25, today()).unwrap();
        assert_eq!(grant.xp_gained, 25);
        assert_eq!(next.xp, 25);

        let err = credit_recommendation_generation(&next, 25, today()).unwrap_err();
        assert!(matches!(err, Rejection::AlreadyRewardedToday { .. }));

        let tomorrow = today().succ_opt().unwrap();
        let (again, _) = credit_recommendation_generation(&next, 25, tomorrow).unwrap();
        assert_eq!(again.xp, 50);
    }

    #[test]
    fn test_recommendation_bonus_levels_up() {
        let mut c = character();
        c.xp = 95;
        let (next, grant) = credit_recommendation_generation(&c, 25, today()).unwrap();
        assert_eq!(grant.levels_gained, 1);
        assert_eq!(next.level, 2);
        assert_eq!(next.xp, 20);
        assert!(next.invariants_hold());
    }

    #[test]
    fn test_grant_level_keeps_xp() {
        let mut c = character();
        c.xp = 40;
        assert_eq!(grant_level(&mut c), 1);
        assert_eq!(c.level, 2);
        assert_eq!(c.xp, 40);
        assert_eq!(c.xp_to_next_level, 150);
    }
}
