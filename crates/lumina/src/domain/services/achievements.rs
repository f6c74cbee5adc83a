//! Reading achievements derived from the character record

use serde::{Deserialize, Serialize};

use crate::domain::entities::Character;

/// A badge and whether the character has earned it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub emoji: String,
    pub unlocked: bool,
}

enum Requirement {
    BooksRead(u32),
    Level(u32),
}

const BADGES: &[(&str, &str, &str, Requirement)] = &[
    ("first-book", "First Book", "📖", Requirement::BooksRead(1)),
    ("five-books", "Novice Reader", "⭐", Requirement::BooksRead(5)),
    ("ten-books", "Advanced Reader", "🏆", Requirement::BooksRead(10)),
    ("level-5", "Expert", "👑", Requirement::Level(5)),
];

/// All badges, locked or not, in display order
pub fn badges(character: &Character) -> Vec<Badge> {
    BADGES
        .iter()
        .map(|(id, name, emoji, requirement)| Badge {
            id: id.to_string(),
            name: name.to_string(),
            emoji: emoji.to_string(),
            unlocked: match requirement {
                Requirement::BooksRead(n) => character.books_read_count >= *n,
                Requirement::Level(n) => character.level >= *n,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked(c: &Character) -> Vec<String> {
        badges(c)
            .into_iter()
            .filter(|b| b.unlocked)
            .map(|b| b.id)
            .collect()
    }

    #[test]
    fn test_new_character_has_no_badges() {
        let c = Character::new("Ada", None).unwrap();
        assert_eq!(badges(&c).len(), 4);
        assert!(unlocked(&c).is_empty());
    }

    #[test]
    fn test_thresholds() {
        let mut c = Character::new("Ada", None).unwrap();
        c.books_read_count = 5;
        assert_eq!(unlocked(&c), vec!["first-book", "five-books"]);

        c.books_read_count = 10;
        c.level = 5;
        assert_eq!(
            unlocked(&c),
            vec!["first-book", "five-books", "ten-books", "level-5"]
        );
    }
}
