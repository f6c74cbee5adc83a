//! Book - Catalog item
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

/// Difficulty assumed when a book does not declare one
pub const DEFAULT_DIFFICULTY: u8 = 3;

/// Book - An immutable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    /// Difficulty from 1 (easy) to 5 (demanding)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// The parts of a book needed to credit a read
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct BookMeta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<u8>,
}

impl Book {
    pub fn meta(&self) -> BookMeta {
        BookMeta::from(self)
    }
}

impl From<&Book> for BookMeta {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            pages: book.pages,
            difficulty: book.difficulty,
        }
    }
}
