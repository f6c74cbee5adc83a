//! Lumina Domain Library
//!
//! Core domain types and rules for the Lumina reading companion: tag-based
//! book recommendations and the reader's character progression.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (Profile, Book, Character, StoreItem)
//!   - `value_objects/`: Immutable value types (Goal, EquipSlot, Rarity, RewardAction)
//!   - `services/`: Scoring, ranking, progression, economy and throttling rules
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: External service interfaces
//!
//! # Usage
//!
//! ```rust,ignore
//! use lumina::domain::services::{progression, ranking};
//! use lumina::{Book, Character, Profile};
//!
//! let recommendations = ranking::rank(&profile, &catalog)?;
//! let (character, credit) = progression::credit_book_read(&character, "b1", &meta, now)?;
//! ```

pub mod domain;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Badge, Book, BookMeta, Character, DailyThrottle, DomainError, EquipSlot, Goal, ItemKind,
    Profile, Rarity, ReadingEntry, Rejection, RewardAction, ScoredBook, StoreItem,
};
pub use ports::{
    // Repositories
    BookCatalog,
    CharacterRepository,
    ProfileRepository,
    // Services
    MirrorEvent,
    MirrorEventKind,
    ProgressMirror,
};
