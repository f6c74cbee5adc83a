//! Domain Errors
//!
//! Error types for domain operations.
//!
//! Business-rule rejections (duplicate credit, insufficient funds, ...) are
//! ordinary values of [`Rejection`]; callers report them back to the user
//! instead of treating them as failures of the system.

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::value_objects::{EquipSlot, RewardAction};

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Rejected: {0}")]
    Rejected(#[from] Rejection),
}

impl DomainError {
    pub fn not_found<T: AsRef<str>>(entity_type: T, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.as_ref().to_string(),
            id: id.to_string(),
        }
    }
}

/// A business rule refused the requested transition.
///
/// The character snapshot the operation was applied to is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("book {book_id} was already credited")]
    AlreadyRead { book_id: String },

    #[error("insufficient funds: item costs {price}, balance is {balance}")]
    InsufficientFunds { price: u64, balance: u64 },

    #[error("item {item_id} is already owned")]
    AlreadyOwned { item_id: String },

    #[error("item {item_id} is not owned")]
    NotOwned { item_id: String },

    #[error("item {item_id} cannot be equipped in the {slot} slot")]
    WrongSlot { item_id: String, slot: EquipSlot },

    #[error("unknown store item {item_id}")]
    UnknownItem { item_id: String },

    #[error("{action} reward already granted on {date}")]
    AlreadyRewardedToday { action: RewardAction, date: NaiveDate },
}

impl Rejection {
    /// Stable machine-readable code for API clients
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::AlreadyRead { .. } => "already_read",
            Rejection::InsufficientFunds { .. } => "insufficient_funds",
            Rejection::AlreadyOwned { .. } => "already_owned",
            Rejection::NotOwned { .. } => "not_owned",
            Rejection::WrongSlot { .. } => "wrong_slot",
            Rejection::UnknownItem { .. } => "unknown_item",
            Rejection::AlreadyRewardedToday { .. } => "already_rewarded_today",
        }
    }
}
