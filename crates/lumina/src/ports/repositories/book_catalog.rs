//! Book Catalog Port
//!
//! Read-only access to the externally supplied book catalog.

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Book};

/// Source of catalog books
///
/// `list` must return books in a stable order: ranking ties are broken by
/// catalog position.
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// All books, in catalog order
    async fn list(&self) -> Result<Vec<Book>, DomainError>;

    /// Find a book by ID
    async fn find(&self, id: &str) -> Result<Option<Book>, DomainError>;
}
