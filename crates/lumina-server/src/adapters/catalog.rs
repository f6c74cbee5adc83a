//! Static book catalog
//!
//! The catalog ships with the server as a JSON array; its order is the
//! tie-break order of the ranking.

use async_trait::async_trait;

use lumina::{Book, BookCatalog, DomainError};

const BUNDLED_CATALOG: &str = include_str!("../../data/books.json");

/// In-memory catalog loaded once at startup
pub struct StaticBookCatalog {
    books: Vec<Book>,
}

impl StaticBookCatalog {
    pub fn new(books: Vec<Book>) -> Self {
        Self { books }
    }

    /// Parse a JSON array of books
    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        let books: Vec<Book> = serde_json::from_str(json)
            .map_err(|e| DomainError::Validation(format!("Invalid book catalog: {e}")))?;
        Ok(Self::new(books))
    }

    /// The catalog bundled with the server
    pub fn bundled() -> Result<Self, DomainError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }
}

#[async_trait]
impl BookCatalog for StaticBookCatalog {
    async fn list(&self) -> Result<Vec<Book>, DomainError> {
        Ok(self.books.clone())
    }

    async fn find(&self, id: &str) -> Result<Option<Book>, DomainError> {
        Ok(self.books.iter().find(|b| b.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_catalog_parses() {
        let catalog = StaticBookCatalog::bundled().unwrap();
        assert!(catalog.len() >= 10);
        assert!(catalog.books.iter().all(|b| !b.tags.is_empty()));
    }

    #[test]
    fn test_invalid_json_is_a_validation_error() {
        assert!(matches!(
            StaticBookCatalog::from_json("{not json"),
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_find_by_id() {
        let catalog = StaticBookCatalog::bundled().unwrap();
        let book = catalog.find("b004").await.unwrap().unwrap();
        assert_eq!(book.title, "El Hobbit");
        assert!(catalog.find("missing").await.unwrap().is_none());
    }
}
