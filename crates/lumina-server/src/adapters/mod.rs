//! Infrastructure Adapters
//!
//! Implementations of domain ports for external systems.

pub mod catalog;
pub mod memory;
pub mod mirror;
pub mod postgres;

// Re-exports
pub use catalog::StaticBookCatalog;
pub use memory::{InMemoryCharacterRepository, InMemoryProfileRepository};
pub use mirror::{HttpProgressMirror, MirrorConfig};
pub use postgres::{PgCharacterRepository, PgProfileRepository};
