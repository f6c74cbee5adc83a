//! Repository Ports
//!
//! Abstract interfaces for data persistence operations.

mod book_catalog;
mod character_repository;
mod profile_repository;

pub use book_catalog::*;
pub use character_repository::*;
pub use profile_repository::*;
