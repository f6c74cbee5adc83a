//! PostgreSQL Repository Implementations

mod character_repository;
mod profile_repository;

pub use character_repository::PgCharacterRepository;
pub use profile_repository::PgProfileRepository;
