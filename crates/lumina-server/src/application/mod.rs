//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod character_service;
mod locks;
mod recommendation_service;

pub use character_service::{CharacterService, Outcome};
pub use locks::UserLocks;
pub use recommendation_service::RecommendationService;
