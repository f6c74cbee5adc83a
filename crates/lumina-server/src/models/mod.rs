//! Lumina API Data Models
//!
//! - Recommendation: ranked catalog books
//! - Profile: declared reading preferences
//! - Character: the reader's progression record
//! - Store: cosmetics and consumables

mod character;
mod profile;
mod recommendation;
mod store;

pub use character::*;
pub use profile::*;
pub use recommendation::*;
pub use store::*;
