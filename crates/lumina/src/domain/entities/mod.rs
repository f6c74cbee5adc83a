//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Profile: Declared reading preferences
//! - Book: Catalog item
//! - Character: The reader's progression record
//! - StoreItem: Cosmetics and consumables bought with coins

mod book;
mod character;
mod profile;
mod store_item;

pub use book::*;
pub use character::*;
pub use profile::*;
pub use store_item::*;
