//! Value Objects
//!
//! Immutable objects defined by their attributes rather than identity.

mod equip_slot;
mod goal;
mod rarity;
mod reward_action;

pub use equip_slot::*;
pub use goal::*;
pub use rarity::*;
pub use reward_action::*;
