//! Economy rules
//!
//! Coins earned by reading, purchases from the store and equipping cosmetics.
//! Every operation checks all of its rules before changing anything, so a
//! rejection never leaves a half-applied transaction behind.

use serde::{Deserialize, Serialize};

use crate::domain::entities::{BookMeta, Character, ItemKind, StoreItem};
use crate::domain::errors::Rejection;
use crate::domain::services::progression;
use crate::domain::value_objects::EquipSlot;

pub const BASE_BOOK_COINS: u64 = 50;
pub const COINS_PER_DIFFICULTY: u64 = 10;
/// Difficulty assumed for coin rewards when a book does not declare one
pub const DEFAULT_COIN_DIFFICULTY: u8 = 1;

/// Effect applied by a consumable at purchase time
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum AppliedEffect {
    XpBoost { amount: u64, levels_gained: u32 },
    LevelUp { level: u32 },
}

/// Receipt of a successful purchase
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Purchase {
    pub item_id: String,
    pub price: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect: Option<AppliedEffect>,
}

impl Purchase {
    pub fn message(&self) -> String {
        match &self.effect {
            None => format!("Purchased {}", self.item_id),
            Some(AppliedEffect::XpBoost { amount, .. }) => {
                format!("Effect applied: +{} XP", amount)
            }
            Some(AppliedEffect::LevelUp { level }) => {
                format!("Effect applied: reached level {}", level)
            }
        }
    }
}

/// `50 + difficulty * 10`
pub fn coins_for_book(book: &BookMeta) -> u64 {
    let difficulty = book.difficulty.unwrap_or(DEFAULT_COIN_DIFFICULTY) as u64;
    BASE_BOOK_COINS + difficulty * COINS_PER_DIFFICULTY
}

/// Add the coin reward for a finished book.
///
/// Only the ledger calls this, after it has ruled out a duplicate credit.
pub(crate) fn award_coins_for_book(character: &mut Character, book: &BookMeta) -> u64 {
    let coins = coins_for_book(book);
    character.coins = character.coins.saturating_add(coins);
    coins
}

/// Buy `item`.
///
/// Cosmetics go to the inventory and can be bought once. Consumables are
/// applied immediately and never stored.
pub fn purchase(character: &Character, item: &StoreItem) -> Result<(Character, Purchase), Rejection> {
    if character.coins < item.price {
        return Err(Rejection::InsufficientFunds {
            price: item.price,
            balance: character.coins,
        });
    }
    if !item.is_consumable() && character.owns(&item.id) {
        return Err(Rejection::AlreadyOwned {
            item_id: item.id.clone(),
        });
    }

    let mut next = character.clone();
    next.coins -= item.price;

    let effect = match item.kind {
        ItemKind::Cosmetic { .. } => {
            next.inventory.insert(item.id.clone());
            None
        }
        ItemKind::XpBoost { amount } => {
            let levels_gained = progression::grant_xp(&mut next, amount);
            Some(AppliedEffect::XpBoost {
                amount,
                levels_gained,
            })
        }
        ItemKind::LevelUp => {
            progression::grant_level(&mut next);
            Some(AppliedEffect::LevelUp { level: next.level })
        }
    };

    let receipt = Purchase {
        item_id: item.id.clone(),
        price: item.price,
        effect,
    };
    Ok((next, receipt))
}

/// Wear an owned item in `slot`, or clear the slot with `None`.
///
/// Equipping replaces whatever the slot held before.
pub fn equip(
    character: &Character,
    slot: EquipSlot,
    item_id: Option<&str>,
) -> Result<Character, Rejection> {
    let mut next = character.clone();
    match item_id {
        None => {
            next.equipped.remove(&slot);
        }
        Some(id) => {
            if !character.owns(id) {
                return Err(Rejection::NotOwned {
                    item_id: id.to_string(),
                });
            }
            next.equipped.insert(slot, id.to_string());
        }
    }
    Ok(next)
}
