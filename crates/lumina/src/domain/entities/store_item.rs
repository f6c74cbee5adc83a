//! StoreItem - Cosmetics and consumables sold for coins
//!
//! Pure domain entity without infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{EquipSlot, Rarity};

/// What an item does once bought
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    /// Kept in the inventory and worn in a slot
    Cosmetic { slot: EquipSlot },
    /// Consumed on purchase, grants experience
    XpBoost { amount: u64 },
    /// Consumed on purchase, grants one level
    LevelUp,
}

/// StoreItem - An entry of the static store catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreItem {
    pub id: String,
    pub name: String,
    pub price: u64,
    pub rarity: Rarity,
    pub kind: ItemKind,
    #[serde(default)]
    pub description: String,
}

impl StoreItem {
    fn new(id: &str, name: &str, price: u64, rarity: Rarity, kind: ItemKind, description: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            rarity,
            kind,
            description: description.to_string(),
        }
    }

    pub fn is_consumable(&self) -> bool {
        !matches!(self.kind, ItemKind::Cosmetic { .. })
    }

    pub fn slot(&self) -> Option<EquipSlot> {
        match self.kind {
            ItemKind::Cosmetic { slot } => Some(slot),
            ItemKind::XpBoost { .. } | ItemKind::LevelUp => None,
        }
    }

    /// Store tab the item is listed under
    pub fn category(&self) -> String {
        match self.slot() {
            Some(slot) => slot.to_string(),
            None => "magic".to_string(),
        }
    }

    /// The items on sale in the Emporium
    pub fn catalog() -> Vec<StoreItem> {
        use EquipSlot::*;
        use ItemKind::*;

        vec![
            Self::new("hat_wizard", "Arcane Hat", 500, Rarity::Rare, Cosmetic { slot: Hat }, "Woven with threads of pure magic."),
            Self::new("hat_cap", "Urban Cap", 150, Rarity::Common, Cosmetic { slot: Hat }, "Ideal for reading on the subway."),
            Self::new("hat_crown", "Royal Crown", 5000, Rarity::Legendary, Cosmetic { slot: Hat }, "Only for the true monarchs of reading."),
            Self::new("hat_cowboy", "Cowboy Hat", 300, Rarity::Common, Cosmetic { slot: Hat }, "Yee-haw, western novel."),
            Self::new("glasses_sun", "Sunglasses", 200, Rarity::Common, Cosmetic { slot: Glasses }, "Shields your eyes from the glare of wisdom."),
            Self::new("glasses_nerd", "Scholar Glasses", 100, Rarity::Common, Cosmetic { slot: Glasses }, "+10 perceived intelligence."),
            Self::new("glasses_vr", "Future Visor", 1200, Rarity::Rare, Cosmetic { slot: Glasses }, "Read in the metaverse."),
            Self::new("mask_fox", "Kitsune Mask", 800, Rarity::Rare, Cosmetic { slot: Beard }, "Cunning as a fox."),
            Self::new("beard_santa", "Sage Beard", 400, Rarity::Common, Cosmetic { slot: Beard }, "Grey hairs earned with experience."),
            Self::new("potion_xp", "Potion of Insight", 300, Rarity::Epic, XpBoost { amount: 500 }, "+500 XP instantly. Tastes like ink."),
            Self::new("scroll_levelup", "Scroll of Ascension", 2000, Rarity::Legendary, LevelUp, "Raises one full level. Forbidden magic."),
        ]
    }

    pub fn find_in_catalog(item_id: &str) -> Option<StoreItem> {
        Self::catalog().into_iter().find(|item| item.id == item_id)
    }
}
