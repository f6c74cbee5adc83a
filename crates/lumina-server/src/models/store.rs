//! Store DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lumina::{ItemKind, StoreItem};

/// Store catalog entry
#[derive(Debug, Serialize, ToSchema)]
pub struct StoreItemResponse {
    pub id: String,
    pub name: String,
    pub price: u64,
    /// common | rare | epic | legendary
    pub rarity: String,
    /// hat | glasses | beard | magic
    pub category: String,
    /// Slot the item is worn in; absent for consumables
    pub slot: Option<String>,
    /// Consumables take effect at purchase and are not kept
    pub consumable: bool,
    /// Experience granted by an XP boost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xp_amount: Option<u64>,
    pub description: String,
}

impl From<&StoreItem> for StoreItemResponse {
    fn from(item: &StoreItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            price: item.price,
            rarity: item.rarity.to_string(),
            category: item.category(),
            slot: item.slot().map(|s| s.to_string()),
            consumable: item.is_consumable(),
            xp_amount: match item.kind {
                ItemKind::XpBoost { amount } => Some(amount),
                ItemKind::Cosmetic { .. } | ItemKind::LevelUp => None,
            },
            description: item.description.clone(),
        }
    }
}

/// Equip an item, or clear the slot with `null`
#[derive(Debug, Deserialize, ToSchema)]
pub struct EquipRequest {
    pub item_id: Option<String>,
}
