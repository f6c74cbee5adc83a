//! EquipSlot - Cosmetic attachment point on the avatar

use serde::{Deserialize, Serialize};

/// Avatar slot holding at most one equipped item
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EquipSlot {
    Hat,
    Glasses,
    /// Beards and masks share the face slot
    Beard,
}

impl EquipSlot {
    pub const ALL: [EquipSlot; 3] = [EquipSlot::Hat, EquipSlot::Glasses, EquipSlot::Beard];
}

impl std::fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EquipSlot::Hat => write!(f, "hat"),
            EquipSlot::Glasses => write!(f, "glasses"),
            EquipSlot::Beard => write!(f, "beard"),
        }
    }
}

impl std::str::FromStr for EquipSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hat" => Ok(EquipSlot::Hat),
            "glasses" => Ok(EquipSlot::Glasses),
            "beard" | "mask" | "face" => Ok(EquipSlot::Beard),
            _ => Err(format!("Unknown equip slot: {}", s)),
        }
    }
}
