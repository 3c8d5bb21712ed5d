//! Item categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of an item that can sit in a hand or a storage slot
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Nothing (empty hand or slot)
    Air,

    // Heavy blocks
    NetheriteBlock,
    DiamondBlock,
    IronBlock,
    GoldBlock,
    Anvil,

    // Containers and utility blocks
    Chest,
    EnderChest,
    Barrel,
    Hopper,
    ShulkerBox,
    Beacon,

    // Workstations
    Campfire,
    Furnace,
    BlastFurnace,
    Smoker,
    CraftingTable,

    Cobblestone,

    // Everyday items without a configured weight
    Saddle,
    Dirt,
    Wheat,
    Cactus,
    Torch,
}

impl ItemType {
    /// Every known item type, in declaration order
    pub const ALL: [ItemType; 23] = [
        ItemType::Air,
        ItemType::NetheriteBlock,
        ItemType::DiamondBlock,
        ItemType::IronBlock,
        ItemType::GoldBlock,
        ItemType::Anvil,
        ItemType::Chest,
        ItemType::EnderChest,
        ItemType::Barrel,
        ItemType::Hopper,
        ItemType::ShulkerBox,
        ItemType::Beacon,
        ItemType::Campfire,
        ItemType::Furnace,
        ItemType::BlastFurnace,
        ItemType::Smoker,
        ItemType::CraftingTable,
        ItemType::Cobblestone,
        ItemType::Saddle,
        ItemType::Dirt,
        ItemType::Wheat,
        ItemType::Cactus,
        ItemType::Torch,
    ];

    /// Stable snake_case name (matches the serde representation)
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Air => "air",
            ItemType::NetheriteBlock => "netherite_block",
            ItemType::DiamondBlock => "diamond_block",
            ItemType::IronBlock => "iron_block",
            ItemType::GoldBlock => "gold_block",
            ItemType::Anvil => "anvil",
            ItemType::Chest => "chest",
            ItemType::EnderChest => "ender_chest",
            ItemType::Barrel => "barrel",
            ItemType::Hopper => "hopper",
            ItemType::ShulkerBox => "shulker_box",
            ItemType::Beacon => "beacon",
            ItemType::Campfire => "campfire",
            ItemType::Furnace => "furnace",
            ItemType::BlastFurnace => "blast_furnace",
            ItemType::Smoker => "smoker",
            ItemType::CraftingTable => "crafting_table",
            ItemType::Cobblestone => "cobblestone",
            ItemType::Saddle => "saddle",
            ItemType::Dirt => "dirt",
            ItemType::Wheat => "wheat",
            ItemType::Cactus => "cactus",
            ItemType::Torch => "torch",
        }
    }

    /// Container items suppress the host's default interaction when held
    pub fn is_container(self) -> bool {
        self == ItemType::Chest
    }

    /// Largest stack a single slot can hold
    pub fn max_stack_size(self) -> u32 {
        match self {
            ItemType::Air => 0,
            ItemType::Saddle => 1,
            ItemType::ShulkerBox => 1,
            _ => 64,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known item type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item type: {0}")]
pub struct ParseItemError(pub String);

impl FromStr for ItemType {
    type Err = ParseItemError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ItemType::ALL
            .iter()
            .copied()
            .find(|item| item.name() == wanted)
            .ok_or_else(|| ParseItemError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_parse_back() {
        for item in ItemType::ALL {
            assert_eq!(item.name().parse::<ItemType>(), Ok(item));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("Iron_Block".parse::<ItemType>(), Ok(ItemType::IronBlock));
        assert_eq!(" chest ".parse::<ItemType>(), Ok(ItemType::Chest));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "obsidian".parse::<ItemType>().unwrap_err();
        assert_eq!(err.to_string(), "unknown item type: obsidian");
    }

    #[test]
    fn test_only_chest_is_container() {
        let containers: Vec<_> = ItemType::ALL
            .iter()
            .filter(|item| item.is_container())
            .collect();
        assert_eq!(containers, vec![&ItemType::Chest]);
    }

    #[test]
    fn test_serde_name_matches_display() {
        let ron = ron::to_string(&ItemType::BlastFurnace).unwrap();
        assert_eq!(ron, "blast_furnace");
        assert_eq!(ItemType::BlastFurnace.to_string(), "blast_furnace");
    }
}
