//! Carry weights for stored items

use ahash::HashMap;

use crate::{ItemStack, ItemType};

/// Weight of any item the table does not list
pub const DEFAULT_ITEM_WEIGHT: f64 = 1.0;

/// Static mapping from item type to carry weight
///
/// Built once at startup and never modified afterwards.
#[derive(Debug, Clone)]
pub struct WeightTable {
    weights: HashMap<ItemType, f64>,
}

impl WeightTable {
    /// The fixed carry table used by carrier storage
    pub fn standard() -> Self {
        let mut table = Self {
            weights: HashMap::default(),
        };
        table.register_defaults();
        log::debug!("Registered {} item carry weights", table.len());
        table
    }

    fn register_defaults(&mut self) {
        // Precious blocks
        self.register(ItemType::NetheriteBlock, 100.0);
        self.register(ItemType::DiamondBlock, 64.0);
        self.register(ItemType::IronBlock, 32.0);
        self.register(ItemType::GoldBlock, 32.0);

        // Containers
        self.register(ItemType::Chest, 8.0);
        self.register(ItemType::EnderChest, 8.0);
        self.register(ItemType::Barrel, 8.0);
        self.register(ItemType::Hopper, 8.0);
        self.register(ItemType::ShulkerBox, 8.0);
        self.register(ItemType::Beacon, 8.0);

        // Workstations
        self.register(ItemType::Campfire, 4.0);
        self.register(ItemType::Furnace, 4.0);
        self.register(ItemType::BlastFurnace, 4.0);
        self.register(ItemType::Smoker, 4.0);
        self.register(ItemType::CraftingTable, 2.0);
        self.register(ItemType::Anvil, 32.0);

        self.register(ItemType::Cobblestone, 4.0);
    }

    fn register(&mut self, item: ItemType, weight: f64) {
        debug_assert!(weight >= 0.0, "carry weight must be nonnegative");
        self.weights.insert(item, weight);
    }

    /// Weight of one item of this type
    pub fn weight_of(&self, item: ItemType) -> f64 {
        self.weights
            .get(&item)
            .copied()
            .unwrap_or(DEFAULT_ITEM_WEIGHT)
    }

    /// Number of item types with an explicit weight
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Explicit weights, heaviest first
    pub fn iter(&self) -> impl Iterator<Item = (ItemType, f64)> {
        let mut entries: Vec<(ItemType, f64)> =
            self.weights.iter().map(|(item, w)| (*item, *w)).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries.into_iter()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Total weighted load of a set of storage slots
///
/// Each non-empty stack contributes `weight * amount`.
pub fn weighted_load<'a>(
    table: &WeightTable,
    slots: impl IntoIterator<Item = &'a Option<ItemStack>>,
) -> f64 {
    slots
        .into_iter()
        .flatten()
        .filter(|stack| !stack.is_empty())
        .map(|stack| table.weight_of(stack.item) * f64::from(stack.amount))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_has_seventeen_entries() {
        let table = WeightTable::standard();
        assert_eq!(table.len(), 17);
        for (_, weight) in table.iter() {
            assert!((2.0..=100.0).contains(&weight));
        }
    }

    #[test]
    fn test_known_weights() {
        let table = WeightTable::standard();
        assert_eq!(table.weight_of(ItemType::NetheriteBlock), 100.0);
        assert_eq!(table.weight_of(ItemType::IronBlock), 32.0);
        assert_eq!(table.weight_of(ItemType::Anvil), 32.0);
        assert_eq!(table.weight_of(ItemType::CraftingTable), 2.0);
    }

    #[test]
    fn test_unlisted_items_default_to_one() {
        let table = WeightTable::standard();
        assert_eq!(table.weight_of(ItemType::Dirt), DEFAULT_ITEM_WEIGHT);
        assert_eq!(table.weight_of(ItemType::Saddle), DEFAULT_ITEM_WEIGHT);
    }

    #[test]
    fn test_iter_is_heaviest_first() {
        let table = WeightTable::standard();
        let first = table.iter().next().unwrap();
        assert_eq!(first, (ItemType::NetheriteBlock, 100.0));
    }

    #[test]
    fn test_weighted_load_sums_stacks() {
        let table = WeightTable::standard();
        let slots = vec![
            Some(ItemStack::new(ItemType::IronBlock, 2)),
            None,
            Some(ItemStack::new(ItemType::Dirt, 10)),
            Some(ItemStack::new(ItemType::Air, 3)),
        ];
        assert_eq!(weighted_load(&table, &slots), 74.0);
    }

    #[test]
    fn test_weighted_load_of_empty_storage() {
        let table = WeightTable::standard();
        let slots: Vec<Option<ItemStack>> = vec![None; 54];
        assert_eq!(weighted_load(&table, &slots), 0.0);
    }
}
