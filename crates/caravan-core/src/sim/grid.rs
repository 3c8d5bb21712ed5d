use caravan_items::{ItemStack, ItemType};

use crate::types::EntityId;

/// Fixed-size grid inventory as the in-memory host keeps it
#[derive(Debug, Clone)]
pub struct GridInventory {
    pub owner: EntityId,
    pub title: String,
    slots: Vec<Option<ItemStack>>,
}

impl GridInventory {
    /// Create a new inventory with the specified number of slots
    pub fn new(owner: EntityId, title: impl Into<String>, slots: usize) -> Self {
        GridInventory {
            owner,
            title: title.into(),
            slots: vec![None; slots],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn slots(&self) -> &[Option<ItemStack>] {
        &self.slots
    }

    /// Try to add items to the inventory
    /// Returns the amount that couldn't be added (0 if all added successfully)
    pub fn add_item(&mut self, item: ItemType, mut amount: u32) -> u32 {
        if item == ItemType::Air {
            return amount;
        }

        // First, try to add to existing stacks of the same item
        for stack in self.slots.iter_mut().flatten() {
            if stack.item == item && !stack.is_full() {
                amount = stack.add(amount);
                if amount == 0 {
                    return 0;
                }
            }
        }

        // Then, try to create new stacks in empty slots
        while amount > 0 {
            match self.find_empty_slot() {
                Some(index) => {
                    let to_add = amount.min(item.max_stack_size());
                    self.slots[index] = Some(ItemStack::new(item, to_add));
                    amount -= to_add;
                }
                None => break,
            }
        }

        amount
    }

    /// Try to remove items from the inventory
    /// Returns the amount actually removed
    pub fn remove_item(&mut self, item: ItemType, mut amount: u32) -> u32 {
        let mut removed = 0;

        for slot in &mut self.slots {
            if let Some(stack) = slot {
                if stack.item == item {
                    let taken = stack.remove(amount);
                    removed += taken;
                    amount -= taken;

                    if stack.is_empty() {
                        *slot = None;
                    }

                    if amount == 0 {
                        break;
                    }
                }
            }
        }

        removed
    }

    /// Count how many of an item type are in the inventory
    pub fn count_item(&self, item: ItemType) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|stack| stack.item == item)
            .map(|stack| stack.amount)
            .sum()
    }

    fn find_empty_slot(&self) -> Option<usize> {
        self.slots.iter().position(|slot| slot.is_none())
    }

    pub fn empty_slot_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_none()).count()
    }

    pub fn used_slot_count(&self) -> usize {
        self.capacity() - self.empty_slot_count()
    }

    /// Clear all items from the inventory
    pub fn clear(&mut self) {
        self.slots.fill(None);
    }

    pub fn slot(&self, index: usize) -> Option<&ItemStack> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Overwrite one slot; false if the index is out of range
    pub fn set_slot(&mut self, index: usize, stack: Option<ItemStack>) -> bool {
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = stack;
                true
            }
            None => false,
        }
    }
}
