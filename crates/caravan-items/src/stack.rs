use serde::{Deserialize, Serialize};

use crate::ItemType;

/// A stack of items in a hand or storage slot
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemStack {
    pub item: ItemType,
    pub amount: u32,
}

impl ItemStack {
    /// Create a new item stack
    pub fn new(item: ItemType, amount: u32) -> Self {
        ItemStack { item, amount }
    }

    /// Get the maximum stack size for this item
    pub fn max_stack_size(&self) -> u32 {
        self.item.max_stack_size()
    }

    /// Add items to this stack, returns amount that didn't fit
    pub fn add(&mut self, amount: u32) -> u32 {
        let space = self.max_stack_size().saturating_sub(self.amount);
        let to_add = amount.min(space);
        self.amount += to_add;
        amount - to_add
    }

    /// Remove items from this stack, returns amount actually removed
    pub fn remove(&mut self, amount: u32) -> u32 {
        let to_remove = amount.min(self.amount);
        self.amount -= to_remove;
        to_remove
    }

    /// Air and zero-amount stacks count as nothing held
    pub fn is_empty(&self) -> bool {
        self.item == ItemType::Air || self.amount == 0
    }

    /// Check if this stack is full
    pub fn is_full(&self) -> bool {
        self.amount >= self.max_stack_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_stack_basic() {
        let mut stack = ItemStack::new(ItemType::Cobblestone, 10);
        assert_eq!(stack.amount, 10);
        assert!(!stack.is_empty());
        assert!(!stack.is_full());

        stack.add(5);
        assert_eq!(stack.amount, 15);

        let removed = stack.remove(7);
        assert_eq!(removed, 7);
        assert_eq!(stack.amount, 8);
    }

    #[test]
    fn test_item_stack_overflow() {
        let mut stack = ItemStack::new(ItemType::IronBlock, 60);
        let overflow = stack.add(10);
        assert_eq!(stack.amount, 64);
        assert_eq!(overflow, 6);
        assert!(stack.is_full());
        assert_eq!(stack.add(1), 1);
    }

    #[test]
    fn test_saddle_does_not_stack() {
        let mut stack = ItemStack::new(ItemType::Saddle, 1);
        assert!(stack.is_full());
        assert_eq!(stack.add(1), 1);
    }

    #[test]
    fn test_empty_stacks() {
        assert!(ItemStack::new(ItemType::Air, 5).is_empty());
        assert!(ItemStack::new(ItemType::Chest, 0).is_empty());
        assert!(!ItemStack::new(ItemType::Chest, 1).is_empty());
    }
}
