//! Creature-to-storage side table
//!
//! One process-wide table from creature identity to its storage. Entries are
//! inserted on first interaction and removed on death; nothing is persisted, so
//! a restart starts from an empty table.

use ahash::HashMap;

use crate::types::{EntityId, InventoryId};

/// Storage state kept for one carrier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierStorage {
    /// Host inventory backing the storage
    pub inventory: InventoryId,
    pub title: String,
    pub capacity: usize,
}

/// Manages carrier storages
#[derive(Debug, Default)]
pub struct StorageTable {
    storages: HashMap<EntityId, CarrierStorage>,
}

impl StorageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get storage by creature
    pub fn get(&self, creature: EntityId) -> Option<&CarrierStorage> {
        self.storages.get(&creature)
    }

    pub fn contains(&self, creature: EntityId) -> bool {
        self.storages.contains_key(&creature)
    }

    /// Look up a creature's storage, creating it on first use
    ///
    /// `create` runs at most once per creature until the entry is removed.
    /// Returns the storage and whether it was just created.
    pub fn get_or_create_with(
        &mut self,
        creature: EntityId,
        create: impl FnOnce() -> CarrierStorage,
    ) -> (&CarrierStorage, bool) {
        let mut created = false;
        let storage = self.storages.entry(creature).or_insert_with(|| {
            created = true;
            create()
        });
        (storage, created)
    }

    /// Remove a creature's storage
    pub fn remove(&mut self, creature: EntityId) -> Option<CarrierStorage> {
        self.storages.remove(&creature)
    }

    /// Get number of live storages
    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(id: u64) -> CarrierStorage {
        CarrierStorage {
            inventory: InventoryId(id),
            title: format!("Storage {id}"),
            capacity: 54,
        }
    }

    #[test]
    fn test_create_once() {
        let mut table = StorageTable::new();
        let camel = EntityId::new();
        let mut calls = 0;

        let (first, created) = table.get_or_create_with(camel, || {
            calls += 1;
            storage(1)
        });
        assert!(created);
        assert_eq!(first.inventory, InventoryId(1));

        let (second, created) = table.get_or_create_with(camel, || {
            calls += 1;
            storage(2)
        });
        assert!(!created);
        assert_eq!(second.inventory, InventoryId(1));
        assert_eq!(calls, 1);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_remove_then_recreate() {
        let mut table = StorageTable::new();
        let camel = EntityId::new();
        table.get_or_create_with(camel, || storage(1));

        let removed = table.remove(camel).unwrap();
        assert_eq!(removed.inventory, InventoryId(1));
        assert!(!table.contains(camel));
        assert!(table.remove(camel).is_none());

        let (again, created) = table.get_or_create_with(camel, || storage(2));
        assert!(created);
        assert_eq!(again.inventory, InventoryId(2));
    }
}
