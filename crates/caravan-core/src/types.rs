//! Identifiers and small value types shared with the host

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque identity of a host entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

impl EntityId {
    /// Generate a new unique entity ID
    pub fn new() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value (useful for debugging/serialization)
    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Create an EntityId from a raw u64 (for deserialization)
    pub fn from_raw(id: u64) -> Self {
        // Update the counter if this ID is higher than current
        NEXT_ENTITY_ID.fetch_max(id + 1, Ordering::Relaxed);
        EntityId(id)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// What kind of living entity the host reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// The creature kind this crate augments
    Carrier,
    Player,
    /// Any other creature
    Animal,
}

/// Handle of a host-managed inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct InventoryId(pub u64);

impl std::fmt::Display for InventoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Inventory({})", self.0)
    }
}

/// A point in a named world
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub world: String,
    pub position: Vec3,
}

impl Location {
    pub fn new(world: impl Into<String>, position: Vec3) -> Self {
        Self {
            world: world.into(),
            position,
        }
    }
}

/// Host attributes this crate reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Attribute {
    /// Base movement speed
    MovementSpeed,
    /// Visual scale
    Scale,
}

/// Keys of the persisted per-creature tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TagKey {
    Size,
    BaseSpeed,
}

impl TagKey {
    /// Key under which the host persists the value
    pub fn as_str(self) -> &'static str {
        match self {
            TagKey::Size => "size",
            TagKey::BaseSpeed => "baseSpeed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_uniqueness() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert!(id2.raw() > id1.raw());
    }

    #[test]
    fn test_entity_id_from_raw() {
        let id = EntityId::from_raw(4242);
        assert_eq!(id.raw(), 4242);

        let next_id = EntityId::new();
        assert!(next_id.raw() > 4242);
    }

    #[test]
    fn test_tag_key_names() {
        assert_eq!(TagKey::Size.as_str(), "size");
        assert_eq!(TagKey::BaseSpeed.as_str(), "baseSpeed");
    }
}
