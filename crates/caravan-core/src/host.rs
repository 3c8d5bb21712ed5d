//! Host access traits
//!
//! These traits define the interface between the carrier logic and the game
//! server hosting it, so the logic never depends on a concrete host.

use caravan_items::ItemStack;

use crate::types::{Attribute, EntityId, EntityKind, InventoryId, Location, TagKey};

/// Read-only access to host state
pub trait HostAccess {
    /// Kind of a living entity (None if the host doesn't know the id)
    fn entity_kind(&self, entity: EntityId) -> Option<EntityKind>;

    /// Display name shown to players
    fn display_name(&self, entity: EntityId) -> String;

    /// Last known location
    fn location(&self, entity: EntityId) -> Option<Location>;

    /// Whether riding equipment is attached
    fn has_saddle(&self, entity: EntityId) -> bool;

    /// Item in the actor's main hand (None for an empty hand)
    fn held_item(&self, actor: EntityId) -> Option<ItemStack>;

    /// Persisted tag value
    fn tag(&self, entity: EntityId, key: TagKey) -> Option<f64>;

    /// Persisted tag value, or `default` when absent
    fn tag_or(&self, entity: EntityId, key: TagKey, default: f64) -> f64 {
        self.tag(entity, key).unwrap_or(default)
    }

    /// Base value of an attribute (None if this entity kind lacks it)
    fn attribute_base(&self, entity: EntityId, attribute: Attribute) -> Option<f64>;

    /// Entity an inventory is bound to
    fn inventory_owner(&self, inventory: InventoryId) -> Option<EntityId>;

    /// Snapshot of every slot of an inventory
    fn inventory_contents(&self, inventory: InventoryId) -> Vec<Option<ItemStack>>;
}

/// Mutable access to host state
pub trait HostMutAccess: HostAccess {
    /// Persist a tag value
    fn set_tag(&mut self, entity: EntityId, key: TagKey, value: f64);

    /// Overwrite an attribute's base value
    ///
    /// Callers check `attribute_base` first; hosts ignore writes to attributes
    /// the entity doesn't have.
    fn set_attribute_base(&mut self, entity: EntityId, attribute: Attribute, value: f64);

    /// Send a chat message to a player
    fn send_message(&mut self, actor: EntityId, message: &str);

    /// Create a fixed-size named inventory bound to `owner`
    fn create_inventory(&mut self, owner: EntityId, slots: usize, title: &str) -> InventoryId;

    /// Show an inventory to a player
    fn open_inventory(&mut self, actor: EntityId, inventory: InventoryId);

    /// Spawn a physical item stack in the world
    fn drop_item(&mut self, location: &Location, stack: ItemStack);
}
