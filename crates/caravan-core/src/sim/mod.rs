//! In-memory host
//!
//! A small stand-in for a game server: entities with tags and attributes, grid
//! inventories, chat messages and dropped items. Used by tests and the
//! scenario runner.

mod grid;

pub use grid::GridInventory;

use std::collections::BTreeMap;

use ahash::HashMap;
use caravan_items::ItemStack;
use glam::Vec3;

use crate::host::{HostAccess, HostMutAccess};
use crate::types::{Attribute, EntityId, EntityKind, InventoryId, Location, TagKey};

/// Movement speed a freshly spawned carrier gets
pub const DEFAULT_CARRIER_SPEED: f64 = 0.09;

const DEFAULT_WORLD: &str = "world";

/// A living entity as the in-memory host tracks it
#[derive(Debug, Clone)]
struct SimEntity {
    kind: EntityKind,
    name: String,
    location: Option<Location>,
    saddled: bool,
    held: Option<ItemStack>,
    alive: bool,
    attributes: HashMap<Attribute, f64>,
    tags: BTreeMap<String, f64>,
}

impl SimEntity {
    fn new(kind: EntityKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            location: Some(Location::new(DEFAULT_WORLD, Vec3::ZERO)),
            saddled: false,
            held: None,
            alive: true,
            attributes: HashMap::default(),
            tags: BTreeMap::new(),
        }
    }
}

/// Item stack lying in the world
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedItem {
    pub location: Location,
    pub stack: ItemStack,
}

/// In-memory implementation of the host traits
#[derive(Debug)]
pub struct SimHost {
    entities: HashMap<EntityId, SimEntity>,
    inventories: BTreeMap<InventoryId, GridInventory>,
    next_inventory: u64,
    messages: Vec<(EntityId, String)>,
    open_views: Vec<(EntityId, InventoryId)>,
    dropped: Vec<DroppedItem>,
    carrier_speed: f64,
}

impl SimHost {
    pub fn new() -> Self {
        Self::with_carrier_speed(DEFAULT_CARRIER_SPEED)
    }

    /// Host whose carriers spawn with the given movement speed
    pub fn with_carrier_speed(carrier_speed: f64) -> Self {
        Self {
            entities: HashMap::default(),
            inventories: BTreeMap::new(),
            next_inventory: 1,
            messages: Vec::new(),
            open_views: Vec::new(),
            dropped: Vec::new(),
            carrier_speed,
        }
    }

    fn insert(&mut self, entity: SimEntity) -> EntityId {
        let id = EntityId::new();
        self.entities.insert(id, entity);
        id
    }

    /// Spawn a carrier with movement speed and scale attributes
    pub fn spawn_carrier(&mut self, name: &str) -> EntityId {
        let mut entity = SimEntity::new(EntityKind::Carrier, name);
        entity
            .attributes
            .insert(Attribute::MovementSpeed, self.carrier_speed);
        entity.attributes.insert(Attribute::Scale, 1.0);
        self.insert(entity)
    }

    pub fn spawn_player(&mut self, name: &str) -> EntityId {
        let mut entity = SimEntity::new(EntityKind::Player, name);
        entity.attributes.insert(Attribute::MovementSpeed, 0.1);
        self.insert(entity)
    }

    pub fn spawn_animal(&mut self, name: &str) -> EntityId {
        let mut entity = SimEntity::new(EntityKind::Animal, name);
        entity.attributes.insert(Attribute::MovementSpeed, 0.25);
        entity.attributes.insert(Attribute::Scale, 1.0);
        self.insert(entity)
    }

    pub fn set_saddled(&mut self, id: EntityId, saddled: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.saddled = saddled;
        }
    }

    pub fn set_held(&mut self, actor: EntityId, held: Option<ItemStack>) {
        if let Some(entity) = self.entities.get_mut(&actor) {
            entity.held = held;
        }
    }

    pub fn move_to(&mut self, id: EntityId, location: Option<Location>) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.location = location;
        }
    }

    /// Strip an attribute, as for entity kinds that lack it
    pub fn remove_attribute(&mut self, id: EntityId, attribute: Attribute) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.attributes.remove(&attribute);
        }
    }

    /// Mark an entity dead; it stays queryable like a host corpse
    pub fn kill(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.alive = false;
        }
    }

    pub fn is_alive(&self, id: EntityId) -> bool {
        self.entities.get(&id).is_some_and(|e| e.alive)
    }

    pub fn attribute(&self, id: EntityId, attribute: Attribute) -> Option<f64> {
        self.entities
            .get(&id)
            .and_then(|entity| entity.attributes.get(&attribute).copied())
    }

    /// Raw persisted tag by key string
    pub fn tag_value(&self, id: EntityId, key: &str) -> Option<f64> {
        self.entities
            .get(&id)
            .and_then(|entity| entity.tags.get(key).copied())
    }

    /// All persisted tags of an entity, sorted by key
    pub fn tags_of(&self, id: EntityId) -> Vec<(String, f64)> {
        self.entities
            .get(&id)
            .map(|entity| {
                entity
                    .tags
                    .iter()
                    .map(|(key, value)| (key.clone(), *value))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn inventory(&self, id: InventoryId) -> Option<&GridInventory> {
        self.inventories.get(&id)
    }

    pub fn inventory_mut(&mut self, id: InventoryId) -> Option<&mut GridInventory> {
        self.inventories.get_mut(&id)
    }

    /// Every inventory bound to an entity, oldest first
    pub fn inventories_of(&self, owner: EntityId) -> Vec<InventoryId> {
        self.inventories
            .iter()
            .filter(|(_, inv)| inv.owner == owner)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn inventory_count(&self) -> usize {
        self.inventories.len()
    }

    pub fn messages(&self) -> &[(EntityId, String)] {
        &self.messages
    }

    /// Inventories shown to players, in order
    pub fn open_views(&self) -> &[(EntityId, InventoryId)] {
        &self.open_views
    }

    pub fn dropped(&self) -> &[DroppedItem] {
        &self.dropped
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HostAccess for SimHost {
    fn entity_kind(&self, entity: EntityId) -> Option<EntityKind> {
        self.entities.get(&entity).map(|e| e.kind)
    }

    fn display_name(&self, entity: EntityId) -> String {
        self.entities
            .get(&entity)
            .map(|e| e.name.clone())
            .unwrap_or_default()
    }

    fn location(&self, entity: EntityId) -> Option<Location> {
        self.entities
            .get(&entity)
            .and_then(|e| e.location.clone())
    }

    fn has_saddle(&self, entity: EntityId) -> bool {
        // A corpse can't be ridden
        self.entities
            .get(&entity)
            .is_some_and(|e| e.alive && e.saddled)
    }

    fn held_item(&self, actor: EntityId) -> Option<ItemStack> {
        self.entities.get(&actor).and_then(|e| e.held)
    }

    fn tag(&self, entity: EntityId, key: TagKey) -> Option<f64> {
        self.tag_value(entity, key.as_str())
    }

    fn attribute_base(&self, entity: EntityId, attribute: Attribute) -> Option<f64> {
        self.attribute(entity, attribute)
    }

    fn inventory_owner(&self, inventory: InventoryId) -> Option<EntityId> {
        self.inventories.get(&inventory).map(|inv| inv.owner)
    }

    fn inventory_contents(&self, inventory: InventoryId) -> Vec<Option<ItemStack>> {
        self.inventories
            .get(&inventory)
            .map(|inv| inv.slots().to_vec())
            .unwrap_or_default()
    }
}

impl HostMutAccess for SimHost {
    fn set_tag(&mut self, entity: EntityId, key: TagKey, value: f64) {
        if let Some(e) = self.entities.get_mut(&entity) {
            e.tags.insert(key.as_str().to_string(), value);
        }
    }

    fn set_attribute_base(&mut self, entity: EntityId, attribute: Attribute, value: f64) {
        if let Some(current) = self
            .entities
            .get_mut(&entity)
            .and_then(|e| e.attributes.get_mut(&attribute))
        {
            *current = value;
        }
    }

    fn send_message(&mut self, actor: EntityId, message: &str) {
        self.messages.push((actor, message.to_string()));
    }

    fn create_inventory(&mut self, owner: EntityId, slots: usize, title: &str) -> InventoryId {
        let id = InventoryId(self.next_inventory);
        self.next_inventory += 1;
        self.inventories
            .insert(id, GridInventory::new(owner, title, slots));
        id
    }

    fn open_inventory(&mut self, actor: EntityId, inventory: InventoryId) {
        self.open_views.push((actor, inventory));
    }

    fn drop_item(&mut self, location: &Location, stack: ItemStack) {
        self.dropped.push(DroppedItem {
            location: location.clone(),
            stack,
        });
    }
}
