//! Carrier trait manager
//!
//! One method per host event. Each returns a `CarrierResult` so guard failures
//! are explicit; the plugin layer turns them into silent early returns.

use caravan_items::{weighted_load, WeightTable};
use serde::{Deserialize, Serialize};

use crate::carrier::expect_carrier;
use crate::error::{CarrierError, CarrierResult};
use crate::host::HostMutAccess;
use crate::inheritance::{interpolate_size, DEFAULT_SIZE};
use crate::load::{derived_speed, LoadReport, LOAD_DIVISOR};
use crate::rng::TraitRng;
use crate::storage::{CarrierStorage, StorageTable};
use crate::types::{Attribute, EntityId, InventoryId, TagKey};

/// Tunables of the carrier behavior
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarrierConfig {
    /// Slots of a carrier storage
    pub storage_slots: usize,
    /// Load units that halve speed
    pub load_divisor: f64,
    /// Baseline used when a carrier was never tagged
    pub fallback_base_speed: f64,
    /// Size assumed for untagged parents and given at spawn
    pub default_size: f64,
    /// Told to players interacting with an unsaddled carrier
    pub saddle_message: String,
    /// Appended to the carrier's display name to title its storage
    pub storage_title_suffix: String,
}

impl Default for CarrierConfig {
    fn default() -> Self {
        Self {
            storage_slots: 54,
            load_divisor: LOAD_DIVISOR,
            fallback_base_speed: 0.1,
            default_size: DEFAULT_SIZE,
            saddle_message: "You need to saddle the camel first!".to_string(),
            storage_title_suffix: "'s Storage".to_string(),
        }
    }
}

/// Which tags a spawn wrote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpawnReport {
    pub size_tagged: bool,
    pub baseline_tagged: bool,
}

/// What an interaction did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractOutcome {
    /// Storage was shown to the actor
    Opened {
        inventory: InventoryId,
        created: bool,
        /// Actor held a container; the host's default action must not run
        cancel_default: bool,
    },
    /// Carrier has no saddle; the actor was told
    MissingSaddle,
    /// Actor held some other item; left to the host
    Ignored,
}

impl InteractOutcome {
    pub fn cancels_default(&self) -> bool {
        matches!(
            self,
            InteractOutcome::Opened {
                cancel_default: true,
                ..
            }
        )
    }
}

/// Storage spilled by a dying carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathReport {
    pub inventory: InventoryId,
    /// Stacks placed into the world
    pub dropped: usize,
}

/// Applies size, storage and speed rules to carriers
#[derive(Debug)]
pub struct CarrierTraitManager {
    config: CarrierConfig,
    weights: WeightTable,
    storages: StorageTable,
}

impl CarrierTraitManager {
    pub fn new(config: CarrierConfig) -> Self {
        Self::with_weights(config, WeightTable::standard())
    }

    pub fn with_weights(config: CarrierConfig, weights: WeightTable) -> Self {
        Self {
            config,
            weights,
            storages: StorageTable::new(),
        }
    }

    pub fn config(&self) -> &CarrierConfig {
        &self.config
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn storages(&self) -> &StorageTable {
        &self.storages
    }

    /// Tag a freshly spawned carrier with its size and baseline speed
    ///
    /// Existing tags are left alone, so respawn checks are harmless.
    pub fn on_spawn<H: HostMutAccess + ?Sized>(
        &mut self,
        host: &mut H,
        creature: EntityId,
    ) -> CarrierResult<SpawnReport> {
        let carrier = expect_carrier(&*host, creature)?.id();
        let mut report = SpawnReport::default();

        if host.tag(carrier, TagKey::Size).is_none() {
            host.set_tag(carrier, TagKey::Size, self.config.default_size);
            report.size_tagged = true;
        }

        if host.tag(carrier, TagKey::BaseSpeed).is_none() {
            if let Some(base) = host.attribute_base(carrier, Attribute::MovementSpeed) {
                host.set_tag(carrier, TagKey::BaseSpeed, base);
                report.baseline_tagged = true;
            }
        }

        Ok(report)
    }

    /// Give a newborn carrier a size between its parents' sizes
    ///
    /// Returns the child's size. Nothing is written unless child and both
    /// parents are carriers.
    pub fn on_breed<H, R>(
        &mut self,
        host: &mut H,
        rng: &mut R,
        child: EntityId,
        parent_a: EntityId,
        parent_b: EntityId,
    ) -> CarrierResult<f64>
    where
        H: HostMutAccess + ?Sized,
        R: TraitRng + ?Sized,
    {
        let child = expect_carrier(&*host, child)?.id();
        let parent_a = expect_carrier(&*host, parent_a)?.id();
        let parent_b = expect_carrier(&*host, parent_b)?.id();

        let size_a = host.tag_or(parent_a, TagKey::Size, self.config.default_size);
        let size_b = host.tag_or(parent_b, TagKey::Size, self.config.default_size);
        let child_size = interpolate_size(size_a, size_b, rng);

        host.set_tag(child, TagKey::Size, child_size);
        if host.attribute_base(child, Attribute::Scale).is_some() {
            host.set_attribute_base(child, Attribute::Scale, child_size);
        }

        log::debug!(
            "{} bred from sizes {:.3} and {:.3}: size {:.3}",
            child,
            size_a,
            size_b,
            child_size
        );

        Ok(child_size)
    }

    /// Open a saddled carrier's storage for the interacting actor
    pub fn on_interact<H: HostMutAccess + ?Sized>(
        &mut self,
        host: &mut H,
        actor: EntityId,
        creature: EntityId,
    ) -> CarrierResult<InteractOutcome> {
        let carrier = expect_carrier(&*host, creature)?.id();

        if !host.has_saddle(carrier) {
            host.send_message(actor, &self.config.saddle_message);
            return Ok(InteractOutcome::MissingSaddle);
        }

        let cancel_default = match host.held_item(actor).filter(|stack| !stack.is_empty()) {
            Some(stack) if stack.item.is_container() => true,
            Some(_) => return Ok(InteractOutcome::Ignored),
            None => false,
        };

        let slots = self.config.storage_slots;
        let title = format!("{}{}", host.display_name(carrier), self.config.storage_title_suffix);
        let (storage, created) = self.storages.get_or_create_with(carrier, || CarrierStorage {
            inventory: host.create_inventory(carrier, slots, &title),
            title: title.clone(),
            capacity: slots,
        });
        let inventory = storage.inventory;

        if created {
            log::info!(
                "Created storage {} \"{}\" for {}. Storages: {}",
                inventory,
                title,
                carrier,
                self.storages.len()
            );
        }

        host.open_inventory(actor, inventory);

        Ok(InteractOutcome::Opened {
            inventory,
            created,
            cancel_default,
        })
    }

    /// Recompute a carrier's speed from everything in its storage
    ///
    /// Returns `None` when the owner has no storage entry in this process.
    pub fn on_inventory_changed<H: HostMutAccess + ?Sized>(
        &mut self,
        host: &mut H,
        inventory: InventoryId,
    ) -> CarrierResult<Option<LoadReport>> {
        let owner = host
            .inventory_owner(inventory)
            .ok_or(CarrierError::UnownedInventory { inventory })?;
        let carrier = expect_carrier(&*host, owner)?.id();

        let Some(storage) = self.storages.get(carrier) else {
            return Ok(None);
        };

        let contents = host.inventory_contents(storage.inventory);
        let load = weighted_load(&self.weights, &contents);
        let baseline = host.tag_or(carrier, TagKey::BaseSpeed, self.config.fallback_base_speed);
        let speed = derived_speed(baseline, load, self.config.load_divisor);

        let applied = host
            .attribute_base(carrier, Attribute::MovementSpeed)
            .is_some();
        if applied {
            host.set_attribute_base(carrier, Attribute::MovementSpeed, speed);
        }

        log::debug!(
            "{} carries load {:.1}: speed {:.5} (baseline {:.5})",
            carrier,
            load,
            speed,
            baseline
        );

        Ok(Some(LoadReport {
            load,
            baseline,
            speed,
            applied,
        }))
    }

    /// Drop a dead carrier's stored items where it died
    ///
    /// Returns `None` if the carrier never had storage.
    pub fn on_death<H: HostMutAccess + ?Sized>(
        &mut self,
        host: &mut H,
        creature: EntityId,
    ) -> CarrierResult<Option<DeathReport>> {
        let carrier = expect_carrier(&*host, creature)?.id();

        let Some(storage) = self.storages.remove(carrier) else {
            return Ok(None);
        };

        let stacks: Vec<_> = host
            .inventory_contents(storage.inventory)
            .into_iter()
            .flatten()
            .filter(|stack| !stack.is_empty())
            .collect();

        let dropped = match host.location(carrier) {
            Some(location) => {
                for stack in &stacks {
                    host.drop_item(&location, *stack);
                }
                stacks.len()
            }
            None => {
                log::warn!(
                    "{} died without a location, {} stored stacks lost",
                    carrier,
                    stacks.len()
                );
                0
            }
        };

        log::info!(
            "Removed storage {} of {}, dropped {} stacks. Storages: {}",
            storage.inventory,
            carrier,
            dropped,
            self.storages.len()
        );

        Ok(Some(DeathReport {
            inventory: storage.inventory,
            dropped,
        }))
    }
}

impl Default for CarrierTraitManager {
    fn default() -> Self {
        Self::new(CarrierConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::HostAccess;
    use crate::rng::FixedDraws;
    use crate::sim::SimHost;
    use caravan_items::{ItemStack, ItemType};

    #[test]
    fn test_config_defaults() {
        let config = CarrierConfig::default();
        assert_eq!(config.storage_slots, 54);
        assert_eq!(config.load_divisor, 50.0);
        assert_eq!(config.fallback_base_speed, 0.1);
        assert_eq!(config.default_size, 1.0);
    }

    #[test]
    fn test_spawn_reports_written_tags() {
        let mut host = SimHost::new();
        let camel = host.spawn_carrier("Humphrey");
        let mut manager = CarrierTraitManager::default();

        let first = manager.on_spawn(&mut host, camel).unwrap();
        assert!(first.size_tagged && first.baseline_tagged);

        let second = manager.on_spawn(&mut host, camel).unwrap();
        assert_eq!(second, SpawnReport::default());
    }

    #[test]
    fn test_spawn_without_movement_attribute() {
        let mut host = SimHost::new();
        let camel = host.spawn_carrier("Humphrey");
        host.remove_attribute(camel, Attribute::MovementSpeed);
        let mut manager = CarrierTraitManager::default();

        let report = manager.on_spawn(&mut host, camel).unwrap();
        assert!(report.size_tagged);
        assert!(!report.baseline_tagged);
        assert_eq!(host.tag(camel, TagKey::BaseSpeed), None);
    }

    #[test]
    fn test_breed_rejects_mixed_parents() {
        let mut host = SimHost::new();
        let child = host.spawn_carrier("Calf");
        let camel = host.spawn_carrier("Humphrey");
        let horse = host.spawn_animal("Horse");
        let mut manager = CarrierTraitManager::default();
        let mut draws = FixedDraws::new([0.5]);

        let err = manager
            .on_breed(&mut host, &mut draws, child, camel, horse)
            .unwrap_err();
        assert!(matches!(err, CarrierError::TypeMismatch { entity, .. } if entity == horse));
        assert!(host.tags_of(child).is_empty());
    }

    #[test]
    fn test_interact_outcomes() {
        let mut host = SimHost::new();
        let camel = host.spawn_carrier("Humphrey");
        let player = host.spawn_player("Alex");
        let mut manager = CarrierTraitManager::default();

        assert_eq!(
            manager.on_interact(&mut host, player, camel),
            Ok(InteractOutcome::MissingSaddle)
        );

        host.set_saddled(camel, true);
        host.set_held(player, Some(ItemStack::new(ItemType::Wheat, 3)));
        assert_eq!(
            manager.on_interact(&mut host, player, camel),
            Ok(InteractOutcome::Ignored)
        );

        host.set_held(player, Some(ItemStack::new(ItemType::Chest, 1)));
        let opened = manager.on_interact(&mut host, player, camel).unwrap();
        assert!(opened.cancels_default());

        host.set_held(player, None);
        let reopened = manager.on_interact(&mut host, player, camel).unwrap();
        assert!(!reopened.cancels_default());
        assert!(matches!(reopened, InteractOutcome::Opened { created: false, .. }));
    }

    #[test]
    fn test_storage_title_uses_display_name() {
        let mut host = SimHost::new();
        let camel = host.spawn_carrier("Humphrey");
        let player = host.spawn_player("Alex");
        host.set_saddled(camel, true);
        let mut manager = CarrierTraitManager::default();

        manager.on_interact(&mut host, player, camel).unwrap();
        let storage = manager.storages().get(camel).unwrap();
        assert_eq!(storage.title, "Humphrey's Storage");
        assert_eq!(storage.capacity, 54);
        let grid = host.inventory(storage.inventory).unwrap();
        assert_eq!(grid.title, "Humphrey's Storage");
        assert_eq!(grid.capacity(), 54);
    }

    #[test]
    fn test_unowned_inventory() {
        let mut host = SimHost::new();
        let mut manager = CarrierTraitManager::default();
        let inventory = InventoryId(77);
        assert_eq!(
            manager.on_inventory_changed(&mut host, inventory),
            Err(CarrierError::UnownedInventory { inventory })
        );
    }

    #[test]
    fn test_speed_falls_back_without_baseline_tag() {
        let mut host = SimHost::new();
        let camel = host.spawn_carrier("Humphrey");
        let player = host.spawn_player("Alex");
        host.set_saddled(camel, true);
        let mut manager = CarrierTraitManager::default();

        let InteractOutcome::Opened { inventory, .. } =
            manager.on_interact(&mut host, player, camel).unwrap()
        else {
            panic!("storage should open");
        };
        let report = manager
            .on_inventory_changed(&mut host, inventory)
            .unwrap()
            .unwrap();
        assert_eq!(report.baseline, 0.1);
        assert_eq!(report.speed, 0.1);
        assert!(report.applied);
    }
}
