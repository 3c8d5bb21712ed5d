//! Carrier creature traits for Caravan
//!
//! This crate implements:
//! - Persistent size and baseline speed tags assigned at spawn
//! - Size inheritance by randomized interpolation between parents
//! - Saddle storage with a creature-to-inventory side table
//! - Movement speed derived from the weighted load of that storage
//! - An event bus binding the above to host events

pub mod carrier;
pub mod error;
pub mod events;
pub mod host;
pub mod inheritance;
pub mod load;
pub mod manager;
pub mod plugin;
pub mod rng;
pub mod sim;
pub mod storage;
pub mod types;

// Re-export main types for convenience
pub use carrier::{expect_carrier, is_carrier, Carrier};
pub use error::{CarrierError, CarrierResult};
pub use events::{DispatchOutcome, EventBus, EventKind, HostEvent, Verdict};
pub use host::{HostAccess, HostMutAccess};
pub use manager::{CarrierConfig, CarrierTraitManager, DeathReport, InteractOutcome};
pub use load::LoadReport;
pub use plugin::{CarrierPlugin, CarrierRuntime};
pub use rng::{FixedDraws, TraitRng};
pub use sim::SimHost;
pub use storage::{CarrierStorage, StorageTable};
pub use types::{Attribute, EntityId, EntityKind, InventoryId, Location, TagKey};

pub use caravan_items::{ItemStack, ItemType, WeightTable};
