//! Carrier kind checks
//!
//! Every guard point goes through these instead of trusting event payloads.

use crate::error::{CarrierError, CarrierResult};
use crate::host::HostAccess;
use crate::types::{EntityId, EntityKind};

/// An entity the host has confirmed to be a carrier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Carrier(EntityId);

impl Carrier {
    pub fn id(self) -> EntityId {
        self.0
    }
}

/// Check if the host reports this entity as a carrier
pub fn is_carrier<H: HostAccess + ?Sized>(host: &H, entity: EntityId) -> bool {
    host.entity_kind(entity) == Some(EntityKind::Carrier)
}

/// Narrow an entity to a carrier, failing with `TypeMismatch` otherwise
pub fn expect_carrier<H: HostAccess + ?Sized>(
    host: &H,
    entity: EntityId,
) -> CarrierResult<Carrier> {
    match host.entity_kind(entity) {
        Some(EntityKind::Carrier) => Ok(Carrier(entity)),
        found => Err(CarrierError::TypeMismatch { entity, found }),
    }
}
