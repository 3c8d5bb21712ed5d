use thiserror::Error;

use crate::types::{EntityId, EntityKind, InventoryId};

/// Guard failures of carrier operations
///
/// Event handlers treat every variant as "not for us" and return silently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarrierError {
    #[error("{entity} is not a carrier (found {found:?})")]
    TypeMismatch {
        entity: EntityId,
        found: Option<EntityKind>,
    },

    #[error("{inventory} has no owner")]
    UnownedInventory { inventory: InventoryId },
}

pub type CarrierResult<T> = Result<T, CarrierError>;
