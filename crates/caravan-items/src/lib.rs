//! Item data for Caravan
//!
//! This crate provides the item-side data types used by carrier storage:
//! - Item categories (ItemType, ParseItemError)
//! - Item stacks (ItemStack)
//! - Carry weights (WeightTable, weighted_load)

mod items;
mod stack;
mod weights;

pub use items::{ItemType, ParseItemError};
pub use stack::ItemStack;
pub use weights::{weighted_load, WeightTable, DEFAULT_ITEM_WEIGHT};
