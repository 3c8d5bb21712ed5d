//! Load to speed derivation

use serde::{Deserialize, Serialize};

/// Load units that halve a carrier's speed
pub const LOAD_DIVISOR: f64 = 50.0;

/// Speed for a given baseline and weighted load
///
/// `baseline / (1 + load / divisor)`; equals `baseline` at zero load and never
/// increases as load grows.
pub fn derived_speed(baseline: f64, load: f64, divisor: f64) -> f64 {
    baseline / (1.0 + load.max(0.0) / divisor)
}

/// Result of a load recomputation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Total weighted load of the storage
    pub load: f64,
    /// Baseline used as numerator
    pub baseline: f64,
    /// Derived speed
    pub speed: f64,
    /// False if the creature has no movement attribute to write
    pub applied: bool,
}
