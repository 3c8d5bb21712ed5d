//! Caravan scenario runner
//!
//! Loads layered configuration, runs RON scenarios against the carrier plugin
//! on an in-memory host and reports the outcome.

pub mod config;
pub mod scenario;

pub use config::AppConfig;
pub use scenario::{RunReport, ScenarioDefinition, ScenarioRunner};
