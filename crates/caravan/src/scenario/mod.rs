//! RON-driven scenarios against the in-memory host
//!
//! A scenario spawns named entities, replays host events step by step and
//! checks the resulting traits, storage and drops.

pub mod definition;
pub mod executor;
pub mod results;
pub mod verification;

pub use definition::{ScenarioDefinition, ScenarioStep, SetupAction};
pub use executor::{RunnerConfig, ScenarioPlugin, ScenarioRunner, ScenarioWorld};
pub use results::RunReport;
pub use verification::{Check, VerificationResult};
