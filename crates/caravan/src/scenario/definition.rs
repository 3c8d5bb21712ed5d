//! Scenario definition and RON file loading

use anyhow::{Context, Result};
use caravan_items::ItemType;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::verification::Check;

/// Top-level scenario definition loaded from RON files
///
/// Entities are referred to by the names given at setup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioDefinition {
    /// Scenario name
    pub name: String,

    /// Description
    #[serde(default)]
    pub description: String,

    /// Breeding seed; the command line and config fill it in when absent
    #[serde(default)]
    pub seed: Option<u64>,

    /// Entities placed before any event fires
    #[serde(default)]
    pub setup: Vec<SetupAction>,

    /// Host events, in order
    pub steps: Vec<ScenarioStep>,

    /// Checks run after the last step
    #[serde(default)]
    pub verify: Vec<Check>,
}

/// World preparation that fires no events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SetupAction {
    /// Spawn a carrier, optionally with a non-default movement speed
    SpawnCarrier { name: String, speed: Option<f64> },
    SpawnPlayer { name: String },
    /// Spawn a creature that is not a carrier
    SpawnAnimal { name: String },
    Saddle { name: String },
    /// Put an item in an actor's hand
    Hold {
        actor: String,
        item: ItemType,
        amount: u32,
    },
    /// Pre-set the persisted size tag
    TagSize { name: String, size: f64 },
}

/// One host event, with whatever world change precedes it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ScenarioStep {
    Spawn { creature: String },
    /// Spawn `child` as a carrier and report it bred from both parents
    Breed {
        child: String,
        parent_a: String,
        parent_b: String,
    },
    Interact { actor: String, creature: String },
    /// Add items to a carrier's storage, then report the slot change
    Store {
        carrier: String,
        item: ItemType,
        amount: u32,
    },
    /// Remove items from a carrier's storage, then report the slot change
    Take {
        carrier: String,
        item: ItemType,
        amount: u32,
    },
    /// Report a carrier's storage view closed
    Close { carrier: String },
    /// Move an entity; a `world` of `None` clears its location
    Move {
        name: String,
        world: Option<String>,
        position: (f32, f32, f32),
    },
    Die { creature: String },
    /// Append a note to the run log
    Log { message: String },
}

impl ScenarioDefinition {
    /// Load scenario from RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;

        let scenario = ron::from_str(&content)
            .with_context(|| format!("Failed to parse RON scenario: {}", path.display()))?;

        Ok(scenario)
    }

    /// Save scenario to RON file
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let ron = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize scenario to RON")?;

        std::fs::write(path.as_ref(), ron).with_context(|| {
            format!("Failed to write scenario file: {}", path.as_ref().display())
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let ron = r#"(
            name: "Short trip",
            setup: [
                SpawnCarrier(name: "Humphrey", speed: None),
                SpawnPlayer(name: "Alex"),
                Saddle(name: "Humphrey"),
            ],
            steps: [
                Spawn(creature: "Humphrey"),
                Interact(actor: "Alex", creature: "Humphrey"),
                Store(carrier: "Humphrey", item: iron_block, amount: 2),
            ],
            verify: [
                HasStorage(carrier: "Humphrey", expected: true),
            ],
        )"#;

        let scenario: ScenarioDefinition = ron::from_str(ron).unwrap();
        assert_eq!(scenario.name, "Short trip");
        assert!(scenario.description.is_empty());
        assert_eq!(scenario.seed, None);
        assert_eq!(scenario.setup.len(), 3);
        assert!(matches!(
            scenario.steps[2],
            ScenarioStep::Store {
                item: ItemType::IronBlock,
                amount: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_scenario_file_round_trip() {
        let scenario = ScenarioDefinition {
            name: "Saved".to_string(),
            description: "Written then read back".to_string(),
            seed: Some(99),
            setup: vec![SetupAction::SpawnPlayer {
                name: "Alex".to_string(),
            }],
            steps: vec![ScenarioStep::Log {
                message: "hello".to_string(),
            }],
            verify: vec![],
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.ron");
        scenario.to_file(&path).unwrap();

        let loaded = ScenarioDefinition::from_file(&path).unwrap();
        assert_eq!(loaded.name, "Saved");
        assert_eq!(loaded.seed, Some(99));
        assert_eq!(loaded.steps.len(), 1);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = ScenarioDefinition::from_file("does/not/exist.ron").unwrap_err();
        assert!(format!("{:#}", err).contains("does/not/exist.ron"));
    }
}
