//! Verification checks run against the final scenario state

use caravan_core::sim::SimHost;
use caravan_core::{Attribute, EntityId, HostAccess, ItemType, TagKey};
use caravan_items::weighted_load;
use serde::{Deserialize, Serialize};

use super::executor::ScenarioWorld;

/// Tolerance used by float checks that do not set one
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

/// Conditions that can be verified against scenario state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Check {
    // === TRAIT CHECKS ===
    /// Assert current movement speed
    Speed {
        entity: String,
        expected: f64,
        tolerance: Option<f64>,
    },

    /// Assert persisted size tag
    Size {
        entity: String,
        expected: f64,
        tolerance: Option<f64>,
    },

    /// Assert persisted size tag lies in [min, max]
    SizeBetween { entity: String, min: f64, max: f64 },

    /// Assert visual scale attribute
    Scale {
        entity: String,
        expected: f64,
        tolerance: Option<f64>,
    },

    // === STORAGE CHECKS ===
    /// Assert weighted load of a carrier's storage
    Load {
        carrier: String,
        expected: f64,
        tolerance: Option<f64>,
    },

    /// Assert whether a carrier has a storage mapping
    HasStorage { carrier: String, expected: bool },

    /// Assert how many of an item a carrier's storage holds
    StoredCount {
        carrier: String,
        item: ItemType,
        expected: u32,
    },

    /// Assert how many inventories the host created
    InventoryCount { expected: usize },

    /// Assert how often storage was shown to an actor
    OpenViews { actor: String, expected: usize },

    // === WORLD CHECKS ===
    /// Assert number of stacks dropped into the world
    DroppedStacks { expected: usize },

    /// Assert total dropped amount of an item
    DroppedCount { item: ItemType, expected: u32 },

    /// Assert an actor received a message
    MessageSent { actor: String, text: String },

    // === LOGICAL OPERATORS ===
    /// All checks must pass
    All { checks: Vec<Check> },

    /// Any check must pass
    Any { checks: Vec<Check> },

    /// Check must NOT pass
    Not { check: Box<Check> },
}

/// Result of a verification check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationResult {
    pub passed: bool,
    pub message: String,
    pub actual_value: Option<String>, // For debugging
}

impl VerificationResult {
    fn unknown(name: &str) -> Self {
        Self {
            passed: false,
            message: format!("Unknown entity '{}'", name),
            actual_value: None,
        }
    }
}

fn within(actual: Option<f64>, expected: f64, tolerance: Option<f64>) -> bool {
    let tolerance = tolerance.unwrap_or(DEFAULT_TOLERANCE);
    actual.is_some_and(|actual| (actual - expected).abs() <= tolerance)
}

fn show(value: Option<f64>) -> Option<String> {
    value.map(|v| v.to_string())
}

impl Check {
    /// Evaluate check against scenario state
    pub fn evaluate(&self, world: &ScenarioWorld) -> VerificationResult {
        let host = world.host();

        match self {
            Check::Speed {
                entity,
                expected,
                tolerance,
            } => {
                let Some(id) = world.lookup(entity) else {
                    return VerificationResult::unknown(entity);
                };
                let actual = host.attribute(id, Attribute::MovementSpeed);
                VerificationResult {
                    passed: within(actual, *expected, *tolerance),
                    message: format!("{} speed: expected {}, got {:?}", entity, expected, actual),
                    actual_value: show(actual),
                }
            }

            Check::Size {
                entity,
                expected,
                tolerance,
            } => {
                let Some(id) = world.lookup(entity) else {
                    return VerificationResult::unknown(entity);
                };
                let actual = host.tag(id, TagKey::Size);
                VerificationResult {
                    passed: within(actual, *expected, *tolerance),
                    message: format!("{} size: expected {}, got {:?}", entity, expected, actual),
                    actual_value: show(actual),
                }
            }

            Check::SizeBetween { entity, min, max } => {
                let Some(id) = world.lookup(entity) else {
                    return VerificationResult::unknown(entity);
                };
                let actual = host.tag(id, TagKey::Size);
                VerificationResult {
                    passed: actual.is_some_and(|size| size >= *min && size <= *max),
                    message: format!(
                        "{} size: expected {}-{}, got {:?}",
                        entity, min, max, actual
                    ),
                    actual_value: show(actual),
                }
            }

            Check::Scale {
                entity,
                expected,
                tolerance,
            } => {
                let Some(id) = world.lookup(entity) else {
                    return VerificationResult::unknown(entity);
                };
                let actual = host.attribute(id, Attribute::Scale);
                VerificationResult {
                    passed: within(actual, *expected, *tolerance),
                    message: format!("{} scale: expected {}, got {:?}", entity, expected, actual),
                    actual_value: show(actual),
                }
            }

            Check::Load {
                carrier,
                expected,
                tolerance,
            } => {
                let Some(id) = world.lookup(carrier) else {
                    return VerificationResult::unknown(carrier);
                };
                let actual = world.storage_of(id).map(|inventory| {
                    weighted_load(
                        world.plugin().manager().weights(),
                        &host.inventory_contents(inventory),
                    )
                });
                VerificationResult {
                    passed: within(actual, *expected, *tolerance),
                    message: format!("{} load: expected {}, got {:?}", carrier, expected, actual),
                    actual_value: show(actual),
                }
            }

            Check::HasStorage { carrier, expected } => {
                let Some(id) = world.lookup(carrier) else {
                    return VerificationResult::unknown(carrier);
                };
                let actual = world.storage_of(id).is_some();
                VerificationResult {
                    passed: actual == *expected,
                    message: format!(
                        "{} has storage: expected {}, got {}",
                        carrier, expected, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::StoredCount {
                carrier,
                item,
                expected,
            } => {
                let Some(id) = world.lookup(carrier) else {
                    return VerificationResult::unknown(carrier);
                };
                let actual = world
                    .storage_of(id)
                    .and_then(|inventory| host.inventory(inventory))
                    .map(|grid| grid.count_item(*item))
                    .unwrap_or(0);
                VerificationResult {
                    passed: actual == *expected,
                    message: format!(
                        "{} stored {}: expected {}, got {}",
                        carrier, item, expected, actual
                    ),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::InventoryCount { expected } => {
                let actual = host.inventory_count();
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("Inventories: expected {}, got {}", expected, actual),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::OpenViews { actor, expected } => {
                let Some(id) = world.lookup(actor) else {
                    return VerificationResult::unknown(actor);
                };
                let actual = host
                    .open_views()
                    .iter()
                    .filter(|(viewer, _)| *viewer == id)
                    .count();
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("{} open views: expected {}, got {}", actor, expected, actual),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::DroppedStacks { expected } => {
                let actual = host.dropped().len();
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("Dropped stacks: expected {}, got {}", expected, actual),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::DroppedCount { item, expected } => {
                let actual = dropped_amount(host, *item);
                VerificationResult {
                    passed: actual == *expected,
                    message: format!("Dropped {}: expected {}, got {}", item, expected, actual),
                    actual_value: Some(actual.to_string()),
                }
            }

            Check::MessageSent { actor, text } => {
                let Some(id) = world.lookup(actor) else {
                    return VerificationResult::unknown(actor);
                };
                let received: Vec<&str> = messages_for(host, id);
                VerificationResult {
                    passed: received.contains(&text.as_str()),
                    message: format!("{} received \"{}\"", actor, text),
                    actual_value: Some(format!("{:?}", received)),
                }
            }

            Check::All { checks } => {
                let results: Vec<_> = checks.iter().map(|c| c.evaluate(world)).collect();
                let passed = results.iter().all(|r| r.passed);
                VerificationResult {
                    passed,
                    message: format!(
                        "All of {} checks: {}",
                        checks.len(),
                        if passed { "passed" } else { "failed" }
                    ),
                    actual_value: None,
                }
            }

            Check::Any { checks } => {
                let results: Vec<_> = checks.iter().map(|c| c.evaluate(world)).collect();
                let passed = results.iter().any(|r| r.passed);
                VerificationResult {
                    passed,
                    message: format!(
                        "Any of {} checks: {}",
                        checks.len(),
                        if passed { "passed" } else { "failed" }
                    ),
                    actual_value: None,
                }
            }

            Check::Not { check } => {
                let result = check.evaluate(world);
                VerificationResult {
                    passed: !result.passed,
                    message: format!("NOT ({})", result.message),
                    actual_value: result.actual_value,
                }
            }
        }
    }
}

fn dropped_amount(host: &SimHost, item: ItemType) -> u32 {
    host.dropped()
        .iter()
        .filter(|drop| drop.stack.item == item)
        .map(|drop| drop.stack.amount)
        .sum()
}

fn messages_for(host: &SimHost, actor: EntityId) -> Vec<&str> {
    host.messages()
        .iter()
        .filter(|(to, _)| *to == actor)
        .map(|(_, text)| text.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::scenario::{ScenarioDefinition, ScenarioRunner, ScenarioStep, SetupAction};

    fn lone_camel() -> (ScenarioRunner, ScenarioWorld) {
        let scenario = ScenarioDefinition {
            name: "lone camel".to_string(),
            description: String::new(),
            seed: Some(1),
            setup: vec![SetupAction::SpawnCarrier {
                name: "Humphrey".to_string(),
                speed: Some(0.2),
            }],
            steps: vec![ScenarioStep::Spawn {
                creature: "Humphrey".to_string(),
            }],
            verify: vec![],
        };
        let mut runner = ScenarioRunner::new(AppConfig::default());
        let mut world = runner.prepare(&scenario);
        runner.execute_scenario(&scenario, &mut world).unwrap();
        (runner, world)
    }

    fn speed_is(expected: f64) -> Check {
        Check::Speed {
            entity: "Humphrey".to_string(),
            expected,
            tolerance: None,
        }
    }

    #[test]
    fn test_trait_checks() {
        let (_, world) = lone_camel();
        assert!(speed_is(0.2).evaluate(&world).passed);
        assert!(Check::Size {
            entity: "Humphrey".to_string(),
            expected: 1.0,
            tolerance: None,
        }
        .evaluate(&world)
        .passed);
        assert!(Check::HasStorage {
            carrier: "Humphrey".to_string(),
            expected: false,
        }
        .evaluate(&world)
        .passed);
    }

    #[test]
    fn test_load_without_storage_fails() {
        let (_, world) = lone_camel();
        let result = Check::Load {
            carrier: "Humphrey".to_string(),
            expected: 0.0,
            tolerance: None,
        }
        .evaluate(&world);
        assert!(!result.passed);
        assert_eq!(result.actual_value, None);
    }

    #[test]
    fn test_unknown_entity_fails() {
        let (_, world) = lone_camel();
        let result = Check::Scale {
            entity: "Ghost".to_string(),
            expected: 1.0,
            tolerance: None,
        }
        .evaluate(&world);
        assert!(!result.passed);
        assert!(result.message.contains("Ghost"));
    }

    #[test]
    fn test_logical_operators() {
        let (_, world) = lone_camel();

        let any = Check::Any {
            checks: vec![speed_is(0.5), speed_is(0.2)],
        };
        assert!(any.evaluate(&world).passed);

        let all = Check::All {
            checks: vec![speed_is(0.5), speed_is(0.2)],
        };
        assert!(!all.evaluate(&world).passed);

        let not = Check::Not {
            check: Box::new(speed_is(0.5)),
        };
        assert!(not.evaluate(&world).passed);
    }
}
