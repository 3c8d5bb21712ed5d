//! Scenario execution engine

use std::time::Instant;

use ahash::HashMap;
use anyhow::{bail, Context, Result};
use caravan_core::sim::SimHost;
use caravan_core::{
    Attribute, CarrierPlugin, CarrierTraitManager, EntityId, HostEvent, HostMutAccess,
    InventoryId, ItemStack, Location, TagKey,
};
use glam::Vec3;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

use super::definition::{ScenarioDefinition, ScenarioStep, SetupAction};
use super::results::RunReport;
use crate::config::AppConfig;

/// Plugin type scenarios run against
pub type ScenarioPlugin = CarrierPlugin<SimHost, Xoshiro256StarStar>;

/// Plugin plus the scenario's entity names
pub struct ScenarioWorld {
    plugin: ScenarioPlugin,
    names: HashMap<String, EntityId>,
}

impl ScenarioWorld {
    /// Fresh host and manager built from config, breeding seeded with `seed`
    pub fn new(config: &AppConfig, seed: u64) -> Self {
        let manager = CarrierTraitManager::new(config.carrier.clone());
        let host = SimHost::with_carrier_speed(config.sim.carrier_speed);
        let rng = Xoshiro256StarStar::seed_from_u64(seed);

        Self {
            plugin: CarrierPlugin::enable(manager, host, rng),
            names: HashMap::default(),
        }
    }

    pub fn plugin(&self) -> &ScenarioPlugin {
        &self.plugin
    }

    pub fn host(&self) -> &SimHost {
        self.plugin.host()
    }

    pub fn lookup(&self, name: &str) -> Option<EntityId> {
        self.names.get(name).copied()
    }

    /// Inventory mapped to a carrier, if any
    pub fn storage_of(&self, carrier: EntityId) -> Option<InventoryId> {
        self.plugin
            .manager()
            .storages()
            .get(carrier)
            .map(|storage| storage.inventory)
    }

    fn require(&self, name: &str) -> Result<EntityId> {
        match self.lookup(name) {
            Some(id) => Ok(id),
            None => bail!("Unknown entity '{}'", name),
        }
    }

    fn register(&mut self, name: &str, id: EntityId) -> Result<()> {
        if self.names.contains_key(name) {
            bail!("Entity name '{}' used twice", name);
        }
        self.names.insert(name.to_string(), id);
        Ok(())
    }

    fn require_storage(&self, name: &str) -> Result<InventoryId> {
        let id = self.require(name)?;
        self.storage_of(id)
            .with_context(|| format!("'{}' has no storage yet", name))
    }
}

/// Configuration for scenario runner
#[derive(Debug, Clone, Default)]
pub struct RunnerConfig {
    /// Seed that wins over the scenario's own
    pub seed_override: Option<u64>,

    /// Verbose logging
    pub verbose: bool,
}

/// Executes scenario steps against an in-memory host
pub struct ScenarioRunner {
    app: AppConfig,
    config: RunnerConfig,
    log: Vec<String>,
    events_dispatched: usize,
    events_cancelled: usize,
}

impl ScenarioRunner {
    pub fn new(app: AppConfig) -> Self {
        Self::with_config(app, RunnerConfig::default())
    }

    pub fn with_config(app: AppConfig, config: RunnerConfig) -> Self {
        Self {
            app,
            config,
            log: Vec::new(),
            events_dispatched: 0,
            events_cancelled: 0,
        }
    }

    /// Seed a scenario runs with: override, then scenario, then config
    pub fn seed_for(&self, scenario: &ScenarioDefinition) -> u64 {
        self.config
            .seed_override
            .or(scenario.seed)
            .unwrap_or(self.app.sim.default_seed)
    }

    /// Build the world a scenario starts from
    pub fn prepare(&self, scenario: &ScenarioDefinition) -> ScenarioWorld {
        ScenarioWorld::new(&self.app, self.seed_for(scenario))
    }

    /// Run a scenario in a fresh world
    pub fn run(&mut self, scenario: &ScenarioDefinition) -> Result<RunReport> {
        let mut world = self.prepare(scenario);
        self.execute_scenario(scenario, &mut world)
    }

    /// Execute a complete scenario
    pub fn execute_scenario(
        &mut self,
        scenario: &ScenarioDefinition,
        world: &mut ScenarioWorld,
    ) -> Result<RunReport> {
        let start_time = Instant::now();
        let mut report = RunReport::new(scenario.name.clone(), self.seed_for(scenario));

        self.log.clear();
        self.events_dispatched = 0;
        self.events_cancelled = 0;

        self.log(&format!("Starting scenario: {}", scenario.name));
        if !scenario.description.is_empty() {
            self.log(&format!("Description: {}", scenario.description));
        }

        for (idx, action) in scenario.setup.iter().enumerate() {
            if let Err(e) = self.apply_setup(action, world) {
                let msg = format!("Setup action {} failed: {}", idx, e);
                self.log(&msg);
                return Err(anyhow::anyhow!(msg));
            }
        }

        self.log(&format!("Running {} steps", scenario.steps.len()));
        for (idx, step) in scenario.steps.iter().enumerate() {
            if let Err(e) = self.execute_step(step, world) {
                let msg = format!("Step {} failed: {}", idx, e);
                self.log(&msg);
                return Err(anyhow::anyhow!(msg));
            }
        }
        report.steps_executed = scenario.steps.len();

        if !scenario.verify.is_empty() {
            self.log(&format!("Running {} checks", scenario.verify.len()));
            for check in &scenario.verify {
                let result = check.evaluate(world);
                self.log(&format!(
                    "  {} {}",
                    if result.passed { "✓" } else { "✗" },
                    result.message
                ));

                if !result.passed {
                    report.verification_failures.push(result);
                }
            }
        }
        report.checks_run = scenario.verify.len();

        report.events_dispatched = self.events_dispatched;
        report.events_cancelled = self.events_cancelled;
        report.passed = report.verification_failures.is_empty();
        report.duration_ms = start_time.elapsed().as_secs_f64() * 1000.0;

        self.log(&format!(
            "Scenario complete: {} ({} events, {:.1}ms)",
            if report.passed { "PASSED" } else { "FAILED" },
            self.events_dispatched,
            report.duration_ms
        ));
        report.log = self.log.clone();

        Ok(report)
    }

    fn apply_setup(&mut self, action: &SetupAction, world: &mut ScenarioWorld) -> Result<()> {
        match action {
            SetupAction::SpawnCarrier { name, speed } => {
                let id = world.plugin.host_mut().spawn_carrier(name);
                if let Some(speed) = speed {
                    world
                        .plugin
                        .host_mut()
                        .set_attribute_base(id, Attribute::MovementSpeed, *speed);
                }
                world.register(name, id)?;
                self.log(&format!("Spawned carrier {} as {}", name, id));
            }
            SetupAction::SpawnPlayer { name } => {
                let id = world.plugin.host_mut().spawn_player(name);
                world.register(name, id)?;
            }
            SetupAction::SpawnAnimal { name } => {
                let id = world.plugin.host_mut().spawn_animal(name);
                world.register(name, id)?;
            }
            SetupAction::Saddle { name } => {
                let id = world.require(name)?;
                world.plugin.host_mut().set_saddled(id, true);
            }
            SetupAction::Hold {
                actor,
                item,
                amount,
            } => {
                let id = world.require(actor)?;
                world
                    .plugin
                    .host_mut()
                    .set_held(id, Some(ItemStack::new(*item, *amount)));
            }
            SetupAction::TagSize { name, size } => {
                let id = world.require(name)?;
                world.plugin.host_mut().set_tag(id, TagKey::Size, *size);
            }
        }
        Ok(())
    }

    fn execute_step(&mut self, step: &ScenarioStep, world: &mut ScenarioWorld) -> Result<()> {
        match step {
            ScenarioStep::Spawn { creature } => {
                let id = world.require(creature)?;
                self.dispatch(world, HostEvent::CreatureSpawned { creature: id });
            }

            ScenarioStep::Breed {
                child,
                parent_a,
                parent_b,
            } => {
                let parent_a = world.require(parent_a)?;
                let parent_b = world.require(parent_b)?;
                let child_id = world.plugin.host_mut().spawn_carrier(child);
                world.register(child, child_id)?;
                self.dispatch(
                    world,
                    HostEvent::CreaturesBred {
                        child: child_id,
                        parent_a,
                        parent_b,
                    },
                );
                if let Some(size) = world.host().tag_value(child_id, TagKey::Size.as_str()) {
                    self.log(&format!("{} born with size {:.4}", child, size));
                }
            }

            ScenarioStep::Interact { actor, creature } => {
                let actor = world.require(actor)?;
                let creature = world.require(creature)?;
                self.dispatch(world, HostEvent::ActorInteracted { actor, creature });
            }

            ScenarioStep::Store {
                carrier,
                item,
                amount,
            } => {
                let inventory = world.require_storage(carrier)?;
                let leftover = world
                    .plugin
                    .host_mut()
                    .inventory_mut(inventory)
                    .with_context(|| format!("{} is gone", inventory))?
                    .add_item(*item, *amount);
                if leftover > 0 {
                    self.log(&format!("{} {} did not fit", leftover, item));
                }
                self.dispatch(world, HostEvent::StorageSlotChanged { inventory });
                self.log_speed(world, carrier);
            }

            ScenarioStep::Take {
                carrier,
                item,
                amount,
            } => {
                let inventory = world.require_storage(carrier)?;
                let removed = world
                    .plugin
                    .host_mut()
                    .inventory_mut(inventory)
                    .with_context(|| format!("{} is gone", inventory))?
                    .remove_item(*item, *amount);
                if removed < *amount {
                    self.log(&format!("Only {} of {} {} taken", removed, amount, item));
                }
                self.dispatch(world, HostEvent::StorageSlotChanged { inventory });
                self.log_speed(world, carrier);
            }

            ScenarioStep::Close { carrier } => {
                let inventory = world.require_storage(carrier)?;
                self.dispatch(world, HostEvent::StorageClosed { inventory });
                self.log_speed(world, carrier);
            }

            ScenarioStep::Move {
                name,
                world: target,
                position,
            } => {
                let id = world.require(name)?;
                let (x, y, z) = *position;
                let location = target
                    .as_ref()
                    .map(|target| Location::new(target.as_str(), Vec3::new(x, y, z)));
                world.plugin.host_mut().move_to(id, location);
            }

            ScenarioStep::Die { creature } => {
                let id = world.require(creature)?;
                world.plugin.host_mut().kill(id);
                self.dispatch(world, HostEvent::CreatureDied { creature: id });
            }

            ScenarioStep::Log { message } => {
                self.log(message);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, world: &mut ScenarioWorld, event: HostEvent) {
        let outcome = world.plugin.dispatch(&event);
        self.events_dispatched += 1;
        if outcome.cancelled {
            self.events_cancelled += 1;
        }
        self.log(&format!(
            "{:?}: {} handlers{}",
            event.kind(),
            outcome.handlers_run,
            if outcome.cancelled {
                ", default cancelled"
            } else {
                ""
            }
        ));
    }

    fn log_speed(&mut self, world: &ScenarioWorld, name: &str) {
        let speed = world
            .lookup(name)
            .and_then(|id| world.host().attribute(id, Attribute::MovementSpeed));
        if let Some(speed) = speed {
            self.log(&format!("{} speed now {:.5}", name, speed));
        }
    }

    fn log(&mut self, message: &str) {
        if self.config.verbose {
            log::info!("{}", message);
        } else {
            log::debug!("{}", message);
        }
        self.log.push(message.to_string());
    }

    /// Messages logged by the last run
    pub fn get_log(&self) -> &[String] {
        &self.log
    }
}
