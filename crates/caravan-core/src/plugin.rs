//! Binds the carrier trait manager to host events

use crate::error::CarrierError;
use crate::events::{DispatchOutcome, EventBus, EventKind, HostEvent, Verdict};
use crate::host::HostMutAccess;
use crate::manager::CarrierTraitManager;
use crate::rng::TraitRng;

/// State the event handlers run against
pub struct CarrierRuntime<H, R> {
    pub manager: CarrierTraitManager,
    pub host: H,
    pub rng: R,
}

/// Carrier behavior installed on a host
pub struct CarrierPlugin<H, R> {
    bus: EventBus<CarrierRuntime<H, R>>,
    runtime: CarrierRuntime<H, R>,
}

impl<H, R> CarrierPlugin<H, R>
where
    H: HostMutAccess + 'static,
    R: TraitRng + 'static,
{
    /// Register the carrier handlers and take ownership of host and rng
    pub fn enable(manager: CarrierTraitManager, host: H, rng: R) -> Self {
        let mut bus = EventBus::new();
        bus.subscribe(EventKind::CreatureSpawned, "carrier_spawn", handle_spawn::<H, R>);
        bus.subscribe(EventKind::CreaturesBred, "carrier_breed", handle_breed::<H, R>);
        bus.subscribe(EventKind::ActorInteracted, "carrier_interact", handle_interact::<H, R>);
        bus.subscribe(EventKind::StorageSlotChanged, "carrier_load", handle_load::<H, R>);
        bus.subscribe(EventKind::StorageClosed, "carrier_load", handle_load::<H, R>);
        bus.subscribe(EventKind::CreatureDied, "carrier_death", handle_death::<H, R>);

        log::info!(
            "Carrier traits enabled: {} weighted item types, {}-slot storage",
            manager.weights().len(),
            manager.config().storage_slots
        );

        Self {
            bus,
            runtime: CarrierRuntime { manager, host, rng },
        }
    }

    /// Deliver one host event
    pub fn dispatch(&mut self, event: &HostEvent) -> DispatchOutcome {
        self.bus.dispatch(&mut self.runtime, event)
    }

    /// Extra handlers run after the carrier ones
    pub fn bus_mut(&mut self) -> &mut EventBus<CarrierRuntime<H, R>> {
        &mut self.bus
    }

    pub fn bus(&self) -> &EventBus<CarrierRuntime<H, R>> {
        &self.bus
    }

    pub fn manager(&self) -> &CarrierTraitManager {
        &self.runtime.manager
    }

    pub fn host(&self) -> &H {
        &self.runtime.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.runtime.host
    }

    /// Tear down, handing back the host
    pub fn into_host(self) -> H {
        self.runtime.host
    }
}

fn skipped(event: &HostEvent, err: CarrierError) -> Verdict {
    log::debug!("Ignoring {:?}: {}", event.kind(), err);
    Verdict::Pass
}

fn handle_spawn<H: HostMutAccess, R>(rt: &mut CarrierRuntime<H, R>, event: &HostEvent) -> Verdict {
    let HostEvent::CreatureSpawned { creature } = *event else {
        return Verdict::Pass;
    };
    match rt.manager.on_spawn(&mut rt.host, creature) {
        Ok(_) => Verdict::Pass,
        Err(err) => skipped(event, err),
    }
}

fn handle_breed<H: HostMutAccess, R: TraitRng>(
    rt: &mut CarrierRuntime<H, R>,
    event: &HostEvent,
) -> Verdict {
    let HostEvent::CreaturesBred {
        child,
        parent_a,
        parent_b,
    } = *event
    else {
        return Verdict::Pass;
    };
    match rt
        .manager
        .on_breed(&mut rt.host, &mut rt.rng, child, parent_a, parent_b)
    {
        Ok(_) => Verdict::Pass,
        Err(err) => skipped(event, err),
    }
}

fn handle_interact<H: HostMutAccess, R>(
    rt: &mut CarrierRuntime<H, R>,
    event: &HostEvent,
) -> Verdict {
    let HostEvent::ActorInteracted { actor, creature } = *event else {
        return Verdict::Pass;
    };
    match rt.manager.on_interact(&mut rt.host, actor, creature) {
        Ok(outcome) if outcome.cancels_default() => Verdict::CancelDefault,
        Ok(_) => Verdict::Pass,
        Err(err) => skipped(event, err),
    }
}

fn handle_load<H: HostMutAccess, R>(rt: &mut CarrierRuntime<H, R>, event: &HostEvent) -> Verdict {
    let (HostEvent::StorageSlotChanged { inventory } | HostEvent::StorageClosed { inventory }) =
        *event
    else {
        return Verdict::Pass;
    };
    match rt.manager.on_inventory_changed(&mut rt.host, inventory) {
        Ok(_) => Verdict::Pass,
        Err(err) => skipped(event, err),
    }
}

fn handle_death<H: HostMutAccess, R>(rt: &mut CarrierRuntime<H, R>, event: &HostEvent) -> Verdict {
    let HostEvent::CreatureDied { creature } = *event else {
        return Verdict::Pass;
    };
    match rt.manager.on_death(&mut rt.host, creature) {
        Ok(_) => Verdict::Pass,
        Err(err) => skipped(event, err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::FixedDraws;
    use crate::sim::SimHost;

    fn plugin() -> CarrierPlugin<SimHost, FixedDraws> {
        CarrierPlugin::enable(
            CarrierTraitManager::default(),
            SimHost::new(),
            FixedDraws::new([0.5]),
        )
    }

    #[test]
    fn test_enable_registers_handlers() {
        let plugin = plugin();
        let bus = plugin.bus();
        assert_eq!(bus.handler_count(EventKind::CreatureSpawned), 1);
        assert_eq!(bus.handler_count(EventKind::CreaturesBred), 1);
        assert_eq!(bus.handler_count(EventKind::ActorInteracted), 1);
        assert_eq!(bus.handler_count(EventKind::StorageSlotChanged), 1);
        assert_eq!(bus.handler_count(EventKind::StorageClosed), 1);
        assert_eq!(bus.handler_count(EventKind::CreatureDied), 1);
    }

    #[test]
    fn test_non_carrier_events_are_ignored() {
        let mut plugin = plugin();
        let pig = plugin.host_mut().spawn_animal("Pig");
        let outcome = plugin.dispatch(&HostEvent::CreatureSpawned { creature: pig });
        assert_eq!(outcome.handlers_run, 1);
        assert!(plugin.host().tags_of(pig).is_empty());
    }

    #[test]
    fn test_extra_handlers_run_after_carrier_handlers() {
        let mut plugin = plugin();
        plugin
            .bus_mut()
            .subscribe(EventKind::CreatureSpawned, "audit", |rt, event| {
                if let HostEvent::CreatureSpawned { creature } = *event {
                    // Carrier handler already ran, so the size tag is there
                    assert!(rt.host.tag_value(creature, "size").is_some());
                }
                Verdict::Pass
            });
        let camel = plugin.host_mut().spawn_carrier("Humphrey");
        let outcome = plugin.dispatch(&HostEvent::CreatureSpawned { creature: camel });
        assert_eq!(outcome.handlers_run, 2);
    }
}
