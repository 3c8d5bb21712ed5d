//! Host event bus
//!
//! The dispatcher owns, per event kind, an ordered list of handlers. Delivering
//! an event runs each handler for its kind synchronously, in registration
//! order. Handlers may ask the host to skip its default behavior; that flag
//! does not stop later handlers from running.

use ahash::HashMap;
use serde::{Deserialize, Serialize};

use crate::types::{EntityId, InventoryId};

/// Events the host delivers, one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    CreatureSpawned {
        creature: EntityId,
    },
    CreaturesBred {
        child: EntityId,
        parent_a: EntityId,
        parent_b: EntityId,
    },
    ActorInteracted {
        actor: EntityId,
        creature: EntityId,
    },
    StorageSlotChanged {
        inventory: InventoryId,
    },
    StorageClosed {
        inventory: InventoryId,
    },
    CreatureDied {
        creature: EntityId,
    },
}

impl HostEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            HostEvent::CreatureSpawned { .. } => EventKind::CreatureSpawned,
            HostEvent::CreaturesBred { .. } => EventKind::CreaturesBred,
            HostEvent::ActorInteracted { .. } => EventKind::ActorInteracted,
            HostEvent::StorageSlotChanged { .. } => EventKind::StorageSlotChanged,
            HostEvent::StorageClosed { .. } => EventKind::StorageClosed,
            HostEvent::CreatureDied { .. } => EventKind::CreatureDied,
        }
    }
}

/// Discriminant of a `HostEvent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    CreatureSpawned,
    CreaturesBred,
    ActorInteracted,
    StorageSlotChanged,
    StorageClosed,
    CreatureDied,
}

/// A handler's answer to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    #[default]
    Pass,
    /// Skip the host's default behavior for this event
    CancelDefault,
}

/// Aggregate result of one dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchOutcome {
    /// Some handler asked to cancel the host default
    pub cancelled: bool,
    pub handlers_run: usize,
}

type Handler<C> = Box<dyn FnMut(&mut C, &HostEvent) -> Verdict>;

struct Subscriber<C> {
    name: &'static str,
    handler: Handler<C>,
}

/// Event dispatcher over a handler context `C`
pub struct EventBus<C> {
    subscribers: HashMap<EventKind, Vec<Subscriber<C>>>,
}

impl<C> EventBus<C> {
    pub fn new() -> Self {
        Self {
            subscribers: HashMap::default(),
        }
    }

    /// Append a handler for one event kind
    pub fn subscribe(
        &mut self,
        kind: EventKind,
        name: &'static str,
        handler: impl FnMut(&mut C, &HostEvent) -> Verdict + 'static,
    ) {
        log::debug!("Subscribed {} to {:?}", name, kind);
        self.subscribers.entry(kind).or_default().push(Subscriber {
            name,
            handler: Box::new(handler),
        });
    }

    /// Deliver an event to every handler of its kind
    pub fn dispatch(&mut self, context: &mut C, event: &HostEvent) -> DispatchOutcome {
        let mut outcome = DispatchOutcome::default();
        let Some(subscribers) = self.subscribers.get_mut(&event.kind()) else {
            return outcome;
        };

        for subscriber in subscribers.iter_mut() {
            let verdict = (subscriber.handler)(context, event);
            if verdict == Verdict::CancelDefault {
                log::trace!("{} cancelled default handling of {:?}", subscriber.name, event);
                outcome.cancelled = true;
            }
            outcome.handlers_run += 1;
        }

        outcome
    }

    /// Number of handlers registered for a kind
    pub fn handler_count(&self, kind: EventKind) -> usize {
        self.subscribers.get(&kind).map_or(0, Vec::len)
    }

    /// Handler names for a kind, in dispatch order
    pub fn handler_names(&self, kind: EventKind) -> Vec<&'static str> {
        self.subscribers
            .get(&kind)
            .map(|subs| subs.iter().map(|sub| sub.name).collect())
            .unwrap_or_default()
    }
}

impl<C> Default for EventBus<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_in_registration_order() {
        let mut bus: EventBus<Vec<&'static str>> = EventBus::new();
        bus.subscribe(EventKind::CreatureSpawned, "first", |log, _| {
            log.push("first");
            Verdict::Pass
        });
        bus.subscribe(EventKind::CreatureSpawned, "second", |log, _| {
            log.push("second");
            Verdict::Pass
        });

        let mut log = Vec::new();
        let event = HostEvent::CreatureSpawned {
            creature: EntityId::new(),
        };
        let outcome = bus.dispatch(&mut log, &event);

        assert_eq!(log, vec!["first", "second"]);
        assert_eq!(outcome.handlers_run, 2);
        assert!(!outcome.cancelled);
        assert_eq!(
            bus.handler_names(EventKind::CreatureSpawned),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_only_matching_kind_runs() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.subscribe(EventKind::CreatureDied, "count", |count, _| {
            *count += 1;
            Verdict::Pass
        });

        let mut count = 0;
        let outcome = bus.dispatch(
            &mut count,
            &HostEvent::StorageClosed {
                inventory: InventoryId(1),
            },
        );
        assert_eq!(count, 0);
        assert_eq!(outcome, DispatchOutcome::default());
        assert_eq!(bus.handler_count(EventKind::StorageClosed), 0);
    }

    #[test]
    fn test_cancel_does_not_stop_later_handlers() {
        let mut bus: EventBus<u32> = EventBus::new();
        bus.subscribe(EventKind::ActorInteracted, "cancel", |_, _| {
            Verdict::CancelDefault
        });
        bus.subscribe(EventKind::ActorInteracted, "count", |count, _| {
            *count += 1;
            Verdict::Pass
        });

        let mut count = 0;
        let event = HostEvent::ActorInteracted {
            actor: EntityId::new(),
            creature: EntityId::new(),
        };
        let outcome = bus.dispatch(&mut count, &event);
        assert!(outcome.cancelled);
        assert_eq!(outcome.handlers_run, 2);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_event_kinds() {
        let id = EntityId::new();
        assert_eq!(
            HostEvent::CreatureDied { creature: id }.kind(),
            EventKind::CreatureDied
        );
        assert_eq!(
            HostEvent::CreaturesBred {
                child: id,
                parent_a: id,
                parent_b: id,
            }
            .kind(),
            EventKind::CreaturesBred
        );
    }
}
