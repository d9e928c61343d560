//! Synchronous, typed event bus.
//!
//! Every state change presentation might care about is announced as a
//! [`GameEvent`]. Subscribers register per [`EventKind`] in a fixed dispatch
//! table and are invoked synchronously, in subscription order, from inside
//! [`EventBus::emit`].
//!
//! The bus also keeps the events of the current fixed step in a frame log,
//! which later systems of the same step read instead of subscribing (the
//! boss timeline spots the boss's death this way).
//!
//! ```
//! use swarmfall_engine::events::{EventBus, EventKind, GameEvent, Reaction};
//!
//! let mut bus = EventBus::new();
//! bus.subscribe(EventKind::PlayerLevelUp, |event| match event {
//!     GameEvent::PlayerLevelUp { .. } => Reaction::Pause,
//!     _ => Reaction::Continue,
//! });
//!
//! bus.emit(GameEvent::PlayerLevelUp { level: 2 });
//! assert!(bus.take_pause_request());
//! assert!(!bus.take_pause_request());
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};
use swarmfall_ecs::entity::EntityId;

use crate::data::{EnemyKind, ItemId, Rarity, Stat};

// ---------------------------------------------------------------------------
// GameEvent
// ---------------------------------------------------------------------------

/// What a pickup was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Xp,
    Item,
    Shrine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    EntityDied {
        entity: EntityId,
        position: Vec3,
        was_enemy: bool,
    },
    EntityDamaged {
        entity: EntityId,
        amount: f32,
        position: Vec3,
        is_crit: bool,
    },
    PlayerLevelUp {
        level: u32,
    },
    PlayerDied {
        time_alive: f32,
        kills: u32,
        level: u32,
        gold: u32,
    },
    PickupCollected {
        entity: EntityId,
        kind: PickupKind,
        value: f32,
    },
    EnemySpawned {
        entity: EntityId,
        kind: EnemyKind,
    },
    BossSpawned {
        entity: EntityId,
        kind: EnemyKind,
    },
    BossDefeated {
        entity: EntityId,
    },
    ShrineActivated {
        stat: Stat,
        value: f32,
        label: String,
        position: Vec3,
    },
    ItemCollected {
        item: ItemId,
        name: String,
        rarity: Rarity,
        position: Vec3,
    },
    SwarmStarted,
    /// Emitted by destruction cleanup once the entity is gone.
    EntityDespawned {
        entity: EntityId,
    },
}

/// Discriminant of [`GameEvent`], used as the dispatch-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    EntityDied,
    EntityDamaged,
    PlayerLevelUp,
    PlayerDied,
    PickupCollected,
    EnemySpawned,
    BossSpawned,
    BossDefeated,
    ShrineActivated,
    ItemCollected,
    SwarmStarted,
    EntityDespawned,
}

impl EventKind {
    pub const COUNT: usize = 12;

    /// Wire name, e.g. `"entity:damaged"`.
    pub fn name(self) -> &'static str {
        match self {
            EventKind::EntityDied => "entity:died",
            EventKind::EntityDamaged => "entity:damaged",
            EventKind::PlayerLevelUp => "player:levelup",
            EventKind::PlayerDied => "player:died",
            EventKind::PickupCollected => "pickup:collected",
            EventKind::EnemySpawned => "enemy:spawned",
            EventKind::BossSpawned => "boss:spawned",
            EventKind::BossDefeated => "boss:defeated",
            EventKind::ShrineActivated => "shrine:activated",
            EventKind::ItemCollected => "item:collected",
            EventKind::SwarmStarted => "swarm:started",
            EventKind::EntityDespawned => "entity:despawned",
        }
    }
}

impl GameEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::EntityDied { .. } => EventKind::EntityDied,
            GameEvent::EntityDamaged { .. } => EventKind::EntityDamaged,
            GameEvent::PlayerLevelUp { .. } => EventKind::PlayerLevelUp,
            GameEvent::PlayerDied { .. } => EventKind::PlayerDied,
            GameEvent::PickupCollected { .. } => EventKind::PickupCollected,
            GameEvent::EnemySpawned { .. } => EventKind::EnemySpawned,
            GameEvent::BossSpawned { .. } => EventKind::BossSpawned,
            GameEvent::BossDefeated { .. } => EventKind::BossDefeated,
            GameEvent::ShrineActivated { .. } => EventKind::ShrineActivated,
            GameEvent::ItemCollected { .. } => EventKind::ItemCollected,
            GameEvent::SwarmStarted => EventKind::SwarmStarted,
            GameEvent::EntityDespawned { .. } => EventKind::EntityDespawned,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// What a subscriber asks of the simulation after handling an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reaction {
    #[default]
    Continue,
    /// Pause before the next fixed step (e.g. to show upgrade choices).
    Pause,
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent) -> Reaction>;

pub struct EventBus {
    /// Indexed by `EventKind as usize`.
    handlers: [Vec<(SubscriptionId, Handler)>; EventKind::COUNT],
    next_id: u64,
    frame_log: Vec<GameEvent>,
    pause_requested: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            handlers: std::array::from_fn(|_| Vec::new()),
            next_id: 0,
            frame_log: Vec::new(),
            pause_requested: false,
        }
    }

    /// Register `handler` for every event of `kind`.
    pub fn subscribe<F>(&mut self, kind: EventKind, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) -> Reaction + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.handlers[kind as usize].push((id, Box::new(handler)));
        id
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in &mut self.handlers {
            if let Some(pos) = list.iter().position(|(sid, _)| *sid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to its subscribers, then record it in the frame log.
    pub fn emit(&mut self, event: GameEvent) {
        let kind = event.kind();
        for (_, handler) in &mut self.handlers[kind as usize] {
            if handler(&event) == Reaction::Pause {
                self.pause_requested = true;
            }
        }
        tracing::trace!(event = kind.name(), "event emitted");
        self.frame_log.push(event);
    }

    /// Events emitted since the current fixed step began.
    pub fn frame_events(&self) -> &[GameEvent] {
        &self.frame_log
    }

    /// Start a new fixed step: clears the frame log.
    pub fn begin_frame(&mut self) {
        self.frame_log.clear();
    }

    /// `true` if any subscriber asked for a pause since the last call.
    pub fn take_pause_request(&mut self) -> bool {
        std::mem::take(&mut self.pause_requested)
    }

    pub fn subscriber_count(&self, kind: EventKind) -> usize {
        self.handlers[kind as usize].len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.handlers.iter().map(Vec::len).sum::<usize>())
            .field("frame_log", &self.frame_log.len())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn handlers_only_see_their_kind() {
        let mut bus = EventBus::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        bus.subscribe(EventKind::PlayerLevelUp, move |e| {
            sink.borrow_mut().push(e.clone());
            Reaction::Continue
        });

        bus.emit(GameEvent::SwarmStarted);
        bus.emit(GameEvent::PlayerLevelUp { level: 3 });

        assert_eq!(*seen.borrow(), vec![GameEvent::PlayerLevelUp { level: 3 }]);
        assert_eq!(bus.frame_events().len(), 2);
    }

    #[test]
    fn handlers_run_in_subscription_order() {
        let mut bus = EventBus::new();
        let order = Rc::new(RefCell::new(Vec::new()));
        for tag in ["first", "second"] {
            let order = Rc::clone(&order);
            bus.subscribe(EventKind::SwarmStarted, move |_| {
                order.borrow_mut().push(tag);
                Reaction::Continue
            });
        }
        bus.emit(GameEvent::SwarmStarted);
        assert_eq!(*order.borrow(), vec!["first", "second"]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let mut bus = EventBus::new();
        let hits = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&hits);
        let id = bus.subscribe(EventKind::SwarmStarted, move |_| {
            *counter.borrow_mut() += 1;
            Reaction::Continue
        });
        bus.emit(GameEvent::SwarmStarted);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        bus.emit(GameEvent::SwarmStarted);
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn frame_log_resets_per_step() {
        let mut bus = EventBus::new();
        bus.emit(GameEvent::SwarmStarted);
        bus.begin_frame();
        assert!(bus.frame_events().is_empty());
    }

    #[test]
    fn every_kind_has_a_distinct_name() {
        let kinds = [
            EventKind::EntityDied,
            EventKind::EntityDamaged,
            EventKind::PlayerLevelUp,
            EventKind::PlayerDied,
            EventKind::PickupCollected,
            EventKind::EnemySpawned,
            EventKind::BossSpawned,
            EventKind::BossDefeated,
            EventKind::ShrineActivated,
            EventKind::ItemCollected,
            EventKind::SwarmStarted,
            EventKind::EntityDespawned,
        ];
        assert_eq!(kinds.len(), EventKind::COUNT);
        let mut names: Vec<&str> = kinds.iter().map(|k| k.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), EventKind::COUNT);
    }
}
