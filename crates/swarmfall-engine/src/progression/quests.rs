//! Quest tracking.
//!
//! A [`QuestTracker`] subscribes to the event bus and keeps progress on every
//! quest in [`QUESTS`]. Subscriptions survive [`Sim::restart`], so kills,
//! levels and boss clears accumulate across runs of one session. Survival
//! time and run gold are sampled from [`WorldState`], either when the player
//! dies or whenever [`QuestTracker::observe`] is called.
//!
//! ```
//! use swarmfall_engine::prelude::*;
//! use swarmfall_engine::progression::quests::QuestTracker;
//!
//! let mut sim = Sim::new(SimConfig::default()).unwrap();
//! let quests = QuestTracker::attach(&mut sim.events);
//! sim.state.time.elapsed = 200.0;
//! quests.observe(&sim.state);
//! assert!(quests.is_completed("survive_3"));
//! assert_eq!(quests.reward_gold(), 30);
//! ```
//!
//! [`Sim::restart`]: crate::sim::Sim::restart

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::data::{QuestDef, QuestKind, QUESTS};
use crate::events::{EventBus, EventKind, GameEvent, Reaction, SubscriptionId};
use crate::state::WorldState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub current: u32,
    pub completed: bool,
}

/// Progress on every quest plus the running totals that feed it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestBook {
    /// Parallel to [`QUESTS`].
    pub progress: Vec<QuestProgress>,
    pub total_kills: u32,
    pub boss_clears: u32,
    /// Gold paid out by completed quests.
    pub reward_gold: u32,
}

impl Default for QuestBook {
    fn default() -> Self {
        Self {
            progress: vec![QuestProgress { current: 0, completed: false }; QUESTS.len()],
            total_kills: 0,
            boss_clears: 0,
            reward_gold: 0,
        }
    }
}

impl QuestBook {
    /// Raise every unfinished quest of `kind` to at least `value` and pay
    /// out the ones that reach their target. Returns the quests completed.
    pub fn advance(&mut self, kind: QuestKind, value: u32) -> Vec<&'static QuestDef> {
        let mut finished = Vec::new();
        for (def, p) in QUESTS.iter().zip(self.progress.iter_mut()) {
            if def.kind != kind || p.completed {
                continue;
            }
            p.current = p.current.max(value);
            if p.current >= def.target {
                p.completed = true;
                self.reward_gold += def.reward_gold;
                tracing::info!(quest = def.key, name = def.name, reward = def.reward_gold, "quest complete");
                finished.push(def);
            }
        }
        finished
    }

    pub fn record_kill(&mut self) {
        self.total_kills += 1;
        self.advance(QuestKind::Kills, self.total_kills);
    }

    pub fn record_level(&mut self, level: u32) {
        self.advance(QuestKind::Level, level);
    }

    pub fn record_boss_clear(&mut self) {
        self.boss_clears += 1;
        self.advance(QuestKind::Clear, self.boss_clears);
    }

    pub fn record_run(&mut self, time_alive: f32, gold: u32) {
        self.advance(QuestKind::Survive, time_alive.max(0.0).floor() as u32);
        self.advance(QuestKind::Gold, gold);
    }

    pub fn completed_count(&self) -> usize {
        self.progress.iter().filter(|p| p.completed).count()
    }
}

/// Event-driven quest progress shared with the bus subscriptions.
#[derive(Debug)]
pub struct QuestTracker {
    book: Rc<RefCell<QuestBook>>,
    subscriptions: Vec<SubscriptionId>,
}

impl QuestTracker {
    /// Start tracking with fresh progress.
    pub fn attach(events: &mut EventBus) -> Self {
        Self::attach_with(events, QuestBook::default())
    }

    /// Resume tracking from an existing book.
    pub fn attach_with(events: &mut EventBus, book: QuestBook) -> Self {
        let book = Rc::new(RefCell::new(book));
        let mut subscriptions = Vec::with_capacity(4);

        let b = Rc::clone(&book);
        subscriptions.push(events.subscribe(EventKind::EntityDied, move |event| {
            if let GameEvent::EntityDied { was_enemy: true, .. } = event {
                b.borrow_mut().record_kill();
            }
            Reaction::Continue
        }));

        let b = Rc::clone(&book);
        subscriptions.push(events.subscribe(EventKind::PlayerLevelUp, move |event| {
            if let GameEvent::PlayerLevelUp { level } = event {
                b.borrow_mut().record_level(*level);
            }
            Reaction::Continue
        }));

        let b = Rc::clone(&book);
        subscriptions.push(events.subscribe(EventKind::BossDefeated, move |_| {
            b.borrow_mut().record_boss_clear();
            Reaction::Continue
        }));

        let b = Rc::clone(&book);
        subscriptions.push(events.subscribe(EventKind::PlayerDied, move |event| {
            if let GameEvent::PlayerDied { time_alive, gold, .. } = event {
                b.borrow_mut().record_run(*time_alive, *gold);
            }
            Reaction::Continue
        }));

        Self { book, subscriptions }
    }

    /// Sample survival time, run gold, level and boss clear from a live run.
    pub fn observe(&self, state: &WorldState) {
        let mut book = self.book.borrow_mut();
        book.record_run(state.time.elapsed, state.player.gold);
        book.advance(QuestKind::Level, state.player.level);
        if state.timeline.boss_defeated {
            book.advance(QuestKind::Clear, 1);
        }
    }

    /// Remove the subscriptions and hand back the final progress.
    pub fn detach(self, events: &mut EventBus) -> QuestBook {
        for id in &self.subscriptions {
            events.unsubscribe(*id);
        }
        let book = self.book.borrow().clone();
        book
    }

    pub fn book(&self) -> QuestBook {
        self.book.borrow().clone()
    }

    pub fn progress(&self, key: &str) -> Option<QuestProgress> {
        let index = QUESTS.iter().position(|q| q.key == key)?;
        self.book.borrow().progress.get(index).copied()
    }

    pub fn is_completed(&self, key: &str) -> bool {
        self.progress(key).is_some_and(|p| p.completed)
    }

    pub fn reward_gold(&self) -> u32 {
        self.book.borrow().reward_gold
    }

    pub fn completed_count(&self) -> usize {
        self.book.borrow().completed_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use swarmfall_ecs::entity::EntityId;

    fn enemy_died(bus: &mut EventBus, was_enemy: bool) {
        bus.emit(GameEvent::EntityDied { entity: EntityId::new(1, 0), position: Vec3::ZERO, was_enemy });
    }

    #[test]
    fn kill_quest_completes_once_and_pays_once() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        for _ in 0..99 {
            enemy_died(&mut bus, true);
        }
        assert!(!quests.is_completed("kills_100"));
        assert_eq!(quests.reward_gold(), 0);

        enemy_died(&mut bus, true);
        assert!(quests.is_completed("kills_100"));
        assert_eq!(quests.reward_gold(), 50);

        for _ in 0..50 {
            enemy_died(&mut bus, true);
        }
        assert_eq!(quests.reward_gold(), 50);
        assert_eq!(quests.completed_count(), 1);
        assert_eq!(quests.book().total_kills, 150);
    }

    #[test]
    fn non_enemy_deaths_do_not_count() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        for _ in 0..200 {
            enemy_died(&mut bus, false);
        }
        assert_eq!(quests.book().total_kills, 0);
        assert_eq!(quests.progress("kills_100").map(|p| p.current), Some(0));
    }

    #[test]
    fn level_quest_tracks_the_highest_level() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        bus.emit(GameEvent::PlayerLevelUp { level: 9 });
        bus.emit(GameEvent::PlayerLevelUp { level: 4 });
        assert_eq!(quests.progress("level_10").map(|p| p.current), Some(9));
        bus.emit(GameEvent::PlayerLevelUp { level: 10 });
        assert!(quests.is_completed("level_10"));
        assert_eq!(quests.reward_gold(), 50);
    }

    #[test]
    fn boss_defeat_completes_the_clear_quest() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        bus.emit(GameEvent::BossDefeated { entity: EntityId::new(3, 0) });
        assert!(quests.is_completed("first_boss"));
        assert_eq!(quests.reward_gold(), 300);
    }

    #[test]
    fn player_death_settles_survival_and_gold() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        bus.emit(GameEvent::PlayerDied { time_alive: 305.7, kills: 0, level: 1, gold: 120 });
        assert!(quests.is_completed("survive_3"));
        assert!(quests.is_completed("survive_5"));
        assert!(!quests.is_completed("survive_10"));
        assert_eq!(quests.progress("survive_10").map(|p| p.current), Some(305));
        assert!(quests.is_completed("gold_100"));
        assert_eq!(quests.reward_gold(), 30 + 75 + 50);
    }

    #[test]
    fn detach_stops_tracking_and_returns_the_book() {
        let mut bus = EventBus::new();
        let quests = QuestTracker::attach(&mut bus);
        enemy_died(&mut bus, true);
        let book = quests.detach(&mut bus);
        assert_eq!(book.total_kills, 1);
        assert_eq!(bus.subscriber_count(EventKind::EntityDied), 0);

        let resumed = QuestTracker::attach_with(&mut bus, book);
        enemy_died(&mut bus, true);
        assert_eq!(resumed.book().total_kills, 2);
    }
}
