//! Per-run singleton state.
//!
//! Everything that is not attached to an entity lives here: the run clock,
//! the player's meta-progress and loadout, and the flags of the scripted
//! spawn timeline. A fresh [`WorldState`] is built at every session start,
//! so restarting never leaks timeline or swarm flags from a previous run.

use serde::{Deserialize, Serialize};
use swarmfall_ecs::entity::EntityId;

use crate::data::{CharacterId, DifficultyId, DifficultyTier, ItemId, StatModifier, TomeId, WeaponId};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RunClock {
    /// Seconds simulated since session start.
    pub elapsed: f32,
    /// The fixed step currently being simulated.
    pub delta: f32,
    /// Seconds left on the session timer; clamps at zero.
    pub countdown: f32,
    /// Fixed steps completed this session.
    pub ticks: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlotState {
    pub weapon: WeaponId,
    pub level: u32,
    /// The weapon entity carrying this slot's `AutoAttack`.
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomeSlotState {
    pub tome: TomeId,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProgress {
    pub entity: Option<EntityId>,
    pub character: CharacterId,
    pub level: u32,
    pub xp: f32,
    pub xp_to_next: f32,
    pub kills: u32,
    pub gold: u32,
    pub weapons: Vec<WeaponSlotState>,
    pub tomes: Vec<TomeSlotState>,
    pub items: Vec<ItemId>,
    pub shrine_boosts: Vec<StatModifier>,
}

impl PlayerProgress {
    pub fn new(character: CharacterId, xp_to_next: f32) -> Self {
        Self {
            entity: None,
            character,
            level: 1,
            xp: 0.0,
            xp_to_next,
            kills: 0,
            gold: 0,
            weapons: Vec::new(),
            tomes: Vec::new(),
            items: Vec::new(),
            shrine_boosts: Vec::new(),
        }
    }

    pub fn has_item(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn weapon_slot(&self, weapon: WeaponId) -> Option<usize> {
        self.weapons.iter().position(|s| s.weapon == weapon)
    }

    pub fn tome_slot(&self, tome: TomeId) -> Option<usize> {
        self.tomes.iter().position(|s| s.tome == tome)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SpawnerState {
    pub timer: f32,
}

/// Scripted mini-boss / portal / boss progression. Each flag flips once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TimelineState {
    pub mini_boss_1_spawned: bool,
    pub mini_boss_2_spawned: bool,
    pub portal_spawned: bool,
    pub portal: Option<EntityId>,
    pub boss_spawned: bool,
    pub boss: Option<EntityId>,
    pub boss_defeated: bool,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SwarmState {
    pub active: bool,
    pub timer: f32,
    pub elapsed: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldState {
    pub time: RunClock,
    pub player: PlayerProgress,
    pub difficulty: DifficultyId,
    pub paused: bool,
    /// Set once the player dies; no further steps run.
    pub run_over: bool,
    pub spawner: SpawnerState,
    pub timeline: TimelineState,
    pub swarm: SwarmState,
}

impl WorldState {
    pub fn new(character: CharacterId, difficulty: DifficultyId, session_length: f32, xp_to_next: f32) -> Self {
        Self {
            time: RunClock { countdown: session_length, ..RunClock::default() },
            player: PlayerProgress::new(character, xp_to_next),
            difficulty,
            paused: false,
            run_over: false,
            spawner: SpawnerState::default(),
            timeline: TimelineState::default(),
            swarm: SwarmState::default(),
        }
    }

    pub fn tier(&self) -> &'static DifficultyTier {
        self.difficulty.tier()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_starts_a_clean_run() {
        let state = WorldState::new(CharacterId::Fox, DifficultyId::Hard, 600.0, 10.0);
        assert_eq!(state.time.countdown, 600.0);
        assert_eq!(state.player.level, 1);
        assert_eq!(state.player.xp_to_next, 10.0);
        assert_eq!(state.timeline, TimelineState::default());
        assert!(!state.swarm.active);
        assert_eq!(state.tier().id, DifficultyId::Hard);
    }
}
