//! The loadout: weapon and tome slots, level-up choices and applying them.
//!
//! Every mutation validates first and leaves the state untouched when it
//! returns an error, then recomputes derived stats on success.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::data::{TomeId, WeaponId};
use crate::prefabs;
use crate::sim::Sim;
use crate::state::{TomeSlotState, WeaponSlotState};
use crate::SimError;

use super::stats;

/// One option offered on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "choice", rename_all = "snake_case")]
pub enum LevelUpChoice {
    UpgradeWeapon { slot: usize },
    NewWeapon { weapon: WeaponId },
    UpgradeTome { slot: usize },
    NewTome { tome: TomeId },
}

/// Every choice that could be applied right now, in a stable order.
pub fn legal_choices(sim: &Sim) -> Vec<LevelUpChoice> {
    let lb = &sim.config.balance.loadout;
    let p = &sim.state.player;
    let mut choices = Vec::new();

    for (slot, w) in p.weapons.iter().enumerate() {
        if w.level < lb.max_weapon_level {
            choices.push(LevelUpChoice::UpgradeWeapon { slot });
        }
    }
    if p.weapons.len() < lb.weapon_slots {
        choices.extend(
            WeaponId::ALL
                .into_iter()
                .filter(|&w| p.weapon_slot(w).is_none())
                .map(|weapon| LevelUpChoice::NewWeapon { weapon }),
        );
    }
    for (slot, t) in p.tomes.iter().enumerate() {
        if t.level < lb.max_tome_level {
            choices.push(LevelUpChoice::UpgradeTome { slot });
        }
    }
    if p.tomes.len() < lb.tome_slots {
        choices.extend(TomeId::all().filter(|&t| p.tome_slot(t).is_none()).map(|tome| LevelUpChoice::NewTome { tome }));
    }
    choices
}

/// Draw up to `choices_per_level` distinct legal choices.
pub fn roll_level_up_choices(sim: &mut Sim) -> Vec<LevelUpChoice> {
    let mut pool = legal_choices(sim);
    let n = sim.config.balance.loadout.choices_per_level.min(pool.len());
    // Partial Fisher-Yates: the first n entries end up a uniform sample.
    for i in 0..n {
        let j = sim.rng.gen_range(i..pool.len());
        pool.swap(i, j);
    }
    pool.truncate(n);
    pool
}

pub fn apply_choice(sim: &mut Sim, choice: LevelUpChoice) -> Result<(), SimError> {
    match choice {
        LevelUpChoice::UpgradeWeapon { slot } => upgrade_weapon(sim, slot).map(drop),
        LevelUpChoice::NewWeapon { weapon } => add_weapon(sim, weapon).map(drop),
        LevelUpChoice::UpgradeTome { slot } => upgrade_tome(sim, slot).map(drop),
        LevelUpChoice::NewTome { tome } => add_tome(sim, tome).map(drop),
    }
}

/// Equip `weapon` in the next free slot, or level it up if already owned.
/// Returns the slot index.
pub fn add_weapon(sim: &mut Sim, weapon: WeaponId) -> Result<usize, SimError> {
    let player = sim.player().ok_or(SimError::NoPlayer)?;
    if let Some(slot) = sim.state.player.weapon_slot(weapon) {
        upgrade_weapon(sim, slot)?;
        return Ok(slot);
    }
    if sim.state.player.weapons.len() >= sim.config.balance.loadout.weapon_slots {
        return Err(SimError::SlotsFull("weapon"));
    }
    let slot = sim.state.player.weapons.len();
    let entity = prefabs::spawn_weapon(sim, player, weapon, slot);
    sim.state.player.weapons.push(WeaponSlotState { weapon, level: 1, entity });
    stats::recompute_weapon_stats(sim);
    tracing::info!(weapon = weapon.key(), slot, "weapon equipped");
    Ok(slot)
}

/// Returns the new level.
pub fn upgrade_weapon(sim: &mut Sim, slot: usize) -> Result<u32, SimError> {
    let max = sim.config.balance.loadout.max_weapon_level;
    let state = sim
        .state
        .player
        .weapons
        .get_mut(slot)
        .ok_or(SimError::UnknownSlot { kind: "weapon", index: slot })?;
    if state.level >= max {
        return Err(SimError::MaxLevel(state.weapon.key().to_string()));
    }
    state.level += 1;
    let (weapon, level) = (state.weapon, state.level);
    stats::recompute_weapon_stats(sim);
    tracing::info!(weapon = weapon.key(), level, "weapon upgraded");
    Ok(level)
}

/// Learn `tome` in the next free slot, or level it up if already known.
/// Returns the slot index.
pub fn add_tome(sim: &mut Sim, tome: TomeId) -> Result<usize, SimError> {
    sim.player().ok_or(SimError::NoPlayer)?;
    if let Some(slot) = sim.state.player.tome_slot(tome) {
        upgrade_tome(sim, slot)?;
        return Ok(slot);
    }
    if sim.state.player.tomes.len() >= sim.config.balance.loadout.tome_slots {
        return Err(SimError::SlotsFull("tome"));
    }
    let slot = sim.state.player.tomes.len();
    sim.state.player.tomes.push(TomeSlotState { tome, level: 1 });
    stats::recompute_player_stats(sim);
    tracing::info!(tome = tome.def().name, slot, "tome learned");
    Ok(slot)
}

/// Returns the new level.
pub fn upgrade_tome(sim: &mut Sim, slot: usize) -> Result<u32, SimError> {
    let max = sim.config.balance.loadout.max_tome_level;
    let state = sim
        .state
        .player
        .tomes
        .get_mut(slot)
        .ok_or(SimError::UnknownSlot { kind: "tome", index: slot })?;
    if state.level >= max {
        return Err(SimError::MaxLevel(state.tome.def().name.to_string()));
    }
    state.level += 1;
    let level = state.level;
    stats::recompute_player_stats(sim);
    Ok(level)
}
