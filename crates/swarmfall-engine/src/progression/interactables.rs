//! Shrines and chests.
//!
//! Both carry an [`Interactable`]. A shrine charges while the player stands
//! in range and drains at a slower rate outside it; a chest has zero charge
//! time and opens on first proximity. Either activates exactly once.

use glam::Vec3;
use rand::Rng;

use crate::components::{Interactable, IsChest, IsShrine, PlayerStats, Transform};
use crate::data::loot::ITEMS;
use crate::data::{ItemDef, ItemId, Rarity, SHRINE_BOOSTS};
use crate::events::{GameEvent, PickupKind};
use crate::sim::Sim;

use super::stats;

/// Height above a chest at which item pop-ups are reported.
const ITEM_POPUP_HEIGHT: f32 = 1.5;

/// Advance shrine charge by one step. Returns `true` on the step the shrine
/// completes; activated shrines never change again.
pub fn charge_shrine(shrine: &mut Interactable, in_range: bool, dt: f32, decay_rate: f32) -> bool {
    if shrine.activated {
        return false;
    }
    if in_range {
        shrine.charge_progress += dt;
        if shrine.charge_progress >= shrine.charge_time {
            shrine.activated = true;
            return true;
        }
    } else {
        shrine.charge_progress = (shrine.charge_progress - dt * decay_rate).max(0.0);
    }
    false
}

/// Roll weight of an item. Luck scales every rarity above common.
pub fn item_weight(item: &ItemDef, luck: f32) -> f32 {
    let base = item.rarity.weight();
    if item.rarity == Rarity::Common {
        base
    } else {
        base * (1.0 + luck.max(0.0))
    }
}

/// Weighted pick over the item table given a uniform roll in `[0, 1)`.
pub fn pick_item(luck: f32, roll: f32) -> ItemId {
    let total: f32 = ITEMS.iter().map(|i| item_weight(i, luck)).sum();
    let mut cursor = roll * total;
    for item in &ITEMS {
        cursor -= item_weight(item, luck);
        if cursor < 0.0 {
            return item.id;
        }
    }
    // Rounding can leave the cursor a hair above zero.
    ITEMS[ITEMS.len() - 1].id
}

pub fn resolve_interactables(sim: &mut Sim) {
    let Some(player) = sim.player() else {
        return;
    };
    let Some(player_pos) = sim.world.get::<Transform>(player).map(Transform::planar) else {
        return;
    };
    resolve_shrines(sim, player_pos);
    resolve_chests(sim, player_pos);
}

fn resolve_shrines(sim: &mut Sim, player_pos: glam::Vec2) {
    let dt = sim.dt();
    let decay = sim.config.balance.interactables.shrine_decay_rate;
    for e in sim.world.query::<(IsShrine, Interactable, Transform)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let Some(tf) = sim.world.get::<Transform>(e).copied() else {
            continue;
        };
        let Some(shrine) = sim.world.get_mut::<Interactable>(e) else {
            continue;
        };
        let in_range = tf.planar().distance_squared(player_pos) < shrine.range * shrine.range;
        if !charge_shrine(shrine, in_range, dt, decay) {
            continue;
        }

        let boost = SHRINE_BOOSTS[sim.rng.gen_range(0..SHRINE_BOOSTS.len())];
        sim.state.player.shrine_boosts.push(boost.modifier);
        stats::recompute_player_stats(sim);
        tracing::info!(label = boost.label, "shrine activated");
        sim.emit(GameEvent::PickupCollected { entity: e, kind: PickupKind::Shrine, value: 0.0 });
        sim.emit(GameEvent::ShrineActivated {
            stat: boost.modifier.stat,
            value: boost.modifier.value,
            label: boost.label.to_string(),
            position: tf.position(),
        });
    }
}

fn resolve_chests(sim: &mut Sim, player_pos: glam::Vec2) {
    for e in sim.world.query::<(IsChest, Interactable, Transform)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let Some(tf) = sim.world.get::<Transform>(e).copied() else {
            continue;
        };
        let Some(chest) = sim.world.get_mut::<Interactable>(e) else {
            continue;
        };
        if chest.activated || tf.planar().distance_squared(player_pos) >= chest.range * chest.range {
            continue;
        }
        chest.activated = true;

        let rolls = if sim.state.player.has_item(ItemId::TheKey) { 2 } else { 1 };
        sim.emit(GameEvent::PickupCollected { entity: e, kind: PickupKind::Item, value: 0.0 });
        for _ in 0..rolls {
            grant_item(sim, tf.position() + Vec3::Y * ITEM_POPUP_HEIGHT);
        }
    }
}

fn grant_item(sim: &mut Sim, popup: Vec3) {
    let luck = sim.player().and_then(|p| sim.world.get::<PlayerStats>(p)).map_or(0.0, |s| s.luck);
    let roll: f32 = sim.rng.gen();
    let item = pick_item(luck, roll);
    let def = item.def();
    sim.state.player.items.push(item);
    stats::recompute_player_stats(sim);
    tracing::info!(item = def.name, rarity = ?def.rarity, "item collected");
    sim.emit(GameEvent::ItemCollected { item, name: def.name.to_string(), rarity: def.rarity, position: popup });
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
