//! XP gem physics, collection and the level-up loop.

use crate::components::{IsPickup, IsXpGem, PlayerStats, Transform, Velocity, XpValue};
use crate::config::XpBalance;
use crate::events::{GameEvent, PickupKind};
use crate::state::PlayerProgress;
use crate::sim::Sim;

use super::stats;

/// XP needed to go from `level` to `level + 1`. The first level always
/// costs the base amount; afterwards `floor(base · (1 + scaling · level))`.
pub fn xp_to_next_level(level: u32, balance: &XpBalance) -> f32 {
    if level <= 1 {
        balance.base_xp
    } else {
        // f64 keeps 10 · 1.3 from flooring to 12.
        let base = f64::from(balance.base_xp);
        (base * (1.0 + f64::from(balance.xp_scaling) * f64::from(level))).floor() as f32
    }
}

/// Scale a raw gem value by the player's gain, the difficulty and curse.
pub fn scaled_xp(base: f32, xp_gain: f32, difficulty_mult: f32, cursed: f32) -> f32 {
    let gain = if xp_gain > 0.0 { xp_gain } else { 1.0 };
    base * gain * difficulty_mult * (1.0 + cursed)
}

/// Add `amount` to the accumulator and level up as many times as it pays
/// for. Returns the levels gained; the accumulator always ends below the
/// next requirement.
pub fn apply_xp(progress: &mut PlayerProgress, amount: f32, balance: &XpBalance) -> u32 {
    progress.xp += amount.max(0.0);
    let mut gained = 0;
    while progress.xp_to_next > 0.0 && progress.xp >= progress.xp_to_next {
        progress.xp -= progress.xp_to_next;
        progress.level += 1;
        progress.xp_to_next = xp_to_next_level(progress.level, balance);
        gained += 1;
    }
    gained
}

pub fn collect_xp(sim: &mut Sim) {
    let Some(player) = sim.player() else {
        return;
    };
    let (Some(at), Some(&stats)) =
        (sim.world.get::<Transform>(player).map(Transform::planar), sim.world.get::<PlayerStats>(player))
    else {
        return;
    };
    let dt = sim.dt();
    let xb = sim.config.balance.xp.clone();
    let gravity = sim.config.balance.player.gravity;
    let difficulty_mult = sim.state.tier().xp_mult;
    let pickup_sq = stats.pickup_range * stats.pickup_range;
    let magnet = stats.pickup_range + xb.magnet_bonus;

    for gem in sim.world.query::<(IsPickup, IsXpGem, Transform, XpValue)>() {
        if sim.is_doomed(gem) {
            continue;
        }
        let (Some(&tf), Some(value)) = (sim.world.get::<Transform>(gem), sim.world.get::<XpValue>(gem).map(|v| v.amount))
        else {
            continue;
        };

        let rest = sim.ground(tf.x, tf.z) + xb.gem_float_height;
        let landed = tf.y <= rest;
        if landed {
            if let Some(t) = sim.world.get_mut::<Transform>(gem) {
                t.y = rest;
            }
        }
        if let Some(v) = sim.world.get_mut::<Velocity>(gem) {
            if landed {
                *v = Velocity::default();
            } else {
                v.y += gravity * dt;
            }
        }

        let offset = at - tf.planar();
        let dist_sq = offset.length_squared();
        if dist_sq < pickup_sq {
            let amount = scaled_xp(value, stats.xp_gain, difficulty_mult, stats.cursed);
            let gained = apply_xp(&mut sim.state.player, amount, &xb);
            sim.flag_destroy(gem);
            sim.emit(GameEvent::PickupCollected { entity: gem, kind: PickupKind::Xp, value: amount });
            announce_levels(sim, gained);
            continue;
        }
        if dist_sq < magnet * magnet && dist_sq > 1.0e-4 {
            let pull = offset / dist_sq.sqrt() * xb.magnet_speed;
            if let Some(v) = sim.world.get_mut::<Velocity>(gem) {
                v.set_planar(pull);
            }
        }
    }
}

/// One event per level gained, then refresh level-dependent passives.
fn announce_levels(sim: &mut Sim, gained: u32) {
    if gained == 0 {
        return;
    }
    let top = sim.state.player.level;
    for level in (top + 1 - gained)..=top {
        tracing::info!(level, "player levelled up");
        sim.emit(GameEvent::PlayerLevelUp { level });
    }
    stats::recompute_player_stats(sim);
}

/// Grant XP directly, bypassing gems. Returns the levels gained.
pub fn grant_xp(sim: &mut Sim, amount: f32) -> u32 {
    let xb = sim.config.balance.xp.clone();
    let gained = apply_xp(&mut sim.state.player, amount, &xb);
    announce_levels(sim, gained);
    gained
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CharacterId;

    fn progress() -> PlayerProgress {
        PlayerProgress::new(CharacterId::Knight, xp_to_next_level(1, &XpBalance::default()))
    }

    #[test]
    fn requirement_curve() {
        let b = XpBalance::default();
        assert_eq!(xp_to_next_level(1, &b), 10.0);
        assert_eq!(xp_to_next_level(2, &b), 13.0);
        assert_eq!(xp_to_next_level(10, &b), 25.0);
    }

    #[test]
    fn one_big_gain_levels_several_times() {
        let b = XpBalance::default();
        let mut p = progress();
        // 10 + 13 + 14 = 37 buys three levels.
        let gained = apply_xp(&mut p, 38.0, &b);
        assert_eq!(gained, 3);
        assert_eq!(p.level, 4);
        assert!((p.xp - 1.0).abs() < 1e-4);
        assert!(p.xp < p.xp_to_next);
    }

    #[test]
    fn gain_scaling() {
        assert!((scaled_xp(10.0, 1.5, 2.0, 0.5) - 45.0).abs() < 1e-4);
        assert_eq!(scaled_xp(10.0, 0.0, 1.0, 0.0), 10.0);
    }

    #[test]
    fn grant_emits_one_event_per_level() {
        let mut sim = Sim::new(crate::config::SimConfig::default()).unwrap();
        sim.events.begin_frame();
        assert_eq!(grant_xp(&mut sim, 38.0), 3);
        let levels: Vec<u32> = sim
            .events
            .frame_events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::PlayerLevelUp { level } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![2, 3, 4]);
    }
}
