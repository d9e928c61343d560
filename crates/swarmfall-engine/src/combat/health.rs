//! Invincibility frames, death detection and regeneration.

use rand::Rng;
use swarmfall_ecs::prelude::*;

use crate::components::{DestroyFlag, EnemyType, Health, Invincible, IsEnemy, IsPlayer, PlayerStats};
use crate::data::{EnemyRank, ItemId};
use crate::events::GameEvent;
use crate::progression::drops;
use crate::sim::Sim;

/// Seconds a kill adds to the countdown while Soul Harvester is held.
pub const SOUL_HARVEST_SECONDS: f32 = 0.5;

/// Count down invincibility and drop it once spent. Also advances the
/// player's time-since-last-hit for the flex passive.
pub fn tick_invincibility(sim: &mut Sim) {
    let dt = sim.dt();
    for e in sim.world.query::<(Invincible,)>() {
        let expired = match sim.world.get_mut::<Invincible>(e) {
            Some(inv) => {
                inv.remaining -= dt;
                inv.remaining <= 0.0
            }
            None => false,
        };
        if expired {
            sim.world.remove::<Invincible>(e);
        }
    }
    for e in sim.world.query::<(PlayerStats,)>() {
        if let Some(stats) = sim.world.get_mut::<PlayerStats>(e) {
            stats.flex_timer += dt;
        }
    }
}

/// Flag every entity at or below zero health exactly once and run its
/// death side effects.
pub fn resolve_deaths(sim: &mut Sim) {
    for e in sim.world.query::<(Health,)>() {
        let Some(&health) = sim.world.get::<Health>(e) else {
            continue;
        };
        if health.current > 0.0 || sim.world.has::<DestroyFlag>(e) {
            continue;
        }
        sim.flag_destroy(e);
        let Some(position) = sim.position(e) else {
            continue;
        };

        if sim.world.has::<IsEnemy>(e) {
            enemy_died(sim, e);
            sim.emit(GameEvent::EntityDied { entity: e, position, was_enemy: true });
        } else if sim.world.has::<IsPlayer>(e) {
            sim.state.run_over = true;
            let p = &sim.state.player;
            let event = GameEvent::PlayerDied {
                time_alive: sim.state.time.elapsed,
                kills: p.kills,
                level: p.level,
                gold: p.gold,
            };
            tracing::info!(time_alive = sim.state.time.elapsed, kills = p.kills, level = p.level, "player died");
            sim.emit(event);
        } else {
            sim.emit(GameEvent::EntityDied { entity: e, position, was_enemy: false });
        }
    }
}

fn enemy_died(sim: &mut Sim, e: EntityId) {
    let Some(position) = sim.position(e) else {
        return;
    };
    let def = sim.world.get::<EnemyType>(e).map(|t| t.kind.def());
    let xp = def.map_or(5.0, |d| d.xp_value);
    drops::spawn_xp_drop(sim, position, xp.round().max(0.0) as u32);

    let db = &sim.config.balance.drops;
    let gold = match def.map(|d| (d.rank, d.gold_drop)) {
        Some((EnemyRank::Boss, g)) => if g > 0 { g } else { db.boss_gold },
        Some((EnemyRank::MiniBoss, g)) => if g > 0 { g } else { db.mini_boss_gold },
        Some((EnemyRank::Normal, _)) => {
            let chance = db.regular_gold_chance;
            u32::from(sim.rng.gen::<f32>() < chance)
        }
        None => 0,
    };
    if gold > 0 {
        drops::credit_gold(sim, gold);
    }

    sim.state.player.kills += 1;
    if sim.state.player.has_item(ItemId::SoulHarvester) {
        sim.state.time.countdown += SOUL_HARVEST_SECONDS;
    }
}

/// Apply the player's regen stat. Negative regen drains but never kills.
pub fn regenerate(sim: &mut Sim) {
    let dt = sim.dt();
    for e in sim.world.query::<(IsPlayer, Health, PlayerStats)>() {
        let Some(regen) = sim.world.get::<PlayerStats>(e).map(|s| s.regen) else {
            continue;
        };
        let Some(health) = sim.world.get_mut::<Health>(e) else {
            continue;
        };
        apply_regen(health, regen, dt);
    }
}

pub fn apply_regen(health: &mut Health, regen: f32, dt: f32) {
    if regen > 0.0 && health.current < health.max {
        health.heal(regen * dt);
    } else if regen < 0.0 && health.current > 0.0 {
        let floor = health.current.min(1.0);
        health.current = (health.current + regen * dt).max(floor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::IsXpGem;
    use crate::config::SimConfig;
    use crate::data::EnemyKind;
    use crate::events::EventKind;
    use crate::prefabs;

    fn sim() -> Sim {
        let mut sim = Sim::new(SimConfig::default()).unwrap();
        sim.state.time.delta = 1.0 / 60.0;
        sim
    }

    #[test]
    fn regen_heals_up_to_max() {
        let mut h = Health::new(100.0, 0.0);
        h.current = 99.9;
        apply_regen(&mut h, 60.0, 1.0);
        assert_eq!(h.current, 100.0);
    }

    #[test]
    fn drain_never_kills() {
        let mut h = Health::new(100.0, 0.0);
        h.current = 1.2;
        apply_regen(&mut h, -1.0, 1.0);
        assert_eq!(h.current, 1.0);
        h.current = 0.5;
        apply_regen(&mut h, -1.0, 1.0);
        assert_eq!(h.current, 0.5);
    }

    #[test]
    fn invincibility_expires() {
        let mut sim = sim();
        let player = sim.player().unwrap();
        sim.attach(player, Invincible { remaining: 0.02 });
        tick_invincibility(&mut sim);
        assert!(sim.world.has::<Invincible>(player));
        tick_invincibility(&mut sim);
        assert!(!sim.world.has::<Invincible>(player));
    }

    #[test]
    fn enemy_death_is_processed_once() {
        let mut sim = sim();
        let goblin = prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 5.0, 5.0);
        if let Some(h) = sim.world.get_mut::<Health>(goblin) {
            h.current = -3.0;
        }
        sim.events.begin_frame();
        resolve_deaths(&mut sim);
        resolve_deaths(&mut sim);

        assert_eq!(sim.state.player.kills, 1);
        assert!(sim.world.has::<DestroyFlag>(goblin));
        let died = sim.events.frame_events().iter().filter(|e| e.kind() == EventKind::EntityDied).count();
        assert_eq!(died, 1);
        assert!(!sim.world.query::<(IsXpGem,)>().is_empty());
    }

    #[test]
    fn player_death_ends_the_run() {
        let mut sim = sim();
        let player = sim.player().unwrap();
        if let Some(h) = sim.world.get_mut::<Health>(player) {
            h.current = 0.0;
        }
        sim.events.begin_frame();
        resolve_deaths(&mut sim);
        assert!(sim.state.run_over);
        assert!(sim.events.frame_events().iter().any(|e| e.kind() == EventKind::PlayerDied));
    }
}
