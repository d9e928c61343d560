//! Final swarm: after the boss falls, ghosts pour in at an ever shorter
//! interval, and late arrivals are tougher.

use crate::components::Health;
use crate::config::SwarmBalance;
use crate::data::EnemyKind;
use crate::events::GameEvent;
use crate::math::lerp;
use crate::prefabs;
use crate::sim::Sim;

use super::point_around_player;

pub fn start_final_swarm(sim: &mut Sim) {
    let swarm = &mut sim.state.swarm;
    if swarm.active {
        return;
    }
    swarm.active = true;
    swarm.timer = 0.0;
    swarm.elapsed = 0.0;
    tracing::info!("final swarm started");
    sim.emit(GameEvent::SwarmStarted);
}

/// Spawn interval `swarm_elapsed` seconds into the swarm.
pub fn swarm_interval(swarm_elapsed: f32, balance: &SwarmBalance) -> f32 {
    let t = (swarm_elapsed / balance.ramp_duration).min(1.0);
    lerp(balance.initial_interval, balance.min_interval, t)
}

pub fn final_swarm(sim: &mut Sim) {
    if !sim.state.swarm.active {
        return;
    }
    let balance = sim.config.balance.swarm.clone();
    let dt = sim.dt();
    let swarm = &mut sim.state.swarm;
    swarm.elapsed += dt;
    swarm.timer += dt;
    let interval = swarm_interval(swarm.elapsed, &balance);
    if swarm.timer < interval {
        return;
    }
    swarm.timer -= interval;
    let elapsed = swarm.elapsed;

    let radius = sim.config.balance.spawner.spawn_radius;
    let Some(at) = point_around_player(sim, radius) else {
        return;
    };
    let ghost = prefabs::spawn_enemy(sim, EnemyKind::Ghost, at.x, at.y);
    if elapsed >= balance.super_threshold {
        if let Some(health) = sim.world.get_mut::<Health>(ghost) {
            health.max *= balance.super_health_mult;
            health.current *= balance.super_health_mult;
        }
    }
}
