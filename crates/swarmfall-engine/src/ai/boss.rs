//! Boss phase controller and per-archetype attack patterns.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use swarmfall_ecs::prelude::*;

use crate::components::{BossPhase, EnemyRangedAttack, EnemyType, Health, IsEnemy, Transform};
use crate::data::EnemyKind;
use crate::math::from_heading;
use crate::prefabs;
use crate::sim::Sim;

/// Timer applied after an attack by an archetype with no pattern.
pub const DEFAULT_ATTACK_INTERVAL: f32 = 5.0;

const GOLEM_SLAM: SlamPattern = SlamPattern { interval: 5.0, damage: 20.0, radius: 4.0 };
/// A golem with its own ranged attack slams for this multiple of it.
const GOLEM_SLAM_RANGED_MULT: f32 = 1.5;
const CHUNKHAM_BURST: BurstPattern = BurstPattern { interval: 6.0, count: 8, damage: 12.0, speed: 10.0 };
const BARK_CLOUDS: CloudPattern = CloudPattern { interval: 5.0, min_count: 3, max_count: 5, spread: 4.0, damage: 8.0 };
const BARK_BURST: BurstPattern = BurstPattern { interval: 4.0, count: 12, damage: 10.0, speed: 8.0 };
const BARK_SUMMON: SummonPattern = SummonPattern { interval: 8.0, count: 3, min_dist: 3.0, max_dist: 5.0 };

struct SlamPattern {
    interval: f32,
    damage: f32,
    radius: f32,
}

struct BurstPattern {
    interval: f32,
    count: u32,
    damage: f32,
    speed: f32,
}

struct CloudPattern {
    interval: f32,
    min_count: u32,
    max_count: u32,
    spread: f32,
    damage: f32,
}

struct SummonPattern {
    interval: f32,
    count: u32,
    min_dist: f32,
    max_dist: f32,
}

/// Phase reached at `ratio` health: one past the last threshold the ratio
/// is at or below, or zero when none is crossed.
pub fn compute_phase(thresholds: &[f32], ratio: f32) -> u32 {
    thresholds.iter().rposition(|&t| ratio <= t).map_or(0, |i| i as u32 + 1)
}

/// Raise `phase` to the phase `ratio` reaches; never lowers it.
pub fn advance_phase(phase: &mut BossPhase, thresholds: &[f32], ratio: f32) -> bool {
    let target = compute_phase(thresholds, ratio);
    if target > phase.phase {
        phase.phase = target;
        phase.pattern_timer = 0.0;
        phase.pattern_index = 0;
        true
    } else {
        false
    }
}

pub fn boss_phase(sim: &mut Sim) {
    let dt = sim.dt();
    let Some(player) = sim.player() else {
        return;
    };
    let Some(target) = sim.world.get::<Transform>(player).map(Transform::planar) else {
        return;
    };

    for e in sim.world.query::<(IsEnemy, BossPhase, Health, EnemyType, Transform)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let (Some(&state), Some(health), Some(kind), Some(at)) = (
            sim.world.get::<BossPhase>(e),
            sim.world.get::<Health>(e).map(Health::ratio),
            sim.world.get::<EnemyType>(e).map(|t| t.kind),
            sim.position(e),
        ) else {
            continue;
        };

        let mut state = state;
        if advance_phase(&mut state, kind.def().phase_thresholds, health) {
            tracing::debug!(%e, boss = kind.key(), phase = state.phase, "boss phase advanced");
        }
        if state.phase > 0 {
            state.pattern_timer += dt;
            state.attack_timer -= dt;
            if state.attack_timer <= 0.0 {
                state.attack_timer = dispatch_attack(sim, e, kind, &state, at, target);
                state.pattern_index += 1;
            }
        }
        if let Some(slot) = sim.world.get_mut::<BossPhase>(e) {
            *slot = state;
        }
    }
}

/// Fire the archetype's attack for the current phase and return the timer
/// until the next one.
fn dispatch_attack(sim: &mut Sim, boss: EntityId, kind: EnemyKind, state: &BossPhase, at: Vec3, target: Vec2) -> f32 {
    match kind {
        EnemyKind::StoneGolem => {
            let slam = GOLEM_SLAM;
            let damage = sim
                .world
                .get::<EnemyRangedAttack>(boss)
                .map_or(slam.damage, |r| r.damage * GOLEM_SLAM_RANGED_MULT);
            prefabs::spawn_boss_slam(sim, at + Vec3::Y * 0.1, damage, slam.radius);
            slam.interval
        }
        EnemyKind::Chunkham => radial_burst(sim, at, &CHUNKHAM_BURST, 0.0),
        EnemyKind::LilBark if state.phase >= 3 => {
            let summon = BARK_SUMMON;
            for _ in 0..summon.count {
                let angle = sim.rng.gen_range(0.0..TAU);
                let dist = sim.rng.gen_range(summon.min_dist..summon.max_dist);
                let spot = Vec2::new(at.x, at.z) + from_heading(angle) * dist;
                prefabs::spawn_enemy(sim, EnemyKind::Goblin, spot.x, spot.y);
            }
            summon.interval
        }
        EnemyKind::LilBark if state.phase == 2 => radial_burst(sim, at, &BARK_BURST, 0.0),
        EnemyKind::LilBark => {
            let clouds = BARK_CLOUDS;
            let count = sim.rng.gen_range(clouds.min_count..=clouds.max_count);
            for _ in 0..count {
                let ox = target.x + sim.rng.gen_range(-clouds.spread..clouds.spread);
                let oz = target.y + sim.rng.gen_range(-clouds.spread..clouds.spread);
                prefabs::spawn_poison_cloud(sim, Vec3::new(ox, at.y + 0.1, oz), clouds.damage);
            }
            clouds.interval
        }
        _ => DEFAULT_ATTACK_INTERVAL,
    }
}

fn radial_burst(sim: &mut Sim, at: Vec3, burst: &BurstPattern, offset: f32) -> f32 {
    let origin = at + Vec3::Y * 0.5;
    for i in 0..burst.count {
        let angle = offset + i as f32 / burst.count as f32 * TAU;
        prefabs::spawn_enemy_bolt(sim, origin, from_heading(angle), burst.damage, burst.speed);
    }
    burst.interval
}
