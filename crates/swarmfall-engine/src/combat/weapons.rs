//! Weapon auto-fire: cooldown ticking and dispatch by firing pattern.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use swarmfall_ecs::prelude::*;

use crate::components::{AutoAttack, Boomerang, ChainLightning, Homing, IsWeapon, Transform, WeaponSlot};
use crate::data::FiringPattern;
use crate::math::{from_heading, heading_of, rotate, yaw_forward, DIR_EPSILON_SQ};
use crate::prefabs::{self, ProjectileSpec};
use crate::sim::Sim;

use super::nearest_enemy;

/// Distance in front of the owner melee-style shots appear at.
const FORWARD_SPAWN_DISTANCE: f32 = 1.5;
const MUZZLE_HEIGHT: f32 = 0.5;

/// Angular offsets for `count` shots `spacing` radians apart, centered on 0.
pub fn fan_offsets(count: u32, spacing: f32) -> Vec<f32> {
    let mid = (count.max(1) - 1) as f32 / 2.0;
    (0..count.max(1)).map(|i| (i as f32 - mid) * spacing).collect()
}

/// Offsets spreading `count` shots evenly across a cone of width `arc`.
pub fn cone_offsets(count: u32, arc: f32) -> Vec<f32> {
    if count <= 1 {
        return vec![0.0];
    }
    (0..count).map(|i| -arc / 2.0 + arc * i as f32 / (count - 1) as f32).collect()
}

/// Headings for `count` shots evenly spaced around a full circle.
pub fn radial_headings(count: u32, start: f32) -> Vec<f32> {
    let n = count.max(1);
    (0..n).map(|i| start + i as f32 / n as f32 * TAU).collect()
}

pub fn weapon_fire(sim: &mut Sim) {
    let dt = sim.dt();
    for w in sim.world.query::<(IsWeapon, AutoAttack, WeaponSlot)>() {
        let (Some(&attack), Some(&slot)) = (sim.world.get::<AutoAttack>(w), sim.world.get::<WeaponSlot>(w)) else {
            continue;
        };
        if sim.is_doomed(slot.owner) {
            continue;
        }
        let Some(&owner_tf) = sim.world.get::<Transform>(slot.owner) else {
            continue;
        };

        let timer = attack.cooldown_timer - dt;
        let ready = timer <= 0.0;
        if let Some(a) = sim.world.get_mut::<AutoAttack>(w) {
            a.cooldown_timer = if ready { a.cooldown } else { timer };
        }
        if ready {
            fire(sim, &attack, slot.owner, &owner_tf);
        }
    }
}

/// Dispatch one volley. Returns `false` when a targeted pattern found no
/// enemy in range and nothing was spawned.
pub fn fire(sim: &mut Sim, attack: &AutoAttack, owner: EntityId, owner_tf: &Transform) -> bool {
    let origin = owner_tf.position();
    let pos = owner_tf.planar();
    let facing = yaw_forward(owner_tf.rot_y);
    let combat = sim.config.balance.combat.clone();

    match attack.pattern {
        FiringPattern::Nearest | FiringPattern::Homing => {
            let Some((target, target_pos)) = nearest_enemy(sim, pos, attack.range, None) else {
                return false;
            };
            let aim = target_pos - pos;
            let aim = if aim.length_squared() > DIR_EPSILON_SQ { aim.normalize() } else { facing };
            for offset in fan_offsets(attack.projectile_count, combat.multi_shot_spread) {
                let shot = shoot(sim, attack, origin + Vec3::Y * MUZZLE_HEIGHT, rotate(aim, offset));
                if attack.pattern == FiringPattern::Homing {
                    sim.attach(shot, Homing { target: Some(target), turn_rate: combat.player_homing_turn_rate });
                }
                if attack.chains > 0 {
                    sim.attach(shot, ChainLightning { remaining: attack.chains, radius: attack.chain_radius });
                }
            }
        }
        FiringPattern::Forward => {
            let front = origin + Vec3::new(facing.x * FORWARD_SPAWN_DISTANCE, MUZZLE_HEIGHT, facing.y * FORWARD_SPAWN_DISTANCE);
            for offset in fan_offsets(attack.projectile_count, combat.multi_shot_spread) {
                shoot(sim, attack, front, rotate(facing, offset));
            }
        }
        FiringPattern::ForwardSpread => {
            for offset in cone_offsets(attack.projectile_count, combat.forward_arc) {
                shoot(sim, attack, origin + Vec3::Y * MUZZLE_HEIGHT, rotate(facing, offset));
            }
        }
        FiringPattern::Radial => {
            for heading in radial_headings(attack.projectile_count, heading_of(facing)) {
                shoot(sim, attack, origin + Vec3::Y * MUZZLE_HEIGHT, from_heading(heading));
            }
        }
        FiringPattern::Aura => {
            prefabs::spawn_zone(sim, origin, attack.range, attack.damage, attack.knockback, attack.projectile_lifetime, Some(owner));
        }
        FiringPattern::Trail => {
            let feet = Vec3::new(origin.x, sim.ground(origin.x, origin.z) + 0.05, origin.z);
            prefabs::spawn_zone(sim, feet, attack.range, attack.damage, attack.knockback, attack.projectile_lifetime, None);
        }
        FiringPattern::Boomerang => {
            let aim = nearest_enemy(sim, pos, attack.range, None)
                .map(|(_, p)| p - pos)
                .filter(|d| d.length_squared() > DIR_EPSILON_SQ)
                .map_or(facing, Vec2::normalize);
            for offset in fan_offsets(attack.projectile_count, combat.multi_shot_spread) {
                let dir = rotate(aim, offset);
                let shot = shoot(sim, attack, origin + Vec3::Y * MUZZLE_HEIGHT, dir);
                sim.attach(
                    shot,
                    Boomerang {
                        owner,
                        elapsed: 0.0,
                        total_life: attack.projectile_lifetime,
                        speed: attack.projectile_speed,
                        forward_x: dir.x,
                        forward_z: dir.y,
                    },
                );
            }
        }
    }
    true
}

fn shoot(sim: &mut Sim, attack: &AutoAttack, origin: Vec3, dir: Vec2) -> EntityId {
    prefabs::spawn_projectile(
        sim,
        ProjectileSpec {
            origin,
            dir,
            speed: attack.projectile_speed,
            damage: attack.damage,
            knockback: attack.knockback,
            pierce: attack.pierce,
            lifetime: attack.projectile_lifetime,
            size: attack.projectile_size,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AttachedTo, IsProjectile};
    use crate::config::SimConfig;
    use crate::data::{EnemyKind, WeaponId};

    fn attack_for(weapon: WeaponId) -> AutoAttack {
        let d = weapon.def();
        AutoAttack {
            weapon,
            damage: d.damage,
            range: d.range,
            cooldown: d.cooldown,
            cooldown_timer: 0.0,
            pattern: d.pattern,
            knockback: d.knockback,
            projectile_count: d.projectile_count,
            projectile_speed: d.projectile_speed,
            projectile_lifetime: d.projectile_lifetime,
            projectile_size: d.projectile_size,
            pierce: d.pierce,
            chains: d.chains,
            chain_radius: d.chain_radius,
        }
    }

    fn setup() -> (Sim, EntityId, Transform) {
        let sim = Sim::new(SimConfig::default()).unwrap();
        let player = sim.player().unwrap();
        let tf = *sim.world.get::<Transform>(player).unwrap();
        (sim, player, tf)
    }

    fn projectiles(sim: &Sim) -> usize {
        sim.world.query::<(IsProjectile,)>().len()
    }

    #[test]
    fn offsets_are_centered() {
        assert_eq!(fan_offsets(1, 0.1), vec![0.0]);
        let three = fan_offsets(3, 0.1);
        assert!((three[0] + 0.1).abs() < 1e-6 && three[1] == 0.0 && (three[2] - 0.1).abs() < 1e-6);
        let cone = cone_offsets(3, 1.0);
        assert_eq!(cone, vec![-0.5, 0.0, 0.5]);
        assert_eq!(radial_headings(4, 0.0).len(), 4);
    }

    #[test]
    fn nearest_without_target_does_not_fire() {
        let (mut sim, player, tf) = setup();
        assert!(!fire(&mut sim, &attack_for(WeaponId::Bow), player, &tf));
        assert_eq!(projectiles(&sim), 0);
    }

    #[test]
    fn nearest_aims_at_the_closest_enemy() {
        let (mut sim, player, tf) = setup();
        prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 0.0, 10.0);
        prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 5.0, 0.0);
        assert!(fire(&mut sim, &attack_for(WeaponId::Bow), player, &tf));
        let shot = sim.world.query::<(IsProjectile,)>()[0];
        let v = sim.world.get::<crate::components::Velocity>(shot).unwrap().planar();
        assert!(v.x > 0.0 && v.y.abs() < 1e-3);
    }

    #[test]
    fn radial_fires_full_ring() {
        let (mut sim, player, tf) = setup();
        fire(&mut sim, &attack_for(WeaponId::FrostNova), player, &tf);
        assert_eq!(projectiles(&sim), 8);
    }

    #[test]
    fn aura_zone_follows_owner() {
        let (mut sim, player, tf) = setup();
        fire(&mut sim, &attack_for(WeaponId::Aura), player, &tf);
        let zone = sim.world.query::<(IsProjectile, AttachedTo)>();
        assert_eq!(zone.len(), 1);
        assert_eq!(sim.world.get::<AttachedTo>(zone[0]).unwrap().owner, player);
    }

    #[test]
    fn weapon_fire_resets_cooldown() {
        let (mut sim, _, _) = setup();
        sim.state.time.delta = 1.0 / 60.0;
        weapon_fire(&mut sim);
        let w = sim.world.query::<(IsWeapon,)>()[0];
        let a = sim.world.get::<AutoAttack>(w).unwrap();
        assert_eq!(a.cooldown_timer, a.cooldown);
        assert_eq!(projectiles(&sim), 1);
    }
}
