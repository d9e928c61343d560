//! Ranged attack cadence for archers, wisps and shamans.

use glam::{Vec2, Vec3};

use crate::components::{EnemyRangedAttack, IsEnemy, Transform};
use crate::data::EnemyProjectileKind;
use crate::prefabs;
use crate::sim::Sim;

/// Height above the attacker's origin bolts are launched from.
const MUZZLE_HEIGHT: f32 = 0.5;
/// Height above the target's origin clouds are centered on.
const CLOUD_HEIGHT: f32 = 0.2;

/// Tick the cooldown. On expiry the timer is reset and `true` is returned
/// unless the target sits inside the minimum-range gate.
pub fn ready_to_fire(attack: &mut EnemyRangedAttack, distance: f32, dt: f32) -> bool {
    attack.timer -= dt;
    if attack.timer > 0.0 {
        return false;
    }
    attack.timer = attack.cooldown;
    !(attack.min_range > 0.0 && distance < attack.min_range)
}

pub fn ranged_attack(sim: &mut Sim) {
    let dt = sim.dt();
    let Some(player) = sim.player() else {
        return;
    };
    let Some(target) = sim.position(player) else {
        return;
    };
    let target_planar = Vec2::new(target.x, target.z);

    for e in sim.world.query::<(IsEnemy, EnemyRangedAttack, Transform)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let (Some(&attack), Some(at)) = (sim.world.get::<EnemyRangedAttack>(e), sim.position(e)) else {
            continue;
        };
        let to_target = target_planar - Vec2::new(at.x, at.z);
        let distance = to_target.length();

        let mut attack = attack;
        let fire = ready_to_fire(&mut attack, distance, dt);
        if let Some(slot) = sim.world.get_mut::<EnemyRangedAttack>(e) {
            *slot = attack;
        }
        if !fire || distance < 0.001 {
            continue;
        }

        let dir = to_target / distance;
        let muzzle = at + Vec3::Y * MUZZLE_HEIGHT;
        match attack.kind {
            EnemyProjectileKind::Straight => {
                prefabs::spawn_enemy_bolt(sim, muzzle, dir, attack.damage, attack.projectile_speed);
            }
            EnemyProjectileKind::Homing => {
                prefabs::spawn_enemy_homing(sim, muzzle, dir, attack.damage, attack.projectile_speed);
            }
            EnemyProjectileKind::AreaCloud => {
                prefabs::spawn_poison_cloud(sim, target + Vec3::Y * CLOUD_HEIGHT, attack.damage);
            }
        }
    }
}
