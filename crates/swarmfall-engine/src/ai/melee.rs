//! Melee attack state machine: idle → windup → lunge → cooldown → idle.
//!
//! The attack direction is locked when the target enters trigger range and
//! is not re-aimed afterwards. Contact damage from an enemy carrying
//! `EnemyAttack` is only live while it is in [`MeleeState::Lunge`].

use glam::Vec2;

use crate::components::{AIFollow, EnemyAttack, EnemyType, MeleeState, Transform, Velocity};
use crate::math::{lerp, yaw_of, DIR_EPSILON_SQ};
use crate::sim::Sim;

/// Advance one enemy's state machine by `dt`. `to_target` is the planar
/// offset from the enemy to its target. Returns `true` if the state changed.
pub fn step_melee(attack: &mut EnemyAttack, to_target: Vec2, dt: f32) -> bool {
    let profile = attack.profile;
    let before = attack.state;
    match attack.state {
        MeleeState::Idle => {
            let dist_sq = to_target.length_squared();
            if dist_sq < profile.trigger_range * profile.trigger_range && dist_sq > DIR_EPSILON_SQ {
                let dir = to_target / dist_sq.sqrt();
                attack.dir_x = dir.x;
                attack.dir_z = dir.y;
                attack.state = MeleeState::Windup;
                attack.timer = profile.windup;
            }
        }
        MeleeState::Windup => {
            attack.timer -= dt;
            if attack.timer <= 0.0 {
                attack.state = MeleeState::Lunge;
                attack.timer = profile.lunge;
            }
        }
        MeleeState::Lunge => {
            attack.timer -= dt;
            if attack.timer <= 0.0 {
                attack.state = MeleeState::Cooldown;
                attack.timer = profile.cooldown;
            }
        }
        MeleeState::Cooldown => {
            attack.timer -= dt;
            if attack.timer <= 0.0 {
                attack.state = MeleeState::Idle;
                attack.timer = 0.0;
            }
        }
    }
    attack.state != before
}

/// Squash/stretch factor applied on top of the enemy's base scale.
pub fn melee_scale(attack: &EnemyAttack) -> [f32; 3] {
    match attack.state {
        MeleeState::Idle => [1.0, 1.0, 1.0],
        MeleeState::Windup => [1.3, 0.6, 1.3],
        MeleeState::Lunge => [0.8, 1.3, 0.8],
        MeleeState::Cooldown => {
            let cooldown = attack.profile.cooldown;
            let t = if cooldown > 0.0 { (1.0 - attack.timer / cooldown).clamp(0.0, 1.0) } else { 1.0 };
            [lerp(1.1, 1.0, t), lerp(0.85, 1.0, t), lerp(1.1, 1.0, t)]
        }
    }
}

pub fn melee_attack(sim: &mut Sim) {
    let dt = sim.dt();
    let Some(player) = sim.player() else {
        return;
    };
    let Some(target) = sim.world.get::<Transform>(player).map(Transform::planar) else {
        return;
    };

    for e in sim.world.query::<(EnemyAttack, Transform, Velocity)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let (Some(&before), Some(&tf)) = (sim.world.get::<EnemyAttack>(e), sim.world.get::<Transform>(e)) else {
            continue;
        };
        let mut attack = before;
        step_melee(&mut attack, target - tf.planar(), dt);

        let follow_speed = sim.world.get::<AIFollow>(e).map_or(0.0, |f| f.speed);
        let base_scale = sim.world.get::<EnemyType>(e).map_or([1.0; 3], |t| t.kind.def().scale);
        let dir = Vec2::new(attack.dir_x, attack.dir_z);

        // Idle enemies that did not trigger keep whatever pursuit set.
        let idle_throughout = before.state == MeleeState::Idle && attack.state == MeleeState::Idle;
        // The step that enters the lunge stands still; movement starts on
        // the next one and stops on the step that leaves it.
        let lunging = before.state == MeleeState::Lunge && attack.state == MeleeState::Lunge;
        if !idle_throughout {
            let velocity = if lunging {
                dir * follow_speed * attack.profile.lunge_speed_mult
            } else {
                Vec2::ZERO
            };
            if let Some(vel) = sim.world.get_mut::<Velocity>(e) {
                vel.set_planar(velocity);
            }
        }

        let factor = melee_scale(&attack);
        if let Some(tf) = sim.world.get_mut::<Transform>(e) {
            tf.scale = [base_scale[0] * factor[0], base_scale[1] * factor[1], base_scale[2] * factor[2]];
            if lunging {
                tf.rot_y = yaw_of(dir);
            }
        }
        if let Some(slot) = sim.world.get_mut::<EnemyAttack>(e) {
            *slot = attack;
        }
    }
}
