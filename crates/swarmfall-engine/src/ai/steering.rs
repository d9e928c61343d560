//! Steering for boomerang arcs and turn-rate-limited homing projectiles.

use std::f32::consts::PI;

use glam::Vec2;

use crate::combat::nearest_enemy;
use crate::components::{Boomerang, Homing, IsEnemyProjectile, IsProjectile, Transform, Velocity};
use crate::math::{from_heading, heading_of, wrap_angle, yaw_of, DIR_EPSILON_SQ};
use crate::sim::Sim;

/// Flight fraction after which a boomerang starts curving home.
pub const RETURN_START: f32 = 0.45;
/// Strongest pull toward the owner, reached at the end of the flight.
pub const RETURN_WEIGHT: f32 = 0.7;
/// Lateral amplitude of the outgoing arc.
pub const ARC_WIDTH: f32 = 0.8;

/// Unnormalized travel direction of a boomerang at flight fraction `t`.
/// `to_owner` is the planar offset from the boomerang back to its owner.
pub fn boomerang_direction(forward: Vec2, t: f32, to_owner: Vec2) -> Vec2 {
    let lateral = Vec2::new(-forward.y, forward.x);
    let mut dir = forward * (t * PI).cos() + lateral * (t * PI).sin() * ARC_WIDTH;
    if t > RETURN_START {
        let dist = to_owner.length();
        if dist > 0.5 {
            let w = ((t - RETURN_START) / (1.0 - RETURN_START)).min(1.0) * RETURN_WEIGHT;
            dir = dir * (1.0 - w) + to_owner / dist * w;
        }
    }
    dir
}

pub fn boomerang_steering(sim: &mut Sim) {
    let dt = sim.dt();
    let fallback_owner = sim.player().and_then(|p| sim.world.get::<Transform>(p)).map(Transform::planar);

    for e in sim.world.query::<(IsProjectile, Boomerang, Transform, Velocity)>() {
        let (Some(&b), Some(pos)) = (sim.world.get::<Boomerang>(e), sim.world.get::<Transform>(e).map(Transform::planar))
        else {
            continue;
        };
        let owner = sim.world.get::<Transform>(b.owner).map(Transform::planar).or(fallback_owner);
        let Some(owner) = owner else {
            continue;
        };

        let elapsed = b.elapsed + dt;
        let t = if b.total_life > 0.0 { (elapsed / b.total_life).min(1.0) } else { 1.0 };
        let dir = boomerang_direction(Vec2::new(b.forward_x, b.forward_z), t, owner - pos);

        if let Some(slot) = sim.world.get_mut::<Boomerang>(e) {
            slot.elapsed = elapsed;
        }
        if dir.length() > 0.001 {
            let velocity = dir.normalize() * b.speed;
            if let Some(vel) = sim.world.get_mut::<Velocity>(e) {
                vel.set_planar(velocity);
            }
            if let Some(tf) = sim.world.get_mut::<Transform>(e) {
                tf.rot_y = yaw_of(velocity);
            }
        }
    }
}

/// Turn `velocity` toward `to_target` by at most `max_turn` radians,
/// keeping its speed.
pub fn steer_toward(velocity: Vec2, to_target: Vec2, max_turn: f32) -> Vec2 {
    let speed = velocity.length();
    if speed < 0.001 || to_target.length_squared() < DIR_EPSILON_SQ {
        return velocity;
    }
    let current = heading_of(velocity);
    let delta = wrap_angle(heading_of(to_target) - current).clamp(-max_turn, max_turn);
    from_heading(current + delta) * speed
}

/// Enemy bolts home on the player; player missiles keep their target while
/// it lives and re-acquire the nearest enemy otherwise.
pub fn homing_steering(sim: &mut Sim) {
    let dt = sim.dt();
    let player_pos = sim.player().and_then(|p| sim.world.get::<Transform>(p)).map(Transform::planar);

    for e in sim.world.query::<(Homing, Transform, Velocity)>() {
        if sim.is_doomed(e) {
            continue;
        }
        let (Some(&homing), Some(pos), Some(vel)) = (
            sim.world.get::<Homing>(e),
            sim.world.get::<Transform>(e).map(Transform::planar),
            sim.world.get::<Velocity>(e).map(Velocity::planar),
        ) else {
            continue;
        };

        let target = if sim.world.has::<IsEnemyProjectile>(e) {
            player_pos
        } else {
            let locked = homing
                .target
                .filter(|&t| !sim.is_doomed(t))
                .and_then(|t| sim.world.get::<Transform>(t))
                .map(Transform::planar);
            match locked {
                Some(p) => Some(p),
                None => {
                    let found = nearest_enemy(sim, pos, f32::INFINITY, None);
                    if let Some(h) = sim.world.get_mut::<Homing>(e) {
                        h.target = found.map(|(id, _)| id);
                    }
                    found.map(|(_, p)| p)
                }
            }
        };
        let Some(target) = target else {
            continue;
        };

        let steered = steer_toward(vel, target - pos, homing.turn_rate * dt);
        if let Some(v) = sim.world.get_mut::<Velocity>(e) {
            v.set_planar(steered);
        }
        if let Some(tf) = sim.world.get_mut::<Transform>(e) {
            tf.rot_y = yaw_of(steered);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_is_capped() {
        let v = Vec2::new(10.0, 0.0);
        let steered = steer_toward(v, Vec2::new(-1.0, 0.1), 0.1);
        assert!((heading_of(steered) - 0.1).abs() < 1e-5);
        assert!((steered.length() - 10.0).abs() < 1e-4);
    }

    #[test]
    fn small_corrections_land_exactly() {
        let v = Vec2::new(1.0, 0.0);
        let steered = steer_toward(v, Vec2::new(1.0, 0.05), 0.5);
        assert!((heading_of(steered) - 0.05f32.atan()).abs() < 1e-5);
    }

    #[test]
    fn stationary_projectiles_are_left_alone() {
        assert_eq!(steer_toward(Vec2::ZERO, Vec2::X, 1.0), Vec2::ZERO);
    }

    #[test]
    fn boomerang_goes_out_then_returns() {
        let fwd = Vec2::Y;
        let start = boomerang_direction(fwd, 0.0, -fwd * 5.0);
        assert!((start - fwd).length() < 1e-6);

        let end = boomerang_direction(fwd, 1.0, -fwd * 5.0);
        assert!(end.dot(fwd) < 0.0);
    }

    #[test]
    fn boomerang_ignores_owner_when_close() {
        let fwd = Vec2::Y;
        let near = boomerang_direction(fwd, 0.8, Vec2::new(0.2, 0.0));
        let alone = boomerang_direction(fwd, 0.8, Vec2::ZERO);
        assert_eq!(near, alone);
    }
}
