//! `AIFollow` steering: direct chase, orbit, keep-distance.

use glam::Vec2;

use crate::components::{AIFollow, EnemyAttack, MeleeState, Transform, Velocity};
use crate::data::PursuitBehavior;
use crate::math::{from_heading, heading_of, wrap_angle, yaw_of, DIR_EPSILON_SQ};
use crate::sim::Sim;

/// Orbiters farther than this multiple of their radius chase directly.
pub const ORBIT_BAND: f32 = 1.5;
/// Orbit correction speed cap, as a multiple of the follow speed.
pub const ORBIT_SPEED_CAP: f32 = 1.5;
/// A stored orbit angle further than this from the follower's real bearing
/// (after a lunge or a shove) is re-seeded from that bearing.
pub const ORBIT_RESYNC: f32 = std::f32::consts::FRAC_PI_4;
/// Half-width of the keep-distance hold band.
pub const KEEP_DISTANCE_EPSILON: f32 = 1.0;

/// Desired planar velocity and updated orbit angle for one follower.
///
/// Orbiters circle on `follow.orbit_angle`, advanced by `speed / radius`
/// radians per second. While chasing, the angle tracks the bearing from the
/// target so the orbit starts where the follower enters the band.
pub fn pursuit_velocity(follow: &AIFollow, pos: Vec2, target: Vec2, dt: f32) -> (Vec2, f32) {
    let to_target = target - pos;
    let dist_sq = to_target.length_squared();
    if dist_sq < DIR_EPSILON_SQ {
        return (Vec2::ZERO, follow.orbit_angle);
    }
    let dist = dist_sq.sqrt();
    let chase = to_target / dist * follow.speed;
    let pref = follow.preferred_distance;

    match follow.behavior {
        PursuitBehavior::Direct => (chase, follow.orbit_angle),
        PursuitBehavior::Orbit => {
            let bearing = heading_of(pos - target);
            if pref <= 0.0 || dist > pref * ORBIT_BAND || dt <= 0.0 {
                return (chase, bearing);
            }
            let base = if wrap_angle(follow.orbit_angle - bearing).abs() > ORBIT_RESYNC {
                bearing
            } else {
                follow.orbit_angle
            };
            let angle = wrap_angle(base + follow.speed / pref * dt);
            let desired = target + from_heading(angle) * pref;
            let velocity = ((desired - pos) / dt).clamp_length_max(follow.speed * ORBIT_SPEED_CAP);
            (velocity, angle)
        }
        PursuitBehavior::KeepDistance => {
            let velocity = if dist > pref + KEEP_DISTANCE_EPSILON {
                chase
            } else if dist < pref - KEEP_DISTANCE_EPSILON {
                -chase
            } else {
                Vec2::ZERO
            };
            (velocity, follow.orbit_angle)
        }
    }
}

/// Steer every follower that is not mid-attack toward its target, snap it to
/// the terrain and face it along its travel.
pub fn ai_pursuit(sim: &mut Sim) {
    let dt = sim.dt();
    for e in sim.world.query::<(AIFollow, Transform, Velocity)>() {
        if sim.is_doomed(e) {
            continue;
        }
        if sim.world.get::<EnemyAttack>(e).is_some_and(|a| a.state != MeleeState::Idle) {
            continue;
        }
        let (Some(&follow), Some(&tf)) = (sim.world.get::<AIFollow>(e), sim.world.get::<Transform>(e)) else {
            continue;
        };
        // Weak reference: the target may have died earlier this step.
        if !sim.world.is_alive(follow.target) {
            continue;
        }
        let Some(target) = sim.world.get::<Transform>(follow.target).map(Transform::planar) else {
            continue;
        };

        let (velocity, orbit_angle) = pursuit_velocity(&follow, tf.planar(), target, dt);
        let rest = sim.rest_height(e, tf.x, tf.z);

        if let Some(vel) = sim.world.get_mut::<Velocity>(e) {
            vel.set_planar(velocity);
        }
        if let Some(tf) = sim.world.get_mut::<Transform>(e) {
            tf.y = rest;
            if velocity.length_squared() > DIR_EPSILON_SQ {
                tf.rot_y = yaw_of(velocity);
            }
        }
        if let Some(f) = sim.world.get_mut::<AIFollow>(e) {
            f.orbit_angle = orbit_angle;
        }
    }
}
