//! Velocity integration and solid-body separation.

use glam::Vec2;

use crate::components::{AttachedTo, Collider, DestroyFlag, Interactable, IsEnemy, Transform, Velocity};
use crate::math::DIR_EPSILON_SQ;
use crate::sim::Sim;

/// Share of an enemy/player overlap resolved by moving the player.
const PLAYER_PUSH_SHARE: f32 = 0.3;

/// `position += velocity × dt` for every moving entity, then snap attached
/// entities (auras) onto their owners.
pub fn integrate_velocity(sim: &mut Sim) {
    let dt = sim.dt();
    for e in sim.world.query::<(Transform, Velocity)>() {
        let Some(&vel) = sim.world.get::<Velocity>(e) else { continue };
        if let Some(tf) = sim.world.get_mut::<Transform>(e) {
            tf.x += vel.x * dt;
            tf.y += vel.y * dt;
            tf.z += vel.z * dt;
        }
    }

    for e in sim.world.query::<(AttachedTo, Transform)>() {
        let Some(&AttachedTo { owner }) = sim.world.get::<AttachedTo>(e) else { continue };
        let Some(&owner_tf) = sim.world.get::<Transform>(owner) else {
            // Owner already despawned; cleanup removes the zone this step.
            sim.flag_destroy(e);
            continue;
        };
        if let Some(tf) = sim.world.get_mut::<Transform>(e) {
            tf.x = owner_tf.x;
            tf.z = owner_tf.z;
        }
    }
}

/// Push overlapping bodies apart on the XZ plane.
///
/// Player vs enemy overlaps are split 30/70 between the two. Interactables
/// are immovable, so the player absorbs the whole correction.
pub fn separate_bodies(sim: &mut Sim) {
    let Some(player) = sim.player() else { return };
    let (Some(&ptf), Some(&pcol)) = (sim.world.get::<Transform>(player), sim.world.get::<Collider>(player)) else {
        return;
    };
    let origin = ptf.planar();
    let mut push = Vec2::ZERO;

    for e in sim.world.query::<(IsEnemy, Collider, Transform)>() {
        if sim.world.has::<DestroyFlag>(e) {
            continue;
        }
        let Some(&col) = sim.world.get::<Collider>(e) else { continue };
        let Some(tf) = sim.world.get_mut::<Transform>(e) else { continue };
        let Some(correction) = overlap(origin, tf.planar(), pcol.radius + col.radius) else { continue };
        push += correction * PLAYER_PUSH_SHARE;
        tf.set_planar(tf.planar() - correction * (1.0 - PLAYER_PUSH_SHARE));
    }

    for e in sim.world.query::<(Interactable, Collider, Transform)>() {
        let (Some(col), Some(tf)) = (sim.world.get::<Collider>(e), sim.world.get::<Transform>(e)) else {
            continue;
        };
        if let Some(correction) = overlap(origin + push, tf.planar(), pcol.radius + col.radius) {
            push += correction;
        }
    }

    if push != Vec2::ZERO {
        if let Some(tf) = sim.world.get_mut::<Transform>(player) {
            tf.set_planar(tf.planar() + push);
        }
    }
}

/// Correction that moves `a` out of `b` when closer than `min_dist`.
/// Coincident centers are skipped: there is no direction to push along.
fn overlap(a: Vec2, b: Vec2, min_dist: f32) -> Option<Vec2> {
    let delta = a - b;
    let dist_sq = delta.length_squared();
    if dist_sq >= min_dist * min_dist || dist_sq < DIR_EPSILON_SQ {
        return None;
    }
    let dist = dist_sq.sqrt();
    Some(delta / dist * (min_dist - dist))
}
