//! Spawning directors: the time-scaled wave spawner, the scripted
//! mini-boss/portal/boss timeline and the post-boss final swarm.
//!
//! All three keep their progress in [`crate::state::WorldState`], so a
//! restart resets them along with the rest of the run.

pub mod swarm;
pub mod timeline;
pub mod waves;

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use crate::sim::Sim;

/// A uniformly random point on the circle of `radius` around the player.
/// `None` without a live player.
pub(crate) fn point_around_player(sim: &mut Sim, radius: f32) -> Option<Vec2> {
    let center = sim.position(sim.player()?)?;
    let angle = sim.rng.gen_range(0.0..TAU);
    Some(Vec2::new(center.x, center.z) + Vec2::from_angle(angle) * radius)
}
