//! Weapon fire, damage resolution and health.

pub mod damage;
pub mod health;
pub mod weapons;

use glam::Vec2;
use swarmfall_ecs::prelude::*;

use crate::components::{IsEnemy, Transform};
use crate::sim::Sim;

/// Closest live enemy to `from` strictly inside `max_range`, skipping
/// `exclude` and anything already flagged for destruction this step.
///
/// Ties keep the entity that comes first in query order.
pub fn nearest_enemy(sim: &Sim, from: Vec2, max_range: f32, exclude: Option<EntityId>) -> Option<(EntityId, Vec2)> {
    let mut best: Option<(EntityId, Vec2)> = None;
    let mut best_dist_sq = max_range * max_range;
    for e in sim.world.query::<(IsEnemy, Transform)>() {
        if Some(e) == exclude || sim.is_doomed(e) {
            continue;
        }
        let Some(pos) = sim.world.get::<Transform>(e).map(Transform::planar) else {
            continue;
        };
        let dist_sq = from.distance_squared(pos);
        if dist_sq < best_dist_sq {
            best_dist_sq = dist_sq;
            best = Some((e, pos));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use crate::data::EnemyKind;
    use crate::prefabs;

    #[test]
    fn nearest_skips_doomed_and_excluded() {
        let mut sim = Sim::new(SimConfig::default()).unwrap();
        let near = prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 2.0, 0.0);
        let mid = prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 4.0, 0.0);
        let far = prefabs::spawn_enemy(&mut sim, EnemyKind::Goblin, 6.0, 0.0);

        assert_eq!(nearest_enemy(&sim, Vec2::ZERO, 10.0, None).map(|t| t.0), Some(near));
        sim.flag_destroy(near);
        assert_eq!(nearest_enemy(&sim, Vec2::ZERO, 10.0, None).map(|t| t.0), Some(mid));
        assert_eq!(nearest_enemy(&sim, Vec2::ZERO, 10.0, Some(mid)).map(|t| t.0), Some(far));
        assert_eq!(nearest_enemy(&sim, Vec2::ZERO, 3.0, Some(mid)), None);
    }
}
