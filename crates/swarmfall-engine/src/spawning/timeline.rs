//! Scripted run timeline: two mini-bosses, then a portal that releases the
//! boss when the player steps into it. The boss's death starts the final
//! swarm.

use crate::components::Transform;
use crate::data::EnemyKind;
use crate::events::GameEvent;
use crate::prefabs;
use crate::sim::Sim;

use super::{point_around_player, swarm};

pub fn boss_timeline(sim: &mut Sim) {
    let tb = sim.config.balance.timeline.clone();
    let radius = sim.config.balance.spawner.spawn_radius;
    let elapsed = sim.state.time.elapsed;

    if !sim.state.timeline.mini_boss_1_spawned && elapsed >= tb.mini_boss_1_at {
        sim.state.timeline.mini_boss_1_spawned = true;
        spawn_near_player(sim, EnemyKind::StoneGolem, radius);
    }
    if !sim.state.timeline.mini_boss_2_spawned && elapsed >= tb.mini_boss_2_at {
        sim.state.timeline.mini_boss_2_spawned = true;
        spawn_near_player(sim, EnemyKind::Chunkham, radius);
    }
    if !sim.state.timeline.portal_spawned && elapsed >= tb.portal_at {
        sim.state.timeline.portal_spawned = true;
        if let Some(at) = point_around_player(sim, radius) {
            let portal = prefabs::spawn_portal(sim, at.x, at.y);
            sim.state.timeline.portal = Some(portal);
            tracing::info!(x = at.x, z = at.y, "boss portal opened");
        }
    }

    if sim.state.timeline.portal_spawned && !sim.state.timeline.boss_spawned {
        enter_portal(sim, tb.portal_radius);
    }

    if let Some(boss) = sim.state.timeline.boss {
        if !sim.state.timeline.boss_defeated && boss_died_this_step(sim, boss) {
            sim.state.timeline.boss_defeated = true;
            sim.state.timeline.boss = None;
            tracing::info!(%boss, "boss defeated");
            sim.emit(GameEvent::BossDefeated { entity: boss });
            swarm::start_final_swarm(sim);
        }
    }
}

fn spawn_near_player(sim: &mut Sim, kind: EnemyKind, radius: f32) {
    if let Some(at) = point_around_player(sim, radius) {
        prefabs::spawn_enemy(sim, kind, at.x, at.y);
    }
}

fn enter_portal(sim: &mut Sim, portal_radius: f32) {
    let Some(portal) = sim.state.timeline.portal.filter(|&p| !sim.is_doomed(p)) else {
        return;
    };
    let (Some(player), Some(portal_tf)) = (sim.player(), sim.world.get::<Transform>(portal).copied()) else {
        return;
    };
    let Some(player_pos) = sim.world.get::<Transform>(player).map(Transform::planar) else {
        return;
    };
    let at = portal_tf.planar();
    if at.distance_squared(player_pos) >= portal_radius * portal_radius {
        return;
    }
    sim.state.timeline.boss_spawned = true;
    sim.state.timeline.portal = None;
    sim.flag_destroy(portal);
    let boss = prefabs::spawn_enemy(sim, EnemyKind::LilBark, at.x, at.y);
    sim.state.timeline.boss = Some(boss);
}

fn boss_died_this_step(sim: &Sim, boss: swarmfall_ecs::entity::EntityId) -> bool {
    sim.events.frame_events().iter().any(|e| {
        matches!(e, GameEvent::EntityDied { entity, was_enemy: true, .. } if *entity == boss)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{IsBoss, IsMiniBoss, IsPortal};
    use crate::config::SimConfig;
    use crate::events::EventKind;
    use glam::Vec3;

    fn sim_at(elapsed: f32) -> Sim {
        let mut sim = Sim::new(SimConfig::default()).unwrap();
        sim.state.time.elapsed = elapsed;
        sim.events.begin_frame();
        sim
    }

    #[test]
    fn mini_bosses_arrive_once_each() {
        let mut sim = sim_at(119.0);
        boss_timeline(&mut sim);
        assert_eq!(sim.world.count::<IsMiniBoss>(), 0);
        sim.state.time.elapsed = 185.0;
        boss_timeline(&mut sim);
        boss_timeline(&mut sim);
        assert_eq!(sim.world.count::<IsMiniBoss>(), 2);
    }

    #[test]
    fn portal_releases_boss_on_proximity() {
        let mut sim = sim_at(300.0);
        boss_timeline(&mut sim);
        let portal = sim.state.timeline.portal.unwrap();
        assert!(sim.world.has::<IsPortal>(portal));
        assert_eq!(sim.world.count::<IsBoss>(), 0);

        let at = sim.world.get::<Transform>(portal).unwrap().planar();
        let player = sim.player().unwrap();
        sim.world.get_mut::<Transform>(player).unwrap().set_planar(at);
        boss_timeline(&mut sim);
        assert!(sim.state.timeline.boss_spawned);
        assert!(sim.is_doomed(portal));
        assert_eq!(sim.world.count::<IsBoss>(), 1);
    }

    #[test]
    fn boss_death_starts_the_swarm() {
        let mut sim = sim_at(0.0);
        let boss = prefabs::spawn_enemy(&mut sim, EnemyKind::LilBark, 5.0, 5.0);
        sim.state.timeline.portal_spawned = true;
        sim.state.timeline.boss_spawned = true;
        sim.state.timeline.boss = Some(boss);

        boss_timeline(&mut sim);
        assert!(!sim.state.swarm.active);

        sim.emit(GameEvent::EntityDied { entity: boss, position: Vec3::ZERO, was_enemy: true });
        boss_timeline(&mut sim);
        assert!(sim.state.timeline.boss_defeated);
        assert!(sim.state.swarm.active);
        let kinds: Vec<EventKind> = sim.events.frame_events().iter().map(GameEvent::kind).collect();
        assert!(kinds.contains(&EventKind::BossDefeated));
        assert!(kinds.contains(&EventKind::SwarmStarted));

        // A second pass over the same frame log changes nothing.
        boss_timeline(&mut sim);
        let defeated = sim.events.frame_events().iter().filter(|e| e.kind() == EventKind::BossDefeated).count();
        assert_eq!(defeated, 1);
    }
}
