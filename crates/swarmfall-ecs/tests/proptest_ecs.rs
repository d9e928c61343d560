//! Property tests for the entity/component store.
//!
//! Random sequences of spawn/attach/detach/destroy operations are checked
//! against a simple model (a list of live ids and which of them carry a
//! velocity) after every step.

use std::collections::BTreeSet;

use proptest::prelude::*;
use swarmfall_ecs::prelude::*;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Transform {
    x: f32,
    z: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct Velocity {
    x: f32,
    z: f32,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
struct DestroyFlag;

/// Operations applied to the world.
#[derive(Debug, Clone)]
enum EcsOp {
    Spawn(f32, f32),
    SpawnMoving(f32, f32, f32, f32),
    Destroy(usize),
    AttachVelocity(usize, f32, f32),
    DetachVelocity(usize),
    Flag(usize),
}

/// Finite f32 values only, so equality comparisons are meaningful.
fn finite_f32() -> impl Strategy<Value = f32> {
    (-100_000i32..100_000i32).prop_map(|v| v as f32 * 0.01)
}

fn ecs_op_strategy() -> impl Strategy<Value = EcsOp> {
    prop_oneof![
        (finite_f32(), finite_f32()).prop_map(|(x, z)| EcsOp::Spawn(x, z)),
        (finite_f32(), finite_f32(), finite_f32(), finite_f32())
            .prop_map(|(x, z, vx, vz)| EcsOp::SpawnMoving(x, z, vx, vz)),
        (0..100usize).prop_map(EcsOp::Destroy),
        (0..100usize, finite_f32(), finite_f32()).prop_map(|(i, vx, vz)| EcsOp::AttachVelocity(i, vx, vz)),
        (0..100usize).prop_map(EcsOp::DetachVelocity),
        (0..100usize).prop_map(EcsOp::Flag),
    ]
}

fn setup_world() -> World {
    let mut world = World::new();
    world.register_component::<Transform>("transform");
    world.register_component::<Velocity>("velocity");
    world.register_component::<DestroyFlag>("destroy_flag");
    world
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    #[test]
    fn random_ops_match_model(ops in prop::collection::vec(ecs_op_strategy(), 1..60)) {
        let mut world = setup_world();
        let mut alive: Vec<EntityId> = Vec::new();
        let mut moving: BTreeSet<u64> = BTreeSet::new();
        let mut dead: Vec<EntityId> = Vec::new();

        for op in ops {
            match op {
                EcsOp::Spawn(x, z) => {
                    alive.push(world.build().with(Transform { x, z }).id());
                }
                EcsOp::SpawnMoving(x, z, vx, vz) => {
                    let e = world.build().with(Transform { x, z }).with(Velocity { x: vx, z: vz }).id();
                    moving.insert(e.to_raw());
                    alive.push(e);
                }
                EcsOp::Destroy(idx) => {
                    if !alive.is_empty() {
                        let e = alive.remove(idx % alive.len());
                        prop_assert!(world.despawn(e).is_ok());
                        moving.remove(&e.to_raw());
                        dead.push(e);
                    }
                }
                EcsOp::AttachVelocity(idx, vx, vz) => {
                    if !alive.is_empty() {
                        let e = alive[idx % alive.len()];
                        let vel = Velocity { x: vx, z: vz };
                        prop_assert!(world.insert(e, vel).is_ok());
                        moving.insert(e.to_raw());
                    }
                }
                EcsOp::DetachVelocity(idx) => {
                    if !alive.is_empty() {
                        let e = alive[idx % alive.len()];
                        world.remove::<Velocity>(e);
                        moving.remove(&e.to_raw());
                    }
                }
                EcsOp::Flag(idx) => {
                    if !alive.is_empty() {
                        let e = alive[idx % alive.len()];
                        prop_assert!(world.insert(e, DestroyFlag).is_ok());
                    }
                }
            }

            prop_assert_eq!(world.entity_count(), alive.len());

            // Queries never return stale ids and are slot ordered.
            let with_velocity = world.query::<(Transform, Velocity)>();
            prop_assert_eq!(with_velocity.len(), moving.len());
            for pair in with_velocity.windows(2) {
                prop_assert!(pair[0].index() < pair[1].index());
            }
            for e in &with_velocity {
                prop_assert!(world.is_alive(*e));
            }

            for e in &dead {
                prop_assert!(!world.is_alive(*e));
                prop_assert!(!world.has::<Transform>(*e));
            }
        }
    }

    /// Handles kept past destruction stay dead even after their slot is reused.
    #[test]
    fn stale_ids_stay_dead_after_reuse(
        spawn_count in 1..20usize,
        destroy_picks in prop::collection::vec(0..20usize, 1..10),
    ) {
        let mut world = setup_world();
        let mut entities: Vec<EntityId> = (0..spawn_count)
            .map(|i| world.build().with(Transform { x: i as f32, z: 0.0 }).id())
            .collect();

        let mut stale = Vec::new();
        for pick in destroy_picks {
            if !entities.is_empty() {
                let e = entities.remove(pick % entities.len());
                world.despawn(e).unwrap();
                stale.push(e);
            }
        }
        for _ in 0..stale.len() {
            entities.push(world.build().with(Transform { x: -1.0, z: -1.0 }).id());
        }

        for e in &stale {
            prop_assert!(!world.is_alive(*e));
            prop_assert_eq!(world.get::<Transform>(*e), None);
        }
        for e in &entities {
            prop_assert!(world.get::<Transform>(*e).is_some());
        }
    }

    /// Detaching one component never disturbs another entity's data.
    #[test]
    fn swap_remove_preserves_neighbours(count in 2..40usize, victim in 0..40usize) {
        let mut world = setup_world();
        let entities: Vec<EntityId> = (0..count)
            .map(|i| world.build().with(Velocity { x: i as f32, z: (i * 2) as f32 }).id())
            .collect();
        let victim = entities[victim % count];
        world.remove::<Velocity>(victim);

        for (i, e) in entities.iter().enumerate() {
            if *e == victim {
                prop_assert!(!world.has::<Velocity>(*e));
            } else {
                prop_assert_eq!(world.get::<Velocity>(*e), Some(&Velocity { x: i as f32, z: (i * 2) as f32 }));
            }
        }
    }
}
