//! Criterion benchmarks for the store's hot paths: the per-step queries
//! systems issue, and the churn of short-lived projectile entities.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swarmfall_ecs::prelude::*;

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Transform {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Velocity {
    x: f32,
    y: f32,
    z: f32,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct IsEnemy;

fn populated_world(enemies: usize, props: usize) -> World {
    let mut world = World::new();
    world.register_component::<Transform>("transform");
    world.register_component::<Velocity>("velocity");
    world.register_component::<IsEnemy>("is_enemy");
    for i in 0..enemies {
        world
            .build()
            .with(Transform { x: i as f32, y: 0.0, z: 0.0 })
            .with(Velocity { x: 1.0, y: 0.0, z: 0.0 })
            .with(IsEnemy)
            .id();
    }
    for i in 0..props {
        world.build().with(Transform { x: 0.0, y: 0.0, z: i as f32 }).id();
    }
    world
}

fn bench_query_and_integrate(c: &mut Criterion) {
    let mut world = populated_world(200, 800);
    c.bench_function("query_integrate_200_enemies", |b| {
        b.iter(|| {
            for e in world.query::<(Transform, Velocity, IsEnemy)>() {
                let Some(v) = world.get::<Velocity>(e).cloned() else { continue };
                if let Some(t) = world.get_mut::<Transform>(e) {
                    t.x += v.x / 60.0;
                    t.z += v.z / 60.0;
                }
            }
            black_box(world.entity_count())
        })
    });
}

fn bench_projectile_churn(c: &mut Criterion) {
    let mut world = populated_world(200, 0);
    c.bench_function("spawn_despawn_100_projectiles", |b| {
        b.iter(|| {
            let ids: Vec<EntityId> = (0..100)
                .map(|i| {
                    world
                        .build()
                        .with(Transform { x: i as f32, y: 1.0, z: 0.0 })
                        .with(Velocity { x: 0.0, y: 0.0, z: 12.0 })
                        .id()
                })
                .collect();
            for id in ids {
                let _ = world.despawn(id);
            }
        })
    });
}

criterion_group!(benches, bench_query_and_integrate, bench_projectile_churn);
criterion_main!(benches);
