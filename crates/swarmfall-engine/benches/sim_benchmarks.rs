//! Simulation throughput benchmarks.
//!
//! - ECS tuple queries over a populated arena.
//! - One full fixed step of the standard pipeline with a live horde.
//!
//! Run with: `cargo bench --bench sim_benchmarks`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use swarmfall_engine::components::{EnemyType, Health, IsEnemy, Transform, Velocity};
use swarmfall_engine::data::EnemyKind;
use swarmfall_engine::prefabs;
use swarmfall_engine::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A standard loop with `count` goblins on a ring around the player.
fn horde(count: usize) -> TickLoop {
    let mut config = SimConfig::default();
    config.balance.spawner.max_enemies = count;
    let mut tick_loop = TickLoop::standard(config).expect("default config is valid");
    let sim = tick_loop.sim_mut();
    for i in 0..count {
        let angle = i as f32 / count as f32 * std::f32::consts::TAU;
        prefabs::spawn_enemy(sim, EnemyKind::Goblin, angle.cos() * 25.0, angle.sin() * 25.0);
    }
    tick_loop
}

// ---------------------------------------------------------------------------
// Benchmark 1: ECS queries
// ---------------------------------------------------------------------------

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("enemy_query");
    for count in [50usize, 200] {
        let tick_loop = horde(count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &tick_loop, |b, tl| {
            b.iter(|| {
                let world = &tl.sim().world;
                black_box(world.query::<(IsEnemy, EnemyType, Health, Transform, Velocity)>().len())
            });
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 2: full fixed step
// ---------------------------------------------------------------------------

fn bench_step(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_step");
    for count in [50usize, 200] {
        group.bench_function(BenchmarkId::from_parameter(count), |b| {
            b.iter_batched(
                || horde(count),
                |mut tick_loop| {
                    tick_loop.step();
                    black_box(tick_loop.tick_count())
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Benchmark 3: state hashing
// ---------------------------------------------------------------------------

fn bench_state_hash(c: &mut Criterion) {
    let tick_loop = horde(200);
    c.bench_function("state_hash_200", |b| {
        b.iter(|| black_box(tick_loop.state_hash().expect("state serializes")));
    });
}

criterion_group!(benches, bench_queries, bench_step, bench_state_hash);
criterion_main!(benches);
