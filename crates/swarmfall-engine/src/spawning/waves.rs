//! The regular wave spawner.
//!
//! The interval shrinks with elapsed time toward a floor, batches grow
//! stepwise, and the eligible pool widens once the early phase is over.

use crate::components::IsEnemy;
use crate::config::SpawnerBalance;
use crate::data::enemies::EARLY_POOL;
use crate::data::EnemyKind;
use crate::prefabs;
use crate::sim::Sim;

use rand::Rng;

use super::point_around_player;

/// Seconds between spawn batches at `elapsed`.
pub fn spawn_interval(elapsed: f32, spawn_rate_mult: f32, balance: &SpawnerBalance) -> f32 {
    let decay = 1.0 - (elapsed / balance.ramp_time).min(balance.max_ramp);
    (balance.base_interval / spawn_rate_mult * decay).max(balance.min_interval)
}

/// Enemies per batch at `elapsed`.
pub fn batch_size(elapsed: f32, balance: &SpawnerBalance) -> usize {
    ((1.0 + elapsed / balance.batch_growth).floor() as usize).min(balance.max_batch)
}

/// Enemy types eligible at `elapsed`, with their weights.
pub fn eligible_pool(elapsed: f32, balance: &SpawnerBalance) -> Vec<(EnemyKind, f32)> {
    if elapsed < balance.early_pool_until {
        EARLY_POOL.iter().map(|&k| (k, k.def().spawn_weight)).collect()
    } else {
        EnemyKind::wave_pool().map(|k| (k, k.def().spawn_weight)).collect()
    }
}

/// Weighted pick given a uniform roll in `[0, 1)`.
pub fn pick_weighted<T: Copy>(pool: &[(T, f32)], roll: f32) -> Option<T> {
    let total: f32 = pool.iter().map(|&(_, w)| w).sum();
    let mut cursor = roll * total;
    for &(item, weight) in pool {
        cursor -= weight;
        if cursor < 0.0 {
            return Some(item);
        }
    }
    pool.last().map(|&(item, _)| item)
}

pub fn wave_spawner(sim: &mut Sim) {
    let balance = sim.config.balance.spawner.clone();
    let elapsed = sim.state.time.elapsed;
    let interval = spawn_interval(elapsed, sim.state.tier().spawn_rate_mult, &balance);

    sim.state.spawner.timer += sim.dt();
    if sim.state.spawner.timer < interval {
        return;
    }
    sim.state.spawner.timer -= interval;

    let alive = sim.world.count::<IsEnemy>();
    if alive >= balance.max_enemies || sim.player().is_none() {
        return;
    }
    let count = batch_size(elapsed, &balance).min(balance.max_enemies - alive);
    let pool = eligible_pool(elapsed, &balance);

    for _ in 0..count {
        let roll: f32 = sim.rng.gen();
        let Some(kind) = pick_weighted(&pool, roll) else {
            return;
        };
        let Some(at) = point_around_player(sim, balance.spawn_radius) else {
            return;
        };
        prefabs::spawn_enemy(sim, kind, at.x, at.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn interval_ramps_to_its_floor() {
        let b = SpawnerBalance::default();
        assert_eq!(spawn_interval(0.0, 1.0, &b), 2.0);
        assert!((spawn_interval(300.0, 1.0, &b) - 1.0).abs() < 1e-6);
        // Decay caps at 80%, then the 0.3 floor wins.
        assert!((spawn_interval(10_000.0, 1.0, &b) - 0.4).abs() < 1e-6);
        assert!((spawn_interval(10_000.0, 2.0, &b) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn batches_grow_stepwise() {
        let b = SpawnerBalance::default();
        assert_eq!(batch_size(0.0, &b), 1);
        assert_eq!(batch_size(74.9, &b), 1);
        assert_eq!(batch_size(75.0, &b), 2);
        assert_eq!(batch_size(5_000.0, &b), 8);
    }

    #[test]
    fn early_pool_is_goblins_and_bats() {
        let b = SpawnerBalance::default();
        let early: Vec<EnemyKind> = eligible_pool(10.0, &b).into_iter().map(|(k, _)| k).collect();
        assert_eq!(early, vec![EnemyKind::Goblin, EnemyKind::Bat]);
        let late = eligible_pool(400.0, &b);
        assert!(late.len() > 2);
        assert!(late.iter().all(|(k, _)| k.def().rank == crate::data::EnemyRank::Normal));
    }

    #[test]
    fn weighted_pick_follows_weights() {
        let pool = [(EnemyKind::Goblin, 10.0), (EnemyKind::Bat, 8.0)];
        let mut rng = Pcg32::seed_from_u64(42);
        let trials = 90_000;
        let goblins = (0..trials).filter(|_| pick_weighted(&pool, rng.gen()) == Some(EnemyKind::Goblin)).count();
        let ratio = goblins as f64 / trials as f64;
        assert!((ratio - 10.0 / 18.0).abs() < 0.01, "goblin ratio {ratio}");
    }

    #[test]
    fn empty_pool_picks_nothing() {
        assert_eq!(pick_weighted::<EnemyKind>(&[], 0.5), None);
    }

    #[test]
    fn spawner_respects_population_cap() {
        let mut config = SimConfig::default();
        config.balance.spawner.max_enemies = 3;
        let mut sim = Sim::new(config).unwrap();
        sim.state.time.delta = 1.0;
        sim.state.time.elapsed = 1_000.0;
        for _ in 0..20 {
            wave_spawner(&mut sim);
        }
        assert_eq!(sim.world.count::<IsEnemy>(), 3);
    }
}
