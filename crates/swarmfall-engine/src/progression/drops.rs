//! Enemy drops: XP gem denominations and gold.

use glam::Vec3;

use crate::components::PlayerStats;
use crate::prefabs;
use crate::sim::Sim;

/// Break `total` into gem counts per tier of `denominations` (ascending).
///
/// Starts from the greedy breakdown, then splits gems one at a time until
/// at least `target` gems exist: a tier holding two or more gems is split
/// first (largest tier wins), otherwise a lone gem is split only into an
/// empty tier below it. A split that would exceed `max` gems ends the
/// process. The result depends on nothing but the arguments.
pub fn xp_denominations(total: u32, denominations: &[u32], target: u32, max: u32) -> Vec<u32> {
    let mut counts = greedy(total, denominations);
    let n = denominations.len();
    let mut gems: u32 = counts.iter().sum();

    while gems < target {
        let pick = (1..n)
            .rev()
            .find(|&j| counts[j] >= 2)
            .or_else(|| (1..n).rev().find(|&j| counts[j] == 1 && counts[j - 1] == 0));
        let Some(j) = pick else {
            break;
        };
        let split = greedy(denominations[j], &denominations[..j]);
        let added: u32 = split.iter().sum();
        if gems + added - 1 > max {
            break;
        }
        counts[j] -= 1;
        for (c, s) in counts.iter_mut().zip(&split) {
            *c += s;
        }
        gems = gems + added - 1;
    }
    counts
}

fn greedy(mut value: u32, denominations: &[u32]) -> Vec<u32> {
    let mut counts = vec![0; denominations.len()];
    for (i, &d) in denominations.iter().enumerate().rev() {
        if d == 0 {
            continue;
        }
        counts[i] = value / d;
        value %= d;
    }
    counts
}

/// Spawn the gems for an `total`-XP drop at `at`.
pub fn spawn_xp_drop(sim: &mut Sim, at: Vec3, total: u32) {
    if total == 0 {
        return;
    }
    let db = &sim.config.balance.drops;
    let denominations = db.denominations.clone();
    let counts = xp_denominations(total, &denominations, db.target_gems, db.max_gems);
    for (value, count) in denominations.iter().zip(counts) {
        for _ in 0..count {
            prefabs::spawn_xp_gem(sim, at, *value);
        }
    }
}

/// Gold actually credited for a `base` drop.
pub fn gold_credit(base: u32, difficulty_mult: f32, cursed: f32, gold_gain: f32) -> u32 {
    let gain = if gold_gain > 0.0 { gold_gain } else { 1.0 };
    (base as f32 * difficulty_mult * (1.0 + cursed) * gain).round().max(0.0) as u32
}

/// Credit a gold drop to the run. Returns the amount credited.
pub fn credit_gold(sim: &mut Sim, base: u32) -> u32 {
    let stats = sim.player().and_then(|p| sim.world.get::<PlayerStats>(p)).copied().unwrap_or_default();
    let amount = gold_credit(base, sim.state.tier().gold_mult, stats.cursed, stats.gold_gain);
    sim.state.player.gold = sim.state.player.gold.saturating_add(amount);
    amount
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIERS: [u32; 4] = [1, 5, 25, 100];

    fn value(counts: &[u32]) -> u32 {
        counts.iter().zip(TIERS).map(|(c, d)| c * d).sum()
    }

    #[test]
    fn hundred_breaks_into_fives_and_twenty_fives() {
        assert_eq!(xp_denominations(100, &TIERS, 5, 12), vec![0, 5, 3, 0]);
    }

    #[test]
    fn small_values_stay_greedy_when_no_split_helps() {
        assert_eq!(xp_denominations(7, &TIERS, 5, 12), vec![2, 1, 0, 0]);
        assert_eq!(xp_denominations(1, &TIERS, 5, 12), vec![1, 0, 0, 0]);
    }

    #[test]
    fn single_five_splits_into_ones() {
        assert_eq!(xp_denominations(5, &TIERS, 5, 12), vec![5, 0, 0, 0]);
    }

    #[test]
    fn total_is_preserved() {
        for total in [3, 12, 30, 99, 140, 512] {
            assert_eq!(value(&xp_denominations(total, &TIERS, 5, 12)), total);
        }
    }

    #[test]
    fn gold_rounding() {
        assert_eq!(gold_credit(50, 1.2, 0.0, 1.0), 60);
        assert_eq!(gold_credit(1, 1.0, 0.4, 1.0), 1);
        assert_eq!(gold_credit(20, 1.0, 0.0, 0.0), 20);
    }
}
