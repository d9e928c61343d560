//! Property tests for the pure gameplay math.
//!
//! Each property is checked against randomly generated inputs; none of them
//! needs a running simulation.

use glam::Vec2;
use proptest::prelude::*;
use swarmfall_engine::ai::boss::{advance_phase, compute_phase};
use swarmfall_engine::ai::steering::steer_toward;
use swarmfall_engine::combat::damage::mitigate;
use swarmfall_engine::components::BossPhase;
use swarmfall_engine::config::XpBalance;
use swarmfall_engine::data::CharacterId;
use swarmfall_engine::progression::drops::xp_denominations;
use swarmfall_engine::progression::xp::{apply_xp, xp_to_next_level};
use swarmfall_engine::state::PlayerProgress;

const DENOMINATIONS: [u32; 4] = [1, 5, 25, 100];
const PHASES: [f32; 3] = [0.75, 0.5, 0.25];

/// Planar vectors with a usable length.
fn heading_vec() -> impl Strategy<Value = Vec2> {
    (0.0f32..std::f32::consts::TAU, 0.1f32..50.0).prop_map(|(a, len)| Vec2::from_angle(a) * len)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(2_000))]

    // -- damage --------------------------------------------------------------

    #[test]
    fn more_armor_never_means_more_damage(
        raw in 0.01f32..1_000.0,
        a in 0.0f32..10_000.0,
        b in 0.0f32..10_000.0,
    ) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let light = mitigate(raw, low);
        let heavy = mitigate(raw, high);
        prop_assert!(heavy <= light);
        prop_assert!(heavy > 0.0);
        prop_assert!(light <= raw);
    }

    // -- steering ------------------------------------------------------------

    #[test]
    fn steering_turns_at_most_max_turn_and_keeps_speed(
        velocity in heading_vec(),
        to_target in heading_vec(),
        max_turn in 0.0f32..std::f32::consts::PI,
    ) {
        let steered = steer_toward(velocity, to_target, max_turn);
        let speed = velocity.length();
        prop_assert!((steered.length() - speed).abs() <= speed * 1.0e-4);
        let turned = velocity.perp_dot(steered).atan2(velocity.dot(steered)).abs();
        prop_assert!(turned <= max_turn + 1.0e-3, "turned {turned} > {max_turn}");
    }

    // -- boss phases ---------------------------------------------------------

    #[test]
    fn boss_phase_never_goes_backwards(ratios in prop::collection::vec(0.0f32..=1.0, 1..40)) {
        let mut phase = BossPhase::default();
        for ratio in ratios {
            let before = phase.phase;
            let advanced = advance_phase(&mut phase, &PHASES, ratio);
            prop_assert!(phase.phase >= before);
            prop_assert_eq!(advanced, phase.phase > before);
            prop_assert!(phase.phase >= compute_phase(&PHASES, ratio));
            prop_assert!(phase.phase as usize <= PHASES.len());
        }
    }

    // -- xp ------------------------------------------------------------------

    #[test]
    fn gem_breakdown_preserves_the_total(
        total in 0u32..5_000,
        target in 1u32..10,
        max in 1u32..20,
    ) {
        let counts = xp_denominations(total, &DENOMINATIONS, target, max);
        prop_assert_eq!(counts.len(), DENOMINATIONS.len());
        let value: u32 = counts.iter().zip(DENOMINATIONS).map(|(c, d)| c * d).sum();
        prop_assert_eq!(value, total);
        prop_assert_eq!(counts.clone(), xp_denominations(total, &DENOMINATIONS, target, max));
    }

    #[test]
    fn xp_accumulator_ends_below_the_requirement(
        start_level in 1u32..30,
        grants in prop::collection::vec(0.0f32..500.0, 1..20),
    ) {
        let balance = XpBalance::default();
        let mut progress = PlayerProgress::new(CharacterId::Knight, xp_to_next_level(start_level, &balance));
        progress.level = start_level;

        for amount in grants {
            let before = progress.level;
            let gained = apply_xp(&mut progress, amount, &balance);
            prop_assert_eq!(progress.level, before + gained);
            prop_assert!(progress.xp >= 0.0);
            prop_assert!(progress.xp < progress.xp_to_next);
            prop_assert_eq!(progress.xp_to_next, xp_to_next_level(progress.level, &balance));
        }
    }
}
