//! Simulation configuration.
//!
//! [`SimConfig`] carries the run parameters (seed, character, difficulty,
//! timing) plus a [`Balance`] block with every gameplay constant. All
//! structs default to the shipped tuning and deserialize with
//! `#[serde(default)]`, so a JSON override only needs the fields it changes.

use serde::{Deserialize, Serialize};

use crate::data::{CharacterId, DifficultyId};
use crate::SimError;

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seed of the simulation's only random number generator.
    pub seed: u64,
    pub character: CharacterId,
    pub difficulty: DifficultyId,
    /// Fixed timestep in seconds.
    pub fixed_dt: f64,
    /// Longest wall-clock frame fed into the accumulator.
    pub max_frame_time: f64,
    /// Countdown length of one run, in seconds.
    pub session_length: f32,
    pub balance: Balance,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            character: CharacterId::default(),
            difficulty: DifficultyId::default(),
            fixed_dt: 1.0 / 60.0,
            max_frame_time: 0.25,
            session_length: 600.0,
            balance: Balance::default(),
        }
    }
}

impl SimConfig {
    /// Parse a (possibly partial) JSON configuration and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: SimConfig =
            serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject timing values the scheduler cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        fn positive(name: &str, value: f64) -> Result<(), SimError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(SimError::Validation(format!("{name} must be positive and finite, got {value}")))
            }
        }

        positive("fixed_dt", self.fixed_dt)?;
        positive("max_frame_time", self.max_frame_time)?;
        positive("session_length", f64::from(self.session_length))?;
        if self.max_frame_time < self.fixed_dt {
            return Err(SimError::Validation(format!(
                "max_frame_time ({}) is shorter than fixed_dt ({})",
                self.max_frame_time, self.fixed_dt
            )));
        }
        let loadout = &self.balance.loadout;
        if loadout.weapon_slots == 0 || loadout.max_weapon_level == 0 || loadout.max_tome_level == 0 {
            return Err(SimError::Validation("loadout limits must be non-zero".into()));
        }
        let drops = &self.balance.drops;
        if drops.denominations.first() != Some(&1) || drops.denominations.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::Validation(
                "xp denominations must start at 1 and be strictly increasing".into(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Balance
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    pub player: PlayerBalance,
    pub combat: CombatBalance,
    pub xp: XpBalance,
    pub drops: DropBalance,
    pub loadout: LoadoutBalance,
    pub spawner: SpawnerBalance,
    pub timeline: TimelineBalance,
    pub swarm: SwarmBalance,
    pub interactables: InteractableBalance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerBalance {
    pub jump_force: f32,
    pub max_jumps: u32,
    pub gravity: f32,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    /// Invincibility granted after any hit (or evasion).
    pub invincibility_time: f32,
    /// The Mirror item multiplies invincibility by this.
    pub mirror_invincibility_mult: f32,
    pub radius: f32,
    pub half_height: f32,
    /// Seconds without a hit before the flex passive blocks the next one.
    pub flex_window: f32,
}

impl Default for PlayerBalance {
    fn default() -> Self {
        Self {
            jump_force: 10.0,
            max_jumps: 2,
            gravity: -20.0,
            dash_speed: 25.0,
            dash_duration: 0.2,
            dash_cooldown: 2.0,
            invincibility_time: 0.5,
            mirror_invincibility_mult: 2.0,
            radius: 0.4,
            half_height: 0.9,
            flex_window: 5.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatBalance {
    pub projectile_hit_radius: f32,
    pub contact_hit_radius: f32,
    /// Angular offset between multiple nearest/homing shots, radians.
    pub multi_shot_spread: f32,
    /// Full cone of the forward-spread pattern, radians.
    pub forward_arc: f32,
    /// Pulse interval of player aura/trail zones.
    pub zone_tick: f32,
    /// Turn rate of player homing projectiles, radians per second.
    pub player_homing_turn_rate: f32,
    pub enemy_homing_turn_rate: f32,
    /// Horizontal speed below which the attacker counts as standing still.
    pub idle_speed_threshold: f32,
}

impl Default for CombatBalance {
    fn default() -> Self {
        Self {
            projectile_hit_radius: 1.5,
            contact_hit_radius: 1.2,
            multi_shot_spread: 0.1,
            forward_arc: std::f32::consts::FRAC_PI_4,
            zone_tick: 0.5,
            player_homing_turn_rate: 4.0,
            enemy_homing_turn_rate: 2.0,
            idle_speed_threshold: 0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpBalance {
    pub base_xp: f32,
    pub xp_scaling: f32,
    /// Magnet range is pickup range plus this.
    pub magnet_bonus: f32,
    pub magnet_speed: f32,
    pub gem_lifetime: f32,
    pub gem_float_height: f32,
}

impl Default for XpBalance {
    fn default() -> Self {
        Self {
            base_xp: 10.0,
            xp_scaling: 0.15,
            magnet_bonus: 3.0,
            magnet_speed: 15.0,
            gem_lifetime: 30.0,
            gem_float_height: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropBalance {
    /// XP gem tier values, smallest first.
    pub denominations: Vec<u32>,
    /// Gem count the breakdown tries to reach.
    pub target_gems: u32,
    /// Gem count the breakdown never exceeds while splitting.
    pub max_gems: u32,
    pub boss_gold: u32,
    pub mini_boss_gold: u32,
    pub regular_gold_chance: f32,
}

impl Default for DropBalance {
    fn default() -> Self {
        Self {
            denominations: vec![1, 5, 25, 100],
            target_gems: 5,
            max_gems: 12,
            boss_gold: 50,
            mini_boss_gold: 20,
            regular_gold_chance: 0.2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadoutBalance {
    pub weapon_slots: usize,
    pub tome_slots: usize,
    pub max_weapon_level: u32,
    pub max_tome_level: u32,
    pub damage_per_level: f32,
    /// One extra projectile every this many weapon levels.
    pub projectile_level_step: u32,
    /// One cooldown reduction every this many weapon levels.
    pub cooldown_level_step: u32,
    pub cooldown_reduction: f32,
    /// Choices offered per level-up.
    pub choices_per_level: usize,
}

impl Default for LoadoutBalance {
    fn default() -> Self {
        Self {
            weapon_slots: 4,
            tome_slots: 4,
            max_weapon_level: 8,
            max_tome_level: 5,
            damage_per_level: 0.2,
            projectile_level_step: 3,
            cooldown_level_step: 2,
            cooldown_reduction: 0.08,
            choices_per_level: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnerBalance {
    pub spawn_radius: f32,
    pub max_enemies: usize,
    pub base_interval: f32,
    pub min_interval: f32,
    /// Seconds over which the interval decays.
    pub ramp_time: f32,
    /// Largest fraction of the base interval removed by the decay.
    pub max_ramp: f32,
    /// Seconds per extra enemy in a batch.
    pub batch_growth: f32,
    pub max_batch: usize,
    /// Until this elapsed time only the early pool spawns.
    pub early_pool_until: f32,
}

impl Default for SpawnerBalance {
    fn default() -> Self {
        Self {
            spawn_radius: 40.0,
            max_enemies: 200,
            base_interval: 2.0,
            min_interval: 0.3,
            ramp_time: 600.0,
            max_ramp: 0.8,
            batch_growth: 75.0,
            max_batch: 8,
            early_pool_until: 300.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineBalance {
    pub mini_boss_1_at: f32,
    pub mini_boss_2_at: f32,
    pub portal_at: f32,
    pub portal_radius: f32,
}

impl Default for TimelineBalance {
    fn default() -> Self {
        Self { mini_boss_1_at: 120.0, mini_boss_2_at: 180.0, portal_at: 300.0, portal_radius: 3.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwarmBalance {
    pub initial_interval: f32,
    pub min_interval: f32,
    pub ramp_duration: f32,
    /// Swarm elapsed time after which spawns get the health multiplier.
    pub super_threshold: f32,
    pub super_health_mult: f32,
}

impl Default for SwarmBalance {
    fn default() -> Self {
        Self {
            initial_interval: 0.5,
            min_interval: 0.1,
            ramp_duration: 360.0,
            super_threshold: 360.0,
            super_health_mult: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractableBalance {
    pub shrine_range: f32,
    pub shrine_charge_time: f32,
    /// Fraction of real time at which charge drains outside range.
    pub shrine_decay_rate: f32,
    pub chest_range: f32,
    pub map_radius: f32,
    pub shrine_count: usize,
    pub shrine_min_distance: f32,
    pub chest_count: usize,
    pub chest_min_distance: f32,
}

impl Default for InteractableBalance {
    fn default() -> Self {
        Self {
            shrine_range: 3.0,
            shrine_charge_time: 5.0,
            shrine_decay_rate: 0.5,
            chest_range: 2.0,
            map_radius: 120.0,
            shrine_count: 15,
            shrine_min_distance: 30.0,
            chest_count: 10,
            chest_min_distance: 20.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SimConfig::from_json_str(
            r#"{ "seed": 7, "difficulty": "hard", "balance": { "spawner": { "max_enemies": 50 } } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.difficulty, DifficultyId::Hard);
        assert_eq!(config.balance.spawner.max_enemies, 50);
        assert_eq!(config.balance.spawner.spawn_radius, 40.0);
        assert_eq!(config.fixed_dt, 1.0 / 60.0);
    }

    #[test]
    fn malformed_json_is_invalid_config() {
        let err = SimConfig::from_json_str("{ seed: ").unwrap_err();
        assert!(matches!(err, SimError::InvalidConfig(_)));
    }

    #[test]
    fn non_positive_timestep_is_rejected() {
        let err = SimConfig::from_json_str(r#"{ "fixed_dt": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SimError::Validation(msg) if msg.contains("fixed_dt")));
    }

    #[test]
    fn unsorted_denominations_are_rejected() {
        let mut config = SimConfig::default();
        config.balance.drops.denominations = vec![1, 25, 5];
        assert!(config.validate().is_err());
    }
}
