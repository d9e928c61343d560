//! Difficulty tiers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyId {
    #[default]
    Normal,
    Hard,
    VeryHard,
}

/// Multipliers applied to spawned enemies and to player rewards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyTier {
    pub id: DifficultyId,
    pub name: &'static str,
    pub enemy_hp_mult: f32,
    pub enemy_dmg_mult: f32,
    pub enemy_speed_mult: f32,
    pub spawn_rate_mult: f32,
    pub xp_mult: f32,
    pub gold_mult: f32,
}

#[rustfmt::skip]
pub const DIFFICULTY_TIERS: [DifficultyTier; 3] = [
    DifficultyTier { id: DifficultyId::Normal, name: "Normal", enemy_hp_mult: 1.0, enemy_dmg_mult: 1.0, enemy_speed_mult: 1.0, spawn_rate_mult: 1.0, xp_mult: 1.0, gold_mult: 1.0 },
    DifficultyTier { id: DifficultyId::Hard, name: "Hard", enemy_hp_mult: 1.5, enemy_dmg_mult: 1.3, enemy_speed_mult: 1.1, spawn_rate_mult: 1.3, xp_mult: 1.2, gold_mult: 1.5 },
    DifficultyTier { id: DifficultyId::VeryHard, name: "Very Hard", enemy_hp_mult: 2.5, enemy_dmg_mult: 1.8, enemy_speed_mult: 1.2, spawn_rate_mult: 1.6, xp_mult: 1.5, gold_mult: 2.0 },
];

impl DifficultyId {
    pub fn tier(self) -> &'static DifficultyTier {
        &DIFFICULTY_TIERS[self as usize]
    }
}
