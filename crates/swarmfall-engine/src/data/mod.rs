//! Static content tables.
//!
//! Characters, weapons, enemies, tomes, items, shrine boosts, quests and
//! difficulty tiers are compiled-in tables consumed by value. Gameplay
//! tables are keyed by closed Rust enums; string keys only appear at the
//! configuration boundary, where unknown keys fall back to a documented
//! default, and on quests, which are looked up by key.

pub mod characters;
pub mod difficulty;
pub mod enemies;
pub mod loot;
pub mod quests;
pub mod weapons;

use serde::{Deserialize, Serialize};

pub use characters::{CharacterDef, CharacterId, Passive};
pub use difficulty::{DifficultyId, DifficultyTier};
pub use enemies::{EnemyDef, EnemyKind, EnemyProjectileKind, EnemyRank, MeleeProfile, PursuitBehavior, RangedProfile};
pub use loot::{ItemDef, ItemId, ShrineBoost, TomeDef, TomeId, SHRINE_BOOSTS};
pub use quests::{QuestDef, QuestKind, QUESTS};
pub use weapons::{FiringPattern, WeaponDef, WeaponId, UNLIMITED_PIERCE};

/// A player statistic that tomes, items, shrines and passives can modify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Damage,
    AttackSpeed,
    MoveSpeed,
    MaxHp,
    Regen,
    Crit,
    CritDamage,
    Knockback,
    Evasion,
    XpGain,
    Armor,
    Luck,
    ProjectileCount,
    Cursed,
    Lifesteal,
    Duration,
    Size,
    Thorns,
    ProjectileSpeed,
    GoldGain,
    PickupRange,
    BossDamage,
    IdleDamage,
    SpeedDamage,
    /// Aura Chad's passive; carries no numeric value.
    Flex,
}

/// One additive change to a [`Stat`].
///
/// `is_percent` only matters for stats with both a flat and a relative
/// reading (max HP, armor).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    pub stat: Stat,
    pub value: f32,
    pub is_percent: bool,
}

impl StatModifier {
    pub const fn percent(stat: Stat, value: f32) -> Self {
        Self { stat, value, is_percent: true }
    }

    pub const fn flat(stat: Stat, value: f32) -> Self {
        Self { stat, value, is_percent: false }
    }
}

/// Loot rarity, ordered from most to least common.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Base roll weight for chest loot.
    pub fn weight(self) -> f32 {
        match self {
            Rarity::Common => 50.0,
            Rarity::Uncommon => 25.0,
            Rarity::Rare => 15.0,
            Rarity::Epic => 8.0,
            Rarity::Legendary => 2.0,
        }
    }
}
