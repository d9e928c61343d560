//! Enemy definitions: base stats, pursuit behavior and attack profiles.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Goblin,
    GoblinBrute,
    Bat,
    Wolf,
    SkeletonArcher,
    Wisp,
    Shaman,
    Ghost,
    StoneGolem,
    Chunkham,
    LilBark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyRank {
    Normal,
    MiniBoss,
    Boss,
}

/// Steering variant used by `AIFollow`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PursuitBehavior {
    Direct,
    Orbit,
    KeepDistance,
}

/// Projectile variant fired by `EnemyRangedAttack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyProjectileKind {
    Straight,
    Homing,
    /// Lingering cloud centered on the target's position.
    AreaCloud,
}

/// Windup/lunge/cooldown tuning for the melee state machine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeleeProfile {
    pub trigger_range: f32,
    pub windup: f32,
    pub lunge: f32,
    pub cooldown: f32,
    pub lunge_speed_mult: f32,
}

impl Default for MeleeProfile {
    fn default() -> Self {
        GOBLIN_MELEE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangedProfile {
    pub cooldown: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    pub kind: EnemyProjectileKind,
    /// Do not fire when the target is closer than this (0 disables the gate).
    pub min_range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyDef {
    pub kind: EnemyKind,
    pub key: &'static str,
    pub name: &'static str,
    pub health: f32,
    pub speed: f32,
    pub damage: f32,
    pub armor: f32,
    pub xp_value: f32,
    /// Wave spawner weight; zero keeps the type out of random waves.
    pub spawn_weight: f32,
    pub scale: [f32; 3],
    pub rank: EnemyRank,
    pub gold_drop: u32,
    pub behavior: PursuitBehavior,
    pub preferred_distance: f32,
    pub melee: Option<MeleeProfile>,
    pub ranged: Option<RangedProfile>,
    /// Health ratios at which a boss advances phase, highest first.
    pub phase_thresholds: &'static [f32],
}

const GOBLIN_MELEE: MeleeProfile = MeleeProfile {
    trigger_range: 2.5,
    windup: 0.25,
    lunge: 0.15,
    cooldown: 0.5,
    lunge_speed_mult: 3.5,
};

const BRUTE_MELEE: MeleeProfile = MeleeProfile {
    trigger_range: 3.0,
    windup: 0.5,
    lunge: 0.2,
    cooldown: 0.8,
    lunge_speed_mult: 3.0,
};

const WOLF_MELEE: MeleeProfile = MeleeProfile {
    trigger_range: 6.0,
    windup: 0.35,
    lunge: 0.25,
    cooldown: 1.2,
    lunge_speed_mult: 4.0,
};

#[rustfmt::skip]
pub const ENEMIES: [EnemyDef; 11] = [
    EnemyDef {
        kind: EnemyKind::Goblin, key: "goblin", name: "Goblin",
        health: 15.0, speed: 3.5, damage: 5.0, armor: 0.0, xp_value: 3.0, spawn_weight: 10.0,
        scale: [0.6, 0.8, 0.6], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: Some(GOBLIN_MELEE), ranged: None, phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::GoblinBrute, key: "goblin_brute", name: "Goblin Brute",
        health: 40.0, speed: 2.5, damage: 12.0, armor: 10.0, xp_value: 8.0, spawn_weight: 4.0,
        scale: [1.0, 1.2, 1.0], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: Some(BRUTE_MELEE), ranged: None, phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::Bat, key: "bat", name: "Bat",
        health: 8.0, speed: 5.0, damage: 3.0, armor: 0.0, xp_value: 2.0, spawn_weight: 8.0,
        scale: [0.3, 0.3, 0.3], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: None, ranged: None, phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::Wolf, key: "wolf", name: "Wolf",
        health: 20.0, speed: 4.5, damage: 7.0, armor: 0.0, xp_value: 4.0, spawn_weight: 5.0,
        scale: [0.5, 0.4, 0.8], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::Orbit, preferred_distance: 5.0,
        melee: Some(WOLF_MELEE), ranged: None, phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::SkeletonArcher, key: "skeleton_archer", name: "Skeleton Archer",
        health: 12.0, speed: 3.0, damage: 4.0, armor: 0.0, xp_value: 5.0, spawn_weight: 5.0,
        scale: [0.5, 0.9, 0.5], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::KeepDistance, preferred_distance: 10.0,
        melee: None,
        ranged: Some(RangedProfile { cooldown: 2.5, damage: 6.0, projectile_speed: 12.0, kind: EnemyProjectileKind::Straight, min_range: 0.0 }),
        phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::Wisp, key: "wisp", name: "Wisp",
        health: 10.0, speed: 3.5, damage: 3.0, armor: 0.0, xp_value: 5.0, spawn_weight: 3.0,
        scale: [0.4, 0.4, 0.4], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::KeepDistance, preferred_distance: 12.0,
        melee: None,
        ranged: Some(RangedProfile { cooldown: 4.0, damage: 8.0, projectile_speed: 7.0, kind: EnemyProjectileKind::Homing, min_range: 0.0 }),
        phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::Shaman, key: "shaman", name: "Shaman",
        health: 18.0, speed: 2.5, damage: 4.0, armor: 0.0, xp_value: 6.0, spawn_weight: 3.0,
        scale: [0.6, 1.0, 0.6], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::KeepDistance, preferred_distance: 14.0,
        melee: None,
        ranged: Some(RangedProfile { cooldown: 5.0, damage: 5.0, projectile_speed: 0.0, kind: EnemyProjectileKind::AreaCloud, min_range: 6.0 }),
        phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::Ghost, key: "ghost", name: "Ghost",
        health: 12.0, speed: 5.5, damage: 8.0, armor: 0.0, xp_value: 4.0, spawn_weight: 0.0,
        scale: [0.6, 0.9, 0.6], rank: EnemyRank::Normal, gold_drop: 0,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: None, ranged: None, phase_thresholds: &[],
    },
    EnemyDef {
        kind: EnemyKind::StoneGolem, key: "stone_golem", name: "Stone Golem",
        health: 400.0, speed: 2.0, damage: 20.0, armor: 20.0, xp_value: 60.0, spawn_weight: 0.0,
        scale: [2.0, 2.5, 2.0], rank: EnemyRank::MiniBoss, gold_drop: 20,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: None, ranged: None, phase_thresholds: &[0.5],
    },
    EnemyDef {
        kind: EnemyKind::Chunkham, key: "chunkham", name: "Chunkham",
        health: 500.0, speed: 2.2, damage: 15.0, armor: 10.0, xp_value: 60.0, spawn_weight: 0.0,
        scale: [2.2, 2.0, 2.2], rank: EnemyRank::MiniBoss, gold_drop: 20,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: None, ranged: None, phase_thresholds: &[0.5],
    },
    EnemyDef {
        kind: EnemyKind::LilBark, key: "lil_bark", name: "Lil Bark",
        health: 2000.0, speed: 2.5, damage: 25.0, armor: 30.0, xp_value: 200.0, spawn_weight: 0.0,
        scale: [3.0, 4.0, 3.0], rank: EnemyRank::Boss, gold_drop: 50,
        behavior: PursuitBehavior::Direct, preferred_distance: 0.0,
        melee: None, ranged: None, phase_thresholds: &[0.75, 0.5, 0.25],
    },
];

/// Types eligible for random waves before the pool expands.
pub const EARLY_POOL: [EnemyKind; 2] = [EnemyKind::Goblin, EnemyKind::Bat];

impl EnemyKind {
    pub const ALL: [EnemyKind; 11] = [
        EnemyKind::Goblin,
        EnemyKind::GoblinBrute,
        EnemyKind::Bat,
        EnemyKind::Wolf,
        EnemyKind::SkeletonArcher,
        EnemyKind::Wisp,
        EnemyKind::Shaman,
        EnemyKind::Ghost,
        EnemyKind::StoneGolem,
        EnemyKind::Chunkham,
        EnemyKind::LilBark,
    ];

    pub fn def(self) -> &'static EnemyDef {
        &ENEMIES[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        ENEMIES.iter().find(|e| e.key == key).map(|e| e.kind)
    }

    /// Resolve `key`, falling back to the goblin for unknown keys.
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::warn!(key, "unknown enemy key, using goblin");
            EnemyKind::Goblin
        })
    }

    /// Regular enemies that can appear in random waves.
    pub fn wave_pool() -> impl Iterator<Item = EnemyKind> {
        Self::ALL
            .into_iter()
            .filter(|k| k.def().rank == EnemyRank::Normal && k.def().spawn_weight > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_kind() {
        for kind in EnemyKind::ALL {
            assert_eq!(kind.def().kind, kind);
        }
    }

    #[test]
    fn boss_thresholds_descend() {
        for kind in EnemyKind::ALL {
            let t = kind.def().phase_thresholds;
            assert!(t.windows(2).all(|w| w[0] > w[1]), "{}", kind.key());
        }
    }

    #[test]
    fn wave_pool_excludes_bosses_and_ghosts() {
        let pool: Vec<EnemyKind> = EnemyKind::wave_pool().collect();
        assert!(pool.contains(&EnemyKind::Goblin));
        assert!(!pool.contains(&EnemyKind::Ghost));
        assert!(!pool.contains(&EnemyKind::LilBark));
        assert!(EARLY_POOL.iter().all(|k| pool.contains(k)));
    }

    #[test]
    fn unknown_key_falls_back_to_goblin() {
        assert_eq!(EnemyKind::from_key_or_default("wolf"), EnemyKind::Wolf);
        assert_eq!(EnemyKind::from_key_or_default("dragon"), EnemyKind::Goblin);
    }
}
