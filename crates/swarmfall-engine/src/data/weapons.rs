//! Weapon definitions.

use serde::{Deserialize, Serialize};

/// Pierce value meaning "never exhausted" (area zones, enemy bodies).
pub const UNLIMITED_PIERCE: u32 = u32::MAX;

/// How a weapon turns a cooldown expiry into projectiles or zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FiringPattern {
    /// Aim at the closest enemy in range; no target, no shot.
    Nearest,
    /// Along the owner's facing.
    Forward,
    /// Evenly spaced around a full circle.
    Radial,
    /// Spread inside a fixed cone around the facing.
    ForwardSpread,
    /// Damage zone that follows the owner.
    Aura,
    /// Stationary damage zone dropped at the owner's feet.
    Trail,
    /// Like `Nearest`, but the projectile keeps steering at its target.
    Homing,
    /// Out-and-back arc that curves home to the owner.
    Boomerang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponId {
    Sword,
    Bow,
    Revolver,
    BoneToss,
    Aura,
    Katana,
    FireTrail,
    FrostNova,
    MagicMissile,
    LightningStaff,
}

/// Level-1 stats of a weapon. Level scaling and player multipliers are
/// applied on top when the weapon entity's `AutoAttack` is recomputed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDef {
    pub id: WeaponId,
    pub key: &'static str,
    pub name: &'static str,
    pub damage: f32,
    pub cooldown: f32,
    /// Targeting range, or zone radius for aura/trail patterns.
    pub range: f32,
    pub pattern: FiringPattern,
    pub knockback: f32,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_size: f32,
    pub pierce: u32,
    /// Follow-up chain hits per projectile.
    pub chains: u32,
    pub chain_radius: f32,
}

#[rustfmt::skip]
pub const WEAPONS: [WeaponDef; 10] = [
    WeaponDef {
        id: WeaponId::Sword, key: "sword", name: "Sword",
        damage: 8.0, cooldown: 1.2, range: 2.5, pattern: FiringPattern::Forward, knockback: 2.0,
        projectile_count: 1, projectile_speed: 12.0, projectile_lifetime: 0.15, projectile_size: 1.5,
        pierce: 3, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::Bow, key: "bow", name: "Bow",
        damage: 10.0, cooldown: 1.0, range: 20.0, pattern: FiringPattern::Nearest, knockback: 1.0,
        projectile_count: 1, projectile_speed: 20.0, projectile_lifetime: 1.5, projectile_size: 0.3,
        pierce: 1, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::Revolver, key: "revolver", name: "Revolver",
        damage: 6.0, cooldown: 0.5, range: 18.0, pattern: FiringPattern::Nearest, knockback: 0.5,
        projectile_count: 1, projectile_speed: 30.0, projectile_lifetime: 1.0, projectile_size: 0.2,
        pierce: 2, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::BoneToss, key: "bone_toss", name: "Bone Toss",
        damage: 9.0, cooldown: 1.4, range: 14.0, pattern: FiringPattern::Boomerang, knockback: 1.0,
        projectile_count: 1, projectile_speed: 14.0, projectile_lifetime: 1.6, projectile_size: 0.5,
        pierce: 10, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::Aura, key: "aura", name: "Aura",
        damage: 4.0, cooldown: 1.0, range: 3.0, pattern: FiringPattern::Aura, knockback: 0.5,
        projectile_count: 1, projectile_speed: 0.0, projectile_lifetime: 1.0, projectile_size: 1.0,
        pierce: UNLIMITED_PIERCE, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::Katana, key: "katana", name: "Katana",
        damage: 7.0, cooldown: 0.9, range: 4.0, pattern: FiringPattern::ForwardSpread, knockback: 1.5,
        projectile_count: 3, projectile_speed: 16.0, projectile_lifetime: 0.2, projectile_size: 0.8,
        pierce: 2, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::FireTrail, key: "fire_trail", name: "Fire Trail",
        damage: 3.0, cooldown: 0.4, range: 1.5, pattern: FiringPattern::Trail, knockback: 0.0,
        projectile_count: 1, projectile_speed: 0.0, projectile_lifetime: 2.5, projectile_size: 1.0,
        pierce: UNLIMITED_PIERCE, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::FrostNova, key: "frost_nova", name: "Frost Nova",
        damage: 5.0, cooldown: 2.0, range: 10.0, pattern: FiringPattern::Radial, knockback: 3.0,
        projectile_count: 8, projectile_speed: 10.0, projectile_lifetime: 0.8, projectile_size: 0.4,
        pierce: 1, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::MagicMissile, key: "magic_missile", name: "Magic Missile",
        damage: 7.0, cooldown: 1.5, range: 25.0, pattern: FiringPattern::Homing, knockback: 0.5,
        projectile_count: 2, projectile_speed: 12.0, projectile_lifetime: 3.0, projectile_size: 0.3,
        pierce: 1, chains: 0, chain_radius: 0.0,
    },
    WeaponDef {
        id: WeaponId::LightningStaff, key: "lightning_staff", name: "Lightning Staff",
        damage: 12.0, cooldown: 1.8, range: 20.0, pattern: FiringPattern::Nearest, knockback: 0.0,
        projectile_count: 1, projectile_speed: 40.0, projectile_lifetime: 0.6, projectile_size: 0.3,
        pierce: 1, chains: 3, chain_radius: 8.0,
    },
];

impl WeaponId {
    pub const ALL: [WeaponId; 10] = [
        WeaponId::Sword,
        WeaponId::Bow,
        WeaponId::Revolver,
        WeaponId::BoneToss,
        WeaponId::Aura,
        WeaponId::Katana,
        WeaponId::FireTrail,
        WeaponId::FrostNova,
        WeaponId::MagicMissile,
        WeaponId::LightningStaff,
    ];

    pub fn def(self) -> &'static WeaponDef {
        &WEAPONS[self as usize]
    }

    pub fn key(self) -> &'static str {
        self.def().key
    }

    pub fn from_key(key: &str) -> Option<Self> {
        WEAPONS.iter().find(|w| w.key == key).map(|w| w.id)
    }

    /// Resolve `key`, falling back to the sword for unknown keys.
    pub fn from_key_or_default(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            tracing::warn!(key, "unknown weapon key, using sword");
            WeaponId::Sword
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for id in WeaponId::ALL {
            assert_eq!(id.def().id, id);
        }
    }

    #[test]
    fn unknown_key_falls_back_to_sword() {
        assert_eq!(WeaponId::from_key_or_default("bow"), WeaponId::Bow);
        assert_eq!(WeaponId::from_key_or_default("laser_cannon"), WeaponId::Sword);
    }

    #[test]
    fn zone_weapons_never_exhaust() {
        for id in WeaponId::ALL {
            let def = id.def();
            if matches!(def.pattern, FiringPattern::Aura | FiringPattern::Trail) {
                assert_eq!(def.pierce, UNLIMITED_PIERCE, "{}", def.key);
            }
        }
    }
}
