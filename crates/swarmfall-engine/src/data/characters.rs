//! Playable characters.

use serde::{Deserialize, Serialize};

use super::{Stat, WeaponId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterId {
    #[default]
    Knight,
    Fox,
    Gunslinger,
    Skeleton,
    AuraChad,
    SpeedDemon,
}

/// Per-level passive bonus. `per_level × level` is added to `stat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Passive {
    pub name: &'static str,
    pub stat: Stat,
    pub per_level: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterDef {
    pub id: CharacterId,
    pub key: &'static str,
    pub name: &'static str,
    pub starting_weapon: WeaponId,
    pub base_hp: f32,
    pub base_speed: f32,
    pub base_armor: f32,
    pub passive: Passive,
}

#[rustfmt::skip]
pub const CHARACTERS: [CharacterDef; 6] = [
    CharacterDef {
        id: CharacterId::Knight, key: "knight", name: "Knight", starting_weapon: WeaponId::Sword,
        base_hp: 120.0, base_speed: 5.0, base_armor: 5.0,
        passive: Passive { name: "Reinforced", stat: Stat::Armor, per_level: 0.01 },
    },
    CharacterDef {
        id: CharacterId::Fox, key: "fox", name: "Fox", starting_weapon: WeaponId::Bow,
        base_hp: 80.0, base_speed: 7.0, base_armor: 0.0,
        passive: Passive { name: "Lucky", stat: Stat::Luck, per_level: 0.01 },
    },
    CharacterDef {
        id: CharacterId::Gunslinger, key: "gunslinger", name: "Gunslinger", starting_weapon: WeaponId::Revolver,
        base_hp: 70.0, base_speed: 6.0, base_armor: 0.0,
        passive: Passive { name: "Crit Happens", stat: Stat::Crit, per_level: 0.01 },
    },
    CharacterDef {
        id: CharacterId::Skeleton, key: "skeleton", name: "Skeleton", starting_weapon: WeaponId::BoneToss,
        base_hp: 60.0, base_speed: 6.0, base_armor: 0.0,
        passive: Passive { name: "Rattled", stat: Stat::AttackSpeed, per_level: 0.01 },
    },
    CharacterDef {
        id: CharacterId::AuraChad, key: "aura_chad", name: "Aura Chad", starting_weapon: WeaponId::Aura,
        base_hp: 100.0, base_speed: 5.0, base_armor: 3.0,
        passive: Passive { name: "Flex", stat: Stat::Flex, per_level: 0.0 },
    },
    CharacterDef {
        id: CharacterId::SpeedDemon, key: "speed_demon", name: "Speed Demon", starting_weapon: WeaponId::Katana,
        base_hp: 60.0, base_speed: 9.0, base_armor: 0.0,
        passive: Passive { name: "Speed Freak", stat: Stat::SpeedDamage, per_level: 0.02 },
    },
];

impl CharacterId {
    pub const ALL: [CharacterId; 6] = [
        CharacterId::Knight,
        CharacterId::Fox,
        CharacterId::Gunslinger,
        CharacterId::Skeleton,
        CharacterId::AuraChad,
        CharacterId::SpeedDemon,
    ];

    pub fn def(self) -> &'static CharacterDef {
        &CHARACTERS[self as usize]
    }

    pub fn from_key(key: &str) -> Option<Self> {
        CHARACTERS.iter().find(|c| c.key == key).map(|c| c.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_indexed_by_id() {
        for id in CharacterId::ALL {
            assert_eq!(id.def().id, id);
        }
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(CharacterId::from_key("aura_chad"), Some(CharacterId::AuraChad));
        assert_eq!(CharacterId::from_key("wizard"), None);
    }
}
