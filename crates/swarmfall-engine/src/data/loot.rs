//! Tomes, items and shrine boosts.

use serde::{Deserialize, Serialize};

use super::{Rarity, Stat, StatModifier};

// ---------------------------------------------------------------------------
// Tomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TomeId {
    Damage,
    AttackSpeed,
    MoveSpeed,
    MaxHp,
    Regen,
    Crit,
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
}

/// A levelled stat book. Each level adds `per_level` to `stat`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TomeDef {
    pub id: TomeId,
    pub name: &'static str,
    pub stat: Stat,
    pub per_level: f32,
    pub is_percent: bool,
}

#[rustfmt::skip]
pub const TOMES: [TomeDef; 19] = [
    TomeDef { id: TomeId::Damage, name: "Damage Tome", stat: Stat::Damage, per_level: 0.10, is_percent: true },
    TomeDef { id: TomeId::AttackSpeed, name: "Attack Speed Tome", stat: Stat::AttackSpeed, per_level: 0.04, is_percent: true },
    TomeDef { id: TomeId::MoveSpeed, name: "Movement Tome", stat: Stat::MoveSpeed, per_level: 0.07, is_percent: true },
    TomeDef { id: TomeId::MaxHp, name: "HP Tome", stat: Stat::MaxHp, per_level: 0.08, is_percent: true },
    TomeDef { id: TomeId::Regen, name: "Regen Tome", stat: Stat::Regen, per_level: 0.5, is_percent: false },
    TomeDef { id: TomeId::Crit, name: "Crit Tome", stat: Stat::Crit, per_level: 0.07, is_percent: false },
    TomeDef { id: TomeId::Knockback, name: "Knockback Tome", stat: Stat::Knockback, per_level: 0.10, is_percent: true },
    TomeDef { id: TomeId::Evasion, name: "Evasion Tome", stat: Stat::Evasion, per_level: 0.02, is_percent: false },
    TomeDef { id: TomeId::XpGain, name: "XP Tome", stat: Stat::XpGain, per_level: 0.07, is_percent: true },
    TomeDef { id: TomeId::Armor, name: "Armor Tome", stat: Stat::Armor, per_level: 0.03, is_percent: true },
    TomeDef { id: TomeId::Luck, name: "Luck Tome", stat: Stat::Luck, per_level: 0.07, is_percent: false },
    TomeDef { id: TomeId::ProjectileCount, name: "Quantity Tome", stat: Stat::ProjectileCount, per_level: 1.0, is_percent: false },
    TomeDef { id: TomeId::Cursed, name: "Cursed Tome", stat: Stat::Cursed, per_level: 0.035, is_percent: true },
    TomeDef { id: TomeId::Lifesteal, name: "Lifesteal Tome", stat: Stat::Lifesteal, per_level: 0.03, is_percent: false },
    TomeDef { id: TomeId::Duration, name: "Duration Tome", stat: Stat::Duration, per_level: 0.08, is_percent: true },
    TomeDef { id: TomeId::Size, name: "Size Tome", stat: Stat::Size, per_level: 0.10, is_percent: true },
    TomeDef { id: TomeId::Thorns, name: "Thorns Tome", stat: Stat::Thorns, per_level: 0.05, is_percent: false },
    TomeDef { id: TomeId::ProjectileSpeed, name: "Projectile Speed Tome", stat: Stat::ProjectileSpeed, per_level: 0.08, is_percent: true },
    TomeDef { id: TomeId::GoldGain, name: "Gold Tome", stat: Stat::GoldGain, per_level: 0.07, is_percent: true },
];

impl TomeId {
    pub fn all() -> impl Iterator<Item = TomeId> {
        TOMES.iter().map(|t| t.id)
    }

    pub fn def(self) -> &'static TomeDef {
        &TOMES[self as usize]
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemId {
    SuckyMagnet,
    TurboSocks,
    Anvil,
    MoldyCheese,
    GiantFork,
    SpikyShield,
    LeechingCrystal,
    BossBuster,
    ForbiddenJuice,
    Battery,
    IdleJuice,
    GymSauce,
    PhantomShroud,
    CursedDoll,
    TheKey,
    EchoShard,
    Mirror,
    CreditCard,
    SoulHarvester,
    Kevin,
}

/// A chest item. Effects are permanent stat modifiers; a few items instead
/// carry behavior that the relevant system checks for by id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub effects: &'static [StatModifier],
}

use Stat as S;

#[rustfmt::skip]
pub const ITEMS: [ItemDef; 20] = [
    ItemDef { id: ItemId::SuckyMagnet, name: "Sucky Magnet", description: "+5 pickup range", rarity: Rarity::Common, effects: &[StatModifier::flat(S::PickupRange, 5.0)] },
    ItemDef { id: ItemId::TurboSocks, name: "Turbo Socks", description: "+15% Move Speed", rarity: Rarity::Common, effects: &[StatModifier::percent(S::MoveSpeed, 0.15)] },
    ItemDef { id: ItemId::Anvil, name: "Anvil", description: "+20% Damage", rarity: Rarity::Rare, effects: &[StatModifier::percent(S::Damage, 0.20)] },
    ItemDef { id: ItemId::MoldyCheese, name: "Moldy Cheese", description: "+5% Damage", rarity: Rarity::Common, effects: &[StatModifier::percent(S::Damage, 0.05)] },
    ItemDef { id: ItemId::GiantFork, name: "Giant Fork", description: "+50% Crit Damage", rarity: Rarity::Rare, effects: &[StatModifier::flat(S::CritDamage, 0.5)] },
    ItemDef { id: ItemId::SpikyShield, name: "Spiky Shield", description: "+5% Thorns, +5 Armor", rarity: Rarity::Common, effects: &[StatModifier::flat(S::Thorns, 0.05), StatModifier::flat(S::Armor, 5.0)] },
    ItemDef { id: ItemId::LeechingCrystal, name: "Leeching Crystal", description: "+10% Lifesteal", rarity: Rarity::Uncommon, effects: &[StatModifier::flat(S::Lifesteal, 0.10)] },
    ItemDef { id: ItemId::BossBuster, name: "Boss Buster", description: "+50% damage to bosses", rarity: Rarity::Rare, effects: &[StatModifier::percent(S::BossDamage, 0.50)] },
    ItemDef { id: ItemId::ForbiddenJuice, name: "Forbidden Juice", description: "+25% Crit Damage, -10% Max HP", rarity: Rarity::Epic, effects: &[StatModifier::flat(S::CritDamage, 0.25), StatModifier::percent(S::MaxHp, -0.10)] },
    ItemDef { id: ItemId::Battery, name: "Battery", description: "+10% Attack Speed", rarity: Rarity::Common, effects: &[StatModifier::percent(S::AttackSpeed, 0.10)] },
    ItemDef { id: ItemId::IdleJuice, name: "Idle Juice", description: "+100% Damage while standing still", rarity: Rarity::Epic, effects: &[StatModifier::percent(S::IdleDamage, 1.0)] },
    ItemDef { id: ItemId::GymSauce, name: "Gym Sauce", description: "+20 Max HP", rarity: Rarity::Common, effects: &[StatModifier::flat(S::MaxHp, 20.0)] },
    ItemDef { id: ItemId::PhantomShroud, name: "Phantom Shroud", description: "+15% Evasion", rarity: Rarity::Rare, effects: &[StatModifier::flat(S::Evasion, 0.15)] },
    ItemDef { id: ItemId::CursedDoll, name: "Cursed Doll", description: "+30% Damage", rarity: Rarity::Epic, effects: &[StatModifier::percent(S::Damage, 0.30)] },
    ItemDef { id: ItemId::TheKey, name: "The Key", description: "+1 item from every chest", rarity: Rarity::Uncommon, effects: &[] },
    ItemDef { id: ItemId::EchoShard, name: "Echo Shard", description: "+7% XP Gain", rarity: Rarity::Uncommon, effects: &[StatModifier::percent(S::XpGain, 0.07)] },
    ItemDef { id: ItemId::Mirror, name: "Mirror", description: "Longer invincibility when taking damage", rarity: Rarity::Rare, effects: &[] },
    ItemDef { id: ItemId::CreditCard, name: "Credit Card", description: "Free reroll on level-up", rarity: Rarity::Rare, effects: &[] },
    ItemDef { id: ItemId::SoulHarvester, name: "Soul Harvester", description: "Kills extend the timer by 0.5s", rarity: Rarity::Legendary, effects: &[] },
    ItemDef { id: ItemId::Kevin, name: "Kevin", description: "Takes 1 HP/s", rarity: Rarity::Rare, effects: &[StatModifier::flat(S::Regen, -1.0)] },
];

impl ItemId {
    pub fn all() -> impl Iterator<Item = ItemId> {
        ITEMS.iter().map(|i| i.id)
    }

    pub fn def(self) -> &'static ItemDef {
        &ITEMS[self as usize]
    }
}

// ---------------------------------------------------------------------------
// Shrine boosts
// ---------------------------------------------------------------------------

/// One possible reward of a fully charged shrine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShrineBoost {
    pub modifier: StatModifier,
    pub label: &'static str,
}

#[rustfmt::skip]
pub const SHRINE_BOOSTS: [ShrineBoost; 10] = [
    ShrineBoost { modifier: StatModifier::percent(S::Damage, 0.10), label: "+10% Damage" },
    ShrineBoost { modifier: StatModifier::percent(S::MoveSpeed, 0.08), label: "+8% Move Speed" },
    ShrineBoost { modifier: StatModifier::percent(S::MaxHp, 0.10), label: "+10% Max HP" },
    ShrineBoost { modifier: StatModifier::percent(S::AttackSpeed, 0.06), label: "+6% Attack Speed" },
    ShrineBoost { modifier: StatModifier::flat(S::Crit, 0.05), label: "+5% Crit Chance" },
    ShrineBoost { modifier: StatModifier::flat(S::Regen, 1.0), label: "+1 HP/s Regen" },
    ShrineBoost { modifier: StatModifier::percent(S::Armor, 0.05), label: "+5% Armor" },
    ShrineBoost { modifier: StatModifier::flat(S::Evasion, 0.03), label: "+3% Evasion" },
    ShrineBoost { modifier: StatModifier::flat(S::PickupRange, 2.0), label: "+2 Pickup Range" },
    ShrineBoost { modifier: StatModifier::percent(S::XpGain, 0.10), label: "+10% XP Gain" },
];
