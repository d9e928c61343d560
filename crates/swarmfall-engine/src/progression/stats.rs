//! Derived stat recomputation.
//!
//! `PlayerStats`, max health, armor, move speed and every weapon's
//! `AutoAttack` are rebuilt from scratch out of the character base, tome
//! levels, items, shrine boosts and the character passive. Nothing is
//! applied incrementally, so recomputing twice is the same as once.

use crate::components::{AutoAttack, Health, PlayerControlled, PlayerStats};
use crate::config::LoadoutBalance;
use crate::data::{CharacterId, FiringPattern, ItemId, Stat, StatModifier, WeaponDef};
use crate::combat::damage::MAX_EVASION;
use crate::sim::Sim;
use crate::state::TomeSlotState;

/// Floor for the cooldown multiplier.
pub const MIN_COOLDOWN_MULT: f32 = 0.1;

/// Everything recomputation derives for the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedStats {
    pub stats: PlayerStats,
    pub max_hp: f32,
    pub armor: f32,
    pub move_speed: f32,
}

/// Every modifier the player currently carries.
pub fn collect_modifiers(
    character: CharacterId,
    level: u32,
    tomes: &[TomeSlotState],
    items: &[ItemId],
    shrine_boosts: &[StatModifier],
) -> Vec<StatModifier> {
    let mut mods = Vec::new();
    for slot in tomes {
        let def = slot.tome.def();
        mods.push(StatModifier { stat: def.stat, value: def.per_level * slot.level as f32, is_percent: def.is_percent });
    }
    for item in items {
        mods.extend_from_slice(item.def().effects);
    }
    mods.extend_from_slice(shrine_boosts);
    let passive = character.def().passive;
    mods.push(StatModifier::percent(passive.stat, passive.per_level * level as f32));
    mods
}

/// Fold `mods` over the character base.
pub fn derive_stats(character: CharacterId, mods: &[StatModifier]) -> DerivedStats {
    let def = character.def();
    let mut s = PlayerStats::default();
    let mut attack_speed = 0.0;
    let (mut hp_flat, mut hp_pct) = (0.0, 0.0);
    let (mut armor_flat, mut armor_pct) = (0.0, 0.0);

    for m in mods {
        let v = m.value;
        match m.stat {
            Stat::Damage => s.damage_mult += v,
            Stat::AttackSpeed => attack_speed += v,
            Stat::MoveSpeed => s.speed_mult += v,
            Stat::MaxHp if m.is_percent => hp_pct += v,
            Stat::MaxHp => hp_flat += v,
            Stat::Regen => s.regen += v,
            Stat::Crit => s.crit_chance += v,
            Stat::CritDamage => s.crit_damage += v,
            Stat::Knockback => s.knockback_mult += v,
            Stat::Evasion => s.evasion += v,
            Stat::XpGain => s.xp_gain += v,
            Stat::Armor if m.is_percent => armor_pct += v,
            Stat::Armor => armor_flat += v,
            Stat::Luck => s.luck += v,
            Stat::ProjectileCount => s.projectile_count_bonus += v.max(0.0).floor() as u32,
            Stat::Cursed => s.cursed += v,
            Stat::Lifesteal => s.lifesteal += v,
            Stat::Duration => s.duration_mult += v,
            Stat::Size => s.size_mult += v,
            Stat::Thorns => s.thorns += v,
            Stat::ProjectileSpeed => s.projectile_speed_mult += v,
            Stat::GoldGain => s.gold_gain += v,
            Stat::PickupRange => s.pickup_range += v,
            Stat::BossDamage => s.boss_damage += v,
            Stat::IdleDamage => s.idle_damage += v,
            Stat::SpeedDamage => s.speed_damage += v,
            Stat::Flex => s.flex = true,
        }
    }
    s.cooldown_mult = (1.0 - attack_speed).max(MIN_COOLDOWN_MULT);
    s.evasion = s.evasion.clamp(0.0, MAX_EVASION);

    let base_armor = def.base_armor + armor_flat;
    DerivedStats {
        stats: s,
        max_hp: ((def.base_hp + hp_flat) * (1.0 + hp_pct)).max(1.0),
        armor: (base_armor * (1.0 + armor_pct) + armor_pct * 100.0).max(0.0),
        move_speed: def.base_speed * s.speed_mult.max(0.0),
    }
}

/// Level-scaled, player-modified firing stats for a weapon. The cooldown
/// timer is left at zero; callers carry the live timer over.
pub fn weapon_attack(def: &WeaponDef, level: u32, stats: &PlayerStats, loadout: &LoadoutBalance) -> AutoAttack {
    let level = level.max(1);
    let damage = def.damage * (1.0 + loadout.damage_per_level * (level - 1) as f32);
    let extra_shots = if loadout.projectile_level_step > 0 { level / loadout.projectile_level_step } else { 0 };
    let cooldown_steps = if loadout.cooldown_level_step > 0 { level / loadout.cooldown_level_step } else { 0 };
    let level_cooldown = (1.0 - loadout.cooldown_reduction).powi(cooldown_steps as i32);
    let zone = matches!(def.pattern, FiringPattern::Aura | FiringPattern::Trail);

    AutoAttack {
        weapon: def.id,
        damage,
        range: if zone { def.range * stats.size_mult } else { def.range },
        cooldown: def.cooldown * level_cooldown * stats.cooldown_mult,
        cooldown_timer: 0.0,
        pattern: def.pattern,
        knockback: def.knockback,
        projectile_count: def.projectile_count + extra_shots + stats.projectile_count_bonus,
        projectile_speed: def.projectile_speed * stats.projectile_speed_mult,
        projectile_lifetime: def.projectile_lifetime * stats.duration_mult,
        projectile_size: def.projectile_size * stats.size_mult,
        pierce: def.pierce,
        chains: def.chains,
        chain_radius: def.chain_radius,
    }
}

/// Rebuild the player's derived stats and every equipped weapon.
/// Max-HP changes keep the current/max ratio.
pub fn recompute_player_stats(sim: &mut Sim) {
    let Some(player) = sim.player() else {
        return;
    };
    let p = &sim.state.player;
    let mods = collect_modifiers(p.character, p.level, &p.tomes, &p.items, &p.shrine_boosts);
    let derived = derive_stats(p.character, &mods);

    if let Some(stats) = sim.world.get_mut::<PlayerStats>(player) {
        let flex_timer = stats.flex_timer;
        *stats = derived.stats;
        stats.flex_timer = flex_timer;
    }
    if let Some(health) = sim.world.get_mut::<Health>(player) {
        let ratio = health.ratio();
        health.max = derived.max_hp;
        health.current = ratio * derived.max_hp;
        health.armor = derived.armor;
    }
    if let Some(ctrl) = sim.world.get_mut::<PlayerControlled>(player) {
        ctrl.move_speed = derived.move_speed;
    }
    recompute_weapon_stats(sim);
}

/// Rebuild every equipped weapon's `AutoAttack` from its level and the
/// player's current stats, keeping each cooldown timer.
pub fn recompute_weapon_stats(sim: &mut Sim) {
    let Some(stats) = sim.player().and_then(|p| sim.world.get::<PlayerStats>(p)).copied() else {
        return;
    };
    let loadout = sim.config.balance.loadout.clone();
    let slots = sim.state.player.weapons.clone();
    for slot in slots {
        let Some(attack) = sim.world.get_mut::<AutoAttack>(slot.entity) else {
            tracing::warn!(weapon = slot.weapon.key(), "weapon slot has no live entity");
            continue;
        };
        let timer = attack.cooldown_timer;
        *attack = weapon_attack(slot.weapon.def(), slot.level, &stats, &loadout);
        attack.cooldown_timer = timer;
    }
}
