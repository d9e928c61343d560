//! Damage resolution: player projectiles and zones against enemies, then
//! enemy bodies, bolts and zones against the player.
//!
//! Raw damage is built from the base amount through the attacker's
//! multipliers and the crit roll; armor mitigation is applied last with
//! `reduction = armor / (armor + 100)`.

use glam::Vec2;
use rand::Rng;
use swarmfall_ecs::prelude::*;

use crate::components::{
    AreaDamage, ChainLightning, DamageOnContact, EnemyAttack, Health, IgnoreTarget, Invincible, IsBoss,
    IsEnemy, IsEnemyProjectile, IsMiniBoss, IsProjectile, MeleeState, PlayerControlled, PlayerStats, Transform,
    Velocity,
};
use crate::config::CombatBalance;
use crate::data::ItemId;
use crate::events::GameEvent;
use crate::prefabs::{self, ProjectileSpec};
use crate::sim::Sim;

use super::nearest_enemy;

/// Upper bound on the evasion chance, whatever the stat sum.
pub const MAX_EVASION: f32 = 0.9;

/// Fraction of damage armor absorbs. Never reaches 1.
pub fn armor_reduction(armor: f32) -> f32 {
    let armor = armor.max(0.0);
    armor / (armor + 100.0)
}

pub fn mitigate(raw: f32, armor: f32) -> f32 {
    raw * (1.0 - armor_reduction(armor))
}

/// Attacker-side multipliers, sampled once per step from the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackerMods {
    pub damage_mult: f32,
    pub boss_damage: f32,
    pub idle_damage: f32,
    pub speed_damage: f32,
    pub move_speed: f32,
    /// Horizontal speed is below the idle threshold.
    pub idle: bool,
    pub crit_chance: f32,
    pub crit_damage: f32,
}

impl Default for AttackerMods {
    fn default() -> Self {
        Self {
            damage_mult: 1.0,
            boss_damage: 0.0,
            idle_damage: 0.0,
            speed_damage: 0.0,
            move_speed: 0.0,
            idle: false,
            crit_chance: 0.0,
            crit_damage: 2.0,
        }
    }
}

impl AttackerMods {
    pub fn from_stats(stats: &PlayerStats, move_speed: f32, idle: bool) -> Self {
        Self {
            damage_mult: if stats.damage_mult > 0.0 { stats.damage_mult } else { 1.0 },
            boss_damage: stats.boss_damage,
            idle_damage: stats.idle_damage,
            speed_damage: stats.speed_damage,
            move_speed,
            idle,
            crit_chance: stats.crit_chance,
            crit_damage: if stats.crit_damage > 0.0 { stats.crit_damage } else { 2.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitOutcome {
    /// Damage before armor.
    pub raw: f32,
    pub amount: f32,
    pub is_crit: bool,
}

/// Resolve one hit. `crit_roll` is a uniform sample in `[0, 1)`; it crits
/// when below the crit chance.
pub fn resolve_hit(base: f32, mods: &AttackerMods, target_is_boss: bool, target_armor: f32, crit_roll: f32) -> HitOutcome {
    let mut raw = base * mods.damage_mult;
    if target_is_boss {
        raw *= 1.0 + mods.boss_damage;
    }
    if mods.idle {
        raw *= 1.0 + mods.idle_damage;
    }
    raw *= 1.0 + mods.speed_damage * mods.move_speed;
    let is_crit = mods.crit_chance > 0.0 && crit_roll < mods.crit_chance;
    if is_crit {
        raw *= mods.crit_damage;
    }
    HitOutcome { raw, amount: mitigate(raw, target_armor), is_crit }
}

/// What happened to a hit aimed at the player.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayerDefense {
    /// Flex consumed the hit.
    Absorbed,
    Evaded,
    Hit { amount: f32, reflected: f32 },
}

/// Defensive resolution of `raw` contact damage against the player.
/// `evasion_roll` is a uniform sample in `[0, 1)`.
pub fn defend(raw: f32, stats: &PlayerStats, armor: f32, flex_window: f32, evasion_roll: f32) -> PlayerDefense {
    if stats.flex && stats.flex_timer >= flex_window {
        return PlayerDefense::Absorbed;
    }
    let evasion = stats.evasion.min(MAX_EVASION);
    if evasion > 0.0 && evasion_roll < evasion {
        return PlayerDefense::Evaded;
    }
    PlayerDefense::Hit { amount: mitigate(raw, armor), reflected: raw * stats.thorns.max(0.0) }
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

struct PlayerContext {
    entity: Option<EntityId>,
    mods: AttackerMods,
    lifesteal: f32,
    knockback_mult: f32,
}

fn player_context(sim: &Sim, combat: &CombatBalance) -> PlayerContext {
    let entity = sim.player();
    let Some((p, stats)) = entity.and_then(|p| sim.world.get::<PlayerStats>(p).map(|s| (p, *s))) else {
        return PlayerContext { entity, mods: AttackerMods::default(), lifesteal: 0.0, knockback_mult: 1.0 };
    };
    let move_speed = sim.world.get::<PlayerControlled>(p).map_or(0.0, |c| c.move_speed);
    let idle = sim.world.get::<Velocity>(p).map_or(true, |v| v.planar().length() < combat.idle_speed_threshold);
    PlayerContext {
        entity,
        mods: AttackerMods::from_stats(&stats, move_speed, idle),
        lifesteal: stats.lifesteal,
        knockback_mult: if stats.knockback_mult > 0.0 { stats.knockback_mult } else { 1.0 },
    }
}

pub fn resolve_damage(sim: &mut Sim) {
    let combat = sim.config.balance.combat.clone();
    let ctx = player_context(sim, &combat);
    player_attacks(sim, &ctx, &combat);
    if let Some(player) = ctx.entity {
        attacks_on_player(sim, player, &combat);
    }
}

fn player_attacks(sim: &mut Sim, ctx: &PlayerContext, combat: &CombatBalance) {
    let dt = sim.dt();
    let enemies = sim.world.query::<(IsEnemy, Health, Transform)>();
    let hit_sq = combat.projectile_hit_radius * combat.projectile_hit_radius;

    for p in sim.world.query::<(IsProjectile, DamageOnContact, Transform)>() {
        if sim.is_doomed(p) {
            continue;
        }
        let (Some(&contact), Some(origin)) =
            (sim.world.get::<DamageOnContact>(p), sim.world.get::<Transform>(p).map(Transform::planar))
        else {
            continue;
        };

        if let Some(&area) = sim.world.get::<AreaDamage>(p) {
            let timer = area.timer - dt;
            let pulse = timer <= 0.0;
            if let Some(a) = sim.world.get_mut::<AreaDamage>(p) {
                a.timer = if pulse { area.interval } else { timer };
            }
            if pulse {
                let radius_sq = area.radius * area.radius;
                for &enemy in &enemies {
                    if sim.is_doomed(enemy) {
                        continue;
                    }
                    let Some(pos) = sim.world.get::<Transform>(enemy).map(Transform::planar) else {
                        continue;
                    };
                    if origin.distance_squared(pos) < radius_sq {
                        hit_enemy(sim, ctx, origin, enemy, &contact);
                    }
                }
            }
            continue;
        }

        let ignore = sim.world.get::<IgnoreTarget>(p).map(|i| i.entity);
        let mut contact = contact;
        for &enemy in &enemies {
            if Some(enemy) == ignore || sim.is_doomed(enemy) {
                continue;
            }
            let Some(pos) = sim.world.get::<Transform>(enemy).map(Transform::planar) else {
                continue;
            };
            if origin.distance_squared(pos) >= hit_sq {
                continue;
            }
            hit_enemy(sim, ctx, origin, enemy, &contact);
            chain_from(sim, p, enemy, &contact);

            let exhausted = contact.register_hit();
            if let Some(c) = sim.world.get_mut::<DamageOnContact>(p) {
                *c = contact;
            }
            if exhausted {
                sim.flag_destroy(p);
                break;
            }
        }
    }
}

fn hit_enemy(sim: &mut Sim, ctx: &PlayerContext, from: Vec2, enemy: EntityId, contact: &DamageOnContact) {
    let Some(&health) = sim.world.get::<Health>(enemy) else {
        return;
    };
    let is_boss = sim.world.has::<IsBoss>(enemy) || sim.world.has::<IsMiniBoss>(enemy);
    let roll = if ctx.mods.crit_chance > 0.0 { sim.rng.gen::<f32>() } else { 1.0 };
    let outcome = resolve_hit(contact.amount, &ctx.mods, is_boss, health.armor, roll);

    if let Some(h) = sim.world.get_mut::<Health>(enemy) {
        h.current -= outcome.amount;
    }
    if ctx.lifesteal > 0.0 {
        if let Some(h) = ctx.entity.and_then(|p| sim.world.get_mut::<Health>(p)) {
            h.heal(outcome.amount * ctx.lifesteal);
        }
    }

    let Some(position) = sim.position(enemy) else {
        return;
    };
    let force = contact.knockback * ctx.knockback_mult;
    let away = Vec2::new(position.x, position.z) - from;
    if force > 0.0 && away.length_squared() > 1.0e-4 {
        if let Some(v) = sim.world.get_mut::<Velocity>(enemy) {
            let pushed = v.planar() + away.normalize() * force;
            v.set_planar(pushed);
        }
    }
    sim.emit(GameEvent::EntityDamaged { entity: enemy, amount: outcome.amount, position, is_crit: outcome.is_crit });
}

/// Spawn a follow-up bolt from `struck` toward the nearest other enemy in
/// the chain radius.
fn chain_from(sim: &mut Sim, projectile: EntityId, struck: EntityId, contact: &DamageOnContact) {
    let Some(&chain) = sim.world.get::<ChainLightning>(projectile) else {
        return;
    };
    if chain.remaining == 0 {
        return;
    }
    let Some(at) = sim.position(struck) else {
        return;
    };
    let from = Vec2::new(at.x, at.z);
    let Some((_, target)) = nearest_enemy(sim, from, chain.radius, Some(struck)) else {
        return;
    };
    let (speed, size) = match (sim.world.get::<Velocity>(projectile), sim.world.get::<Transform>(projectile)) {
        (Some(v), Some(tf)) => (v.planar().length().max(1.0), tf.scale[0]),
        _ => return,
    };
    let to = target - from;
    let dir = if to.length_squared() > 1.0e-4 { to.normalize() } else { Vec2::Y };
    let bolt = prefabs::spawn_projectile(
        sim,
        ProjectileSpec {
            origin: at,
            dir,
            speed,
            damage: contact.amount,
            knockback: contact.knockback,
            pierce: 1,
            lifetime: chain.radius / speed * 1.5,
            size,
        },
    );
    sim.attach(bolt, ChainLightning { remaining: chain.remaining - 1, radius: chain.radius });
    sim.attach(bolt, IgnoreTarget { entity: struck });
}

/// Enemy contact, then enemy bolts and zones. At most one source lands per
/// step, and nothing lands while the player is invincible.
fn attacks_on_player(sim: &mut Sim, player: EntityId, combat: &CombatBalance) {
    if sim.world.has::<Invincible>(player) {
        return;
    }
    let Some(at) = sim.world.get::<Transform>(player).map(Transform::planar) else {
        return;
    };
    let contact_sq = combat.contact_hit_radius * combat.contact_hit_radius;

    for enemy in sim.world.query::<(IsEnemy, DamageOnContact, Transform)>() {
        if sim.is_doomed(enemy) {
            continue;
        }
        // Melee attackers only hurt mid-lunge.
        if sim.world.get::<EnemyAttack>(enemy).is_some_and(|a| a.state != MeleeState::Lunge) {
            continue;
        }
        let (Some(&contact), Some(pos)) =
            (sim.world.get::<DamageOnContact>(enemy), sim.world.get::<Transform>(enemy).map(Transform::planar))
        else {
            continue;
        };
        if at.distance_squared(pos) < contact_sq {
            hit_player(sim, player, contact.amount, Some(enemy));
            return;
        }
    }

    for bolt in sim.world.query::<(IsEnemyProjectile, DamageOnContact, Transform)>() {
        if sim.is_doomed(bolt) {
            continue;
        }
        let (Some(&contact), Some(pos)) =
            (sim.world.get::<DamageOnContact>(bolt), sim.world.get::<Transform>(bolt).map(Transform::planar))
        else {
            continue;
        };
        let radius = sim.world.get::<AreaDamage>(bolt).map_or(combat.contact_hit_radius, |a| a.radius);
        if at.distance_squared(pos) >= radius * radius {
            continue;
        }
        hit_player(sim, player, contact.amount, None);
        let mut contact = contact;
        let exhausted = contact.register_hit();
        if let Some(c) = sim.world.get_mut::<DamageOnContact>(bolt) {
            *c = contact;
        }
        if exhausted {
            sim.flag_destroy(bolt);
        }
        return;
    }
}

/// Apply `raw` damage to the player. Every outcome, including an evaded or
/// absorbed hit, grants invincibility frames.
pub fn hit_player(sim: &mut Sim, player: EntityId, raw: f32, attacker: Option<EntityId>) {
    let (Some(&stats), Some(&health)) = (sim.world.get::<PlayerStats>(player), sim.world.get::<Health>(player)) else {
        return;
    };
    let pb = &sim.config.balance.player;
    let flex_window = pb.flex_window;
    let mut iframes = pb.invincibility_time;
    if sim.state.player.has_item(ItemId::Mirror) {
        iframes *= pb.mirror_invincibility_mult;
    }
    let roll = if stats.evasion > 0.0 { sim.rng.gen::<f32>() } else { 1.0 };

    match defend(raw, &stats, health.armor, flex_window, roll) {
        PlayerDefense::Absorbed => {
            tracing::debug!("flex absorbed a hit");
        }
        PlayerDefense::Evaded => {
            tracing::trace!("hit evaded");
        }
        PlayerDefense::Hit { amount, reflected } => {
            if let Some(h) = sim.world.get_mut::<Health>(player) {
                h.current -= amount;
            }
            if let Some(attacker) = attacker.filter(|_| reflected > 0.0) {
                if let Some(h) = sim.world.get_mut::<Health>(attacker) {
                    h.current -= reflected;
                }
                if let Some(position) = sim.position(attacker) {
                    sim.emit(GameEvent::EntityDamaged { entity: attacker, amount: reflected, position, is_crit: false });
                }
            }
            if let Some(position) = sim.position(player) {
                sim.emit(GameEvent::EntityDamaged { entity: player, amount, position, is_crit: false });
            }
        }
    }
    if let Some(s) = sim.world.get_mut::<PlayerStats>(player) {
        s.flex_timer = 0.0;
    }
    sim.attach(player, Invincible { remaining: iframes });
}
