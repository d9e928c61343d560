//! Gameplay components.
//!
//! Every component is a small `Copy` record; systems read a copy, compute,
//! and write back through `World::get_mut`. Zero-sized tags exist purely for
//! query membership.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use swarmfall_ecs::prelude::*;

use crate::data::{EnemyKind, EnemyProjectileKind, FiringPattern, MeleeProfile, PursuitBehavior, WeaponId, UNLIMITED_PIERCE};

// ---------------------------------------------------------------------------
// Spatial
// ---------------------------------------------------------------------------

/// Position, yaw and scale of every simulated entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Yaw in radians; 0 faces +Z.
    pub rot_y: f32,
    pub scale: [f32; 3],
}

impl Transform {
    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, rot_y: 0.0, scale: [1.0; 3] }
    }

    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// `(x, z)`.
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    pub fn set_planar(&mut self, p: Vec2) {
        self.x = p.x;
        self.z = p.y;
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Velocity {
    pub fn planar(&self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    pub fn set_planar(&mut self, v: Vec2) {
        self.x = v.x;
        self.z = v.y;
    }

    pub fn from_planar(v: Vec2) -> Self {
        Self { x: v.x, y: 0.0, z: v.y }
    }
}

/// Vertical capsule used for separation and ground snapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
    pub half_height: f32,
}

// ---------------------------------------------------------------------------
// Combat
// ---------------------------------------------------------------------------

/// `current` may dip below zero for the rest of the step in which the
/// killing blow lands; death is detected, never clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    pub armor: f32,
}

impl Health {
    pub fn new(max: f32, armor: f32) -> Self {
        Self { current: max, max, armor: armor.max(0.0) }
    }

    pub fn ratio(&self) -> f32 {
        if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        }
    }

    /// Heal without exceeding `max`.
    pub fn heal(&mut self, amount: f32) {
        self.current = (self.current + amount).min(self.max);
    }
}

/// Derived firing stats of a weapon entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutoAttack {
    pub weapon: WeaponId,
    pub damage: f32,
    pub range: f32,
    pub cooldown: f32,
    pub cooldown_timer: f32,
    pub pattern: FiringPattern,
    pub knockback: f32,
    pub projectile_count: u32,
    pub projectile_speed: f32,
    pub projectile_lifetime: f32,
    pub projectile_size: f32,
    pub pierce: u32,
    pub chains: u32,
    pub chain_radius: f32,
}

/// Weak link from a weapon entity to its owner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeaponSlot {
    pub owner: EntityId,
    pub slot_index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageOnContact {
    pub amount: f32,
    pub knockback: f32,
    pub pierce: u32,
    pub hit_count: u32,
}

impl DamageOnContact {
    pub fn new(amount: f32, knockback: f32, pierce: u32) -> Self {
        Self { amount, knockback, pierce, hit_count: 0 }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pierce != UNLIMITED_PIERCE && self.hit_count >= self.pierce
    }

    /// Count one contact hit; returns `true` once the pierce limit is reached.
    pub fn register_hit(&mut self) -> bool {
        if self.pierce != UNLIMITED_PIERCE {
            self.hit_count = (self.hit_count + 1).min(self.pierce);
        }
        self.is_exhausted()
    }
}

/// Pulsing area damage: every `interval` seconds, every valid target inside
/// `radius` takes one hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaDamage {
    pub radius: f32,
    pub interval: f32,
    pub timer: f32,
}

/// Keeps an entity glued to its owner's position (aura zones).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachedTo {
    pub owner: EntityId,
}

/// Remaining follow-up jumps of a chaining projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChainLightning {
    pub remaining: u32,
    pub radius: f32,
}

/// The enemy a chain projectile jumped from; it is never hit again.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IgnoreTarget {
    pub entity: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Invincible {
    pub remaining: f32,
}

// ---------------------------------------------------------------------------
// AI
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AIFollow {
    /// Weak reference; re-validated every tick.
    pub target: EntityId,
    pub speed: f32,
    pub behavior: PursuitBehavior,
    pub preferred_distance: f32,
    /// Orbit accumulator, radians.
    pub orbit_angle: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeleeState {
    #[default]
    Idle,
    Windup,
    Lunge,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyAttack {
    pub state: MeleeState,
    pub timer: f32,
    /// Attack direction locked on entering windup.
    pub dir_x: f32,
    pub dir_z: f32,
    pub profile: MeleeProfile,
}

impl EnemyAttack {
    pub fn new(profile: MeleeProfile) -> Self {
        Self { state: MeleeState::Idle, timer: 0.0, dir_x: 0.0, dir_z: 0.0, profile }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyRangedAttack {
    pub cooldown: f32,
    pub timer: f32,
    pub damage: f32,
    pub projectile_speed: f32,
    pub kind: EnemyProjectileKind,
    pub min_range: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BossPhase {
    pub phase: u32,
    pub attack_timer: f32,
    /// Seconds spent in the current phase.
    pub pattern_timer: f32,
    /// Attacks dispatched in the current phase.
    pub pattern_index: u32,
}

/// Turn-rate-limited steering toward `target`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Homing {
    /// `None` for enemy projectiles, which always chase the player.
    pub target: Option<EntityId>,
    /// Radians per second.
    pub turn_rate: f32,
}

/// Out-and-back arc state of a boomerang projectile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boomerang {
    pub owner: EntityId,
    pub elapsed: f32,
    pub total_life: f32,
    pub speed: f32,
    pub forward_x: f32,
    pub forward_z: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyType {
    pub kind: EnemyKind,
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// Derived player multipliers and bonuses, recomputed from the loadout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub crit_chance: f32,
    pub crit_damage: f32,
    pub evasion: f32,
    pub regen: f32,
    pub lifesteal: f32,
    pub luck: f32,
    pub xp_gain: f32,
    pub gold_gain: f32,
    pub pickup_range: f32,
    pub damage_mult: f32,
    pub speed_mult: f32,
    pub cooldown_mult: f32,
    pub knockback_mult: f32,
    pub projectile_speed_mult: f32,
    pub size_mult: f32,
    pub duration_mult: f32,
    pub projectile_count_bonus: u32,
    pub cursed: f32,
    pub thorns: f32,
    pub boss_damage: f32,
    pub idle_damage: f32,
    /// Damage bonus per unit of move speed.
    pub speed_damage: f32,
    pub flex: bool,
    /// Seconds since the player last took a hit.
    pub flex_timer: f32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            crit_chance: 0.05,
            crit_damage: 2.0,
            evasion: 0.0,
            regen: 0.0,
            lifesteal: 0.0,
            luck: 0.0,
            xp_gain: 1.0,
            gold_gain: 1.0,
            pickup_range: 3.0,
            damage_mult: 1.0,
            speed_mult: 1.0,
            cooldown_mult: 1.0,
            knockback_mult: 1.0,
            projectile_speed_mult: 1.0,
            size_mult: 1.0,
            duration_mult: 1.0,
            projectile_count_bonus: 0,
            cursed: 0.0,
            thorns: 0.0,
            boss_damage: 0.0,
            idle_damage: 0.0,
            speed_damage: 0.0,
            flex: false,
            flex_timer: 0.0,
        }
    }
}

/// Movement/jump/dash state driven by the input snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerControlled {
    pub move_speed: f32,
    pub jump_force: f32,
    pub max_jumps: u32,
    pub jumps_remaining: u32,
    pub grounded: bool,
    pub dash_speed: f32,
    pub dash_duration: f32,
    pub dash_cooldown: f32,
    pub dash_cooldown_timer: f32,
    pub dash_time_left: f32,
    pub dash_dir_x: f32,
    pub dash_dir_z: f32,
}

// ---------------------------------------------------------------------------
// Pickups & interactables
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lifetime {
    pub remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct XpValue {
    pub amount: f32,
}

/// Shrine/chest charge state. Zero `charge_time` activates on contact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interactable {
    pub range: f32,
    pub charge_time: f32,
    pub charge_progress: f32,
    pub activated: bool,
}

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

macro_rules! tags {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
            pub struct $name;
        )+
    };
}

tags!(
    IsPlayer,
    IsEnemy,
    IsBoss,
    IsMiniBoss,
    IsProjectile,
    IsEnemyProjectile,
    IsPickup,
    IsXpGem,
    IsShrine,
    IsChest,
    IsPortal,
    IsWeapon,
    /// Deferred destruction marker; cleared by despawning in the last system.
    DestroyFlag,
);

/// Register every gameplay component with `world`.
pub fn register_all(world: &mut World) {
    world.register_component::<Transform>("transform");
    world.register_component::<Velocity>("velocity");
    world.register_component::<Collider>("collider");
    world.register_component::<Health>("health");
    world.register_component::<AutoAttack>("auto_attack");
    world.register_component::<WeaponSlot>("weapon_slot");
    world.register_component::<DamageOnContact>("damage_on_contact");
    world.register_component::<AreaDamage>("area_damage");
    world.register_component::<AttachedTo>("attached_to");
    world.register_component::<ChainLightning>("chain_lightning");
    world.register_component::<IgnoreTarget>("ignore_target");
    world.register_component::<Invincible>("invincible");
    world.register_component::<AIFollow>("ai_follow");
    world.register_component::<EnemyAttack>("enemy_attack");
    world.register_component::<EnemyRangedAttack>("enemy_ranged_attack");
    world.register_component::<BossPhase>("boss_phase");
    world.register_component::<Homing>("homing");
    world.register_component::<Boomerang>("boomerang");
    world.register_component::<EnemyType>("enemy_type");
    world.register_component::<PlayerStats>("player_stats");
    world.register_component::<PlayerControlled>("player_controlled");
    world.register_component::<Lifetime>("lifetime");
    world.register_component::<XpValue>("xp_value");
    world.register_component::<Interactable>("interactable");
    world.register_component::<IsPlayer>("is_player");
    world.register_component::<IsEnemy>("is_enemy");
    world.register_component::<IsBoss>("is_boss");
    world.register_component::<IsMiniBoss>("is_mini_boss");
    world.register_component::<IsProjectile>("is_projectile");
    world.register_component::<IsEnemyProjectile>("is_enemy_projectile");
    world.register_component::<IsPickup>("is_pickup");
    world.register_component::<IsXpGem>("is_xp_gem");
    world.register_component::<IsShrine>("is_shrine");
    world.register_component::<IsChest>("is_chest");
    world.register_component::<IsPortal>("is_portal");
    world.register_component::<IsWeapon>("is_weapon");
    world.register_component::<DestroyFlag>("destroy_flag");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pierce_exhausts_exactly_on_limit() {
        let mut dmg = DamageOnContact::new(5.0, 0.0, 3);
        assert!(!dmg.register_hit());
        assert!(!dmg.register_hit());
        assert!(dmg.register_hit());
        assert_eq!(dmg.hit_count, 3);
        // Further hits never push the count past the limit.
        assert!(dmg.register_hit());
        assert_eq!(dmg.hit_count, 3);
    }

    #[test]
    fn unlimited_pierce_never_exhausts() {
        let mut dmg = DamageOnContact::new(5.0, 0.0, UNLIMITED_PIERCE);
        for _ in 0..1000 {
            assert!(!dmg.register_hit());
        }
    }

    #[test]
    fn heal_caps_at_max() {
        let mut hp = Health::new(100.0, 0.0);
        hp.current = 95.0;
        hp.heal(20.0);
        assert_eq!(hp.current, 100.0);
    }

    #[test]
    fn register_all_is_idempotent() {
        let mut world = World::new();
        register_all(&mut world);
        let count = world.registry().len();
        register_all(&mut world);
        assert_eq!(world.registry().len(), count);
    }
}
