//! Entity factories.
//!
//! Every gameplay entity is created here, so the set of components an
//! archetype carries is defined in exactly one place. Factories never fail:
//! they return the new id even if an optional link (e.g. the AI target) is
//! unavailable.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use rand::Rng;
use swarmfall_ecs::entity::EntityId;

use crate::components::*;
use crate::data::{CharacterId, EnemyKind, EnemyRank, WeaponId, UNLIMITED_PIERCE};
use crate::events::GameEvent;
use crate::math::yaw_of;
use crate::sim::Sim;

// ---------------------------------------------------------------------------
// Player & weapons
// ---------------------------------------------------------------------------

pub fn spawn_player(sim: &mut Sim, character: CharacterId) -> EntityId {
    let def = character.def();
    let pb = sim.config.balance.player.clone();
    let y = sim.ground(0.0, 0.0) + pb.half_height;
    sim.world
        .build()
        .with(Transform::at(0.0, y, 0.0))
        .with(Velocity::default())
        .with(Collider { radius: pb.radius, half_height: pb.half_height })
        .with(Health::new(def.base_hp, def.base_armor))
        .with(PlayerStats::default())
        .with(PlayerControlled {
            move_speed: def.base_speed,
            jump_force: pb.jump_force,
            max_jumps: pb.max_jumps,
            jumps_remaining: pb.max_jumps,
            grounded: true,
            dash_speed: pb.dash_speed,
            dash_duration: pb.dash_duration,
            dash_cooldown: pb.dash_cooldown,
            dash_cooldown_timer: 0.0,
            dash_time_left: 0.0,
            dash_dir_x: 0.0,
            dash_dir_z: 1.0,
        })
        .with(IsPlayer)
        .id()
}

/// A weapon entity at level-1 stats; `recompute_weapon_stats` applies
/// levels and player multipliers afterwards.
pub fn spawn_weapon(sim: &mut Sim, owner: EntityId, weapon: WeaponId, slot_index: usize) -> EntityId {
    let def = weapon.def();
    let tf = sim.world.get::<Transform>(owner).copied().unwrap_or(Transform::at(0.0, 0.0, 0.0));
    sim.world
        .build()
        .with(tf)
        .with(WeaponSlot { owner, slot_index })
        .with(AutoAttack {
            weapon,
            damage: def.damage,
            range: def.range,
            cooldown: def.cooldown,
            cooldown_timer: 0.0,
            pattern: def.pattern,
            knockback: def.knockback,
            projectile_count: def.projectile_count,
            projectile_speed: def.projectile_speed,
            projectile_lifetime: def.projectile_lifetime,
            projectile_size: def.projectile_size,
            pierce: def.pierce,
            chains: def.chains,
            chain_radius: def.chain_radius,
        })
        .with(IsWeapon)
        .id()
}

// ---------------------------------------------------------------------------
// Enemies
// ---------------------------------------------------------------------------

/// Spawn an enemy scaled by the difficulty tier and the player's curse, and
/// announce it.
pub fn spawn_enemy(sim: &mut Sim, kind: EnemyKind, x: f32, z: f32) -> EntityId {
    let def = kind.def();
    let tier = sim.state.tier();
    let cursed = sim
        .player()
        .and_then(|p| sim.world.get::<PlayerStats>(p))
        .map_or(0.0, |s| s.cursed);
    let health = def.health * tier.enemy_hp_mult * (1.0 + cursed);
    let damage = def.damage * tier.enemy_dmg_mult;
    let speed = def.speed * tier.enemy_speed_mult;

    let [sx, sy, sz] = def.scale;
    let half_height = sy * 0.5;
    let y = sim.ground(x, z) + half_height;
    let target = sim.player();

    let entity = sim
        .world
        .build()
        .with(Transform::at(x, y, z).with_scale(def.scale))
        .with(Velocity::default())
        .with(Collider { radius: sx.max(sz) * 0.5, half_height })
        .with(Health::new(health, def.armor))
        .with(DamageOnContact::new(damage, 0.0, UNLIMITED_PIERCE))
        .with(EnemyType { kind })
        .with(IsEnemy)
        .with_if(def.rank == EnemyRank::Boss, IsBoss)
        .with_if(def.rank == EnemyRank::MiniBoss, IsMiniBoss)
        .id();

    if let Some(target) = target {
        sim.attach(
            entity,
            AIFollow {
                target,
                speed,
                behavior: def.behavior,
                preferred_distance: def.preferred_distance,
                orbit_angle: 0.0,
            },
        );
    }
    if let Some(profile) = def.melee {
        sim.attach(entity, EnemyAttack::new(profile));
    }
    if let Some(ranged) = def.ranged {
        sim.attach(
            entity,
            EnemyRangedAttack {
                cooldown: ranged.cooldown,
                timer: ranged.cooldown,
                damage: ranged.damage * tier.enemy_dmg_mult,
                projectile_speed: ranged.projectile_speed,
                kind: ranged.kind,
                min_range: ranged.min_range,
            },
        );
    }
    if !def.phase_thresholds.is_empty() {
        sim.attach(entity, BossPhase::default());
    }

    sim.emit(GameEvent::EnemySpawned { entity, kind });
    if def.rank != EnemyRank::Normal {
        tracing::info!(kind = def.key, %entity, "boss spawned");
        sim.emit(GameEvent::BossSpawned { entity, kind });
    }
    entity
}

// ---------------------------------------------------------------------------
// Player projectiles & zones
// ---------------------------------------------------------------------------

/// Parameters of one moving player projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpec {
    pub origin: Vec3,
    /// Unit direction on the XZ plane.
    pub dir: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub knockback: f32,
    pub pierce: u32,
    pub lifetime: f32,
    pub size: f32,
}

pub fn spawn_projectile(sim: &mut Sim, spec: ProjectileSpec) -> EntityId {
    let mut tf = Transform::at(spec.origin.x, spec.origin.y, spec.origin.z).with_scale([spec.size; 3]);
    tf.rot_y = yaw_of(spec.dir);
    sim.world
        .build()
        .with(tf)
        .with(Velocity::from_planar(spec.dir * spec.speed))
        .with(DamageOnContact::new(spec.damage, spec.knockback, spec.pierce))
        .with(Lifetime { remaining: spec.lifetime })
        .with(IsProjectile)
        .id()
}

/// A pulsing damage zone owned by the player. `attach_to` makes it follow
/// that entity (aura); otherwise it stays where it was dropped (trail).
pub fn spawn_zone(
    sim: &mut Sim,
    at: Vec3,
    radius: f32,
    damage: f32,
    knockback: f32,
    lifetime: f32,
    attach_to: Option<EntityId>,
) -> EntityId {
    let interval = sim.config.balance.combat.zone_tick;
    let entity = sim
        .world
        .build()
        .with(Transform::at(at.x, at.y, at.z).with_scale([radius, 0.1, radius]))
        .with(DamageOnContact::new(damage, knockback, UNLIMITED_PIERCE))
        .with(AreaDamage { radius, interval, timer: 0.0 })
        .with(Lifetime { remaining: lifetime })
        .with(IsProjectile)
        .id();
    if let Some(owner) = attach_to {
        sim.attach(entity, AttachedTo { owner });
    }
    entity
}

// ---------------------------------------------------------------------------
// Enemy projectiles & zones
// ---------------------------------------------------------------------------

const ENEMY_PROJECTILE_LIFETIME: f32 = 3.0;
const ENEMY_HOMING_LIFETIME: f32 = 5.0;
const POISON_CLOUD_RADIUS: f32 = 1.5;
const POISON_CLOUD_LIFETIME: f32 = 3.0;
const BOSS_SLAM_LIFETIME: f32 = 1.0;

fn enemy_projectile(sim: &mut Sim, at: Vec3, velocity: Vec2, damage: f32, pierce: u32, lifetime: f32) -> EntityId {
    let mut tf = Transform::at(at.x, at.y, at.z);
    tf.rot_y = yaw_of(velocity);
    sim.world
        .build()
        .with(tf)
        .with(Velocity::from_planar(velocity))
        .with(DamageOnContact::new(damage, 0.0, pierce))
        .with(Lifetime { remaining: lifetime })
        .with(IsEnemyProjectile)
        .id()
}

pub fn spawn_enemy_bolt(sim: &mut Sim, at: Vec3, dir: Vec2, damage: f32, speed: f32) -> EntityId {
    enemy_projectile(sim, at, dir * speed, damage, 1, ENEMY_PROJECTILE_LIFETIME)
}

/// A bolt that steers toward the player at a capped turn rate.
pub fn spawn_enemy_homing(sim: &mut Sim, at: Vec3, dir: Vec2, damage: f32, speed: f32) -> EntityId {
    let turn_rate = sim.config.balance.combat.enemy_homing_turn_rate;
    let entity = enemy_projectile(sim, at, dir * speed, damage, 1, ENEMY_HOMING_LIFETIME);
    sim.attach(entity, Homing { target: None, turn_rate });
    entity
}

fn enemy_zone(sim: &mut Sim, at: Vec3, damage: f32, radius: f32, lifetime: f32) -> EntityId {
    let entity = enemy_projectile(sim, at, Vec2::ZERO, damage, UNLIMITED_PIERCE, lifetime);
    sim.attach(entity, AreaDamage { radius, interval: 0.0, timer: 0.0 });
    if let Some(tf) = sim.world.get_mut::<Transform>(entity) {
        tf.scale = [radius, 0.1, radius];
    }
    entity
}

/// Lingering poison centered on `at`.
pub fn spawn_poison_cloud(sim: &mut Sim, at: Vec3, damage: f32) -> EntityId {
    enemy_zone(sim, at, damage, POISON_CLOUD_RADIUS, POISON_CLOUD_LIFETIME)
}

/// Short-lived ground slam.
pub fn spawn_boss_slam(sim: &mut Sim, at: Vec3, damage: f32, radius: f32) -> EntityId {
    enemy_zone(sim, at, damage, radius, BOSS_SLAM_LIFETIME)
}

// ---------------------------------------------------------------------------
// Pickups & props
// ---------------------------------------------------------------------------

/// One XP gem with a small random burst velocity.
pub fn spawn_xp_gem(sim: &mut Sim, at: Vec3, amount: u32) -> EntityId {
    let lifetime = sim.config.balance.xp.gem_lifetime;
    let velocity = Velocity {
        x: sim.rng.gen_range(-1.5..1.5),
        y: sim.rng.gen_range(3.0..5.0),
        z: sim.rng.gen_range(-1.5..1.5),
    };
    sim.world
        .build()
        .with(Transform::at(at.x, at.y, at.z).with_scale([0.3; 3]))
        .with(velocity)
        .with(XpValue { amount: amount as f32 })
        .with(Lifetime { remaining: lifetime })
        .with(IsPickup)
        .with(IsXpGem)
        .id()
}

pub fn spawn_shrine(sim: &mut Sim, x: f32, z: f32) -> EntityId {
    let ib = &sim.config.balance.interactables;
    let interactable = Interactable {
        range: ib.shrine_range,
        charge_time: ib.shrine_charge_time,
        charge_progress: 0.0,
        activated: false,
    };
    let collider = Collider { radius: 0.5, half_height: 0.75 };
    let y = sim.ground(x, z) + collider.half_height;
    sim.world
        .build()
        .with(Transform::at(x, y, z))
        .with(collider)
        .with(interactable)
        .with(IsShrine)
        .id()
}

pub fn spawn_chest(sim: &mut Sim, x: f32, z: f32) -> EntityId {
    let interactable = Interactable {
        range: sim.config.balance.interactables.chest_range,
        charge_time: 0.0,
        charge_progress: 0.0,
        activated: false,
    };
    let collider = Collider { radius: 0.4, half_height: 0.3 };
    let y = sim.ground(x, z) + collider.half_height;
    sim.world
        .build()
        .with(Transform::at(x, y, z))
        .with(collider)
        .with(interactable)
        .with(IsChest)
        .id()
}

pub fn spawn_portal(sim: &mut Sim, x: f32, z: f32) -> EntityId {
    let y = sim.ground(x, z);
    sim.world.build().with(Transform::at(x, y, z).with_scale([2.0, 3.0, 2.0])).with(IsPortal).id()
}

/// Scatter the session's shrines and chests over the map.
pub fn spawn_interactables(sim: &mut Sim) {
    let ib = sim.config.balance.interactables.clone();
    for _ in 0..ib.shrine_count {
        let p = random_ring_point(sim, ib.shrine_min_distance, ib.map_radius);
        spawn_shrine(sim, p.x, p.y);
    }
    for _ in 0..ib.chest_count {
        let p = random_ring_point(sim, ib.chest_min_distance, ib.map_radius);
        spawn_chest(sim, p.x, p.y);
    }
}

/// Uniform angle, uniform distance in `[min, max]` around the origin.
fn random_ring_point(sim: &mut Sim, min: f32, max: f32) -> Vec2 {
    let angle = sim.rng.gen_range(0.0..TAU);
    let dist = if max > min { sim.rng.gen_range(min..max) } else { min };
    Vec2::from_angle(angle) * dist
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
