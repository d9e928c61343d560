//! The simulation context handed to every system.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use swarmfall_ecs::prelude::*;

use crate::components::{self, Collider, DestroyFlag, Transform};
use crate::config::SimConfig;
use crate::events::{EventBus, GameEvent};
use crate::input::InputSnapshot;
use crate::prefabs;
use crate::progression::{stats, upgrades, xp};
use crate::state::WorldState;
use crate::terrain::{FlatTerrain, TerrainHeight};
use crate::SimError;

/// A system is a plain function over the whole simulation context.
pub type SystemFn = fn(&mut Sim);

/// ECS world, run state, event bus, RNG, configuration, the current input
/// snapshot and the terrain query, owned together.
pub struct Sim {
    pub world: World,
    pub state: WorldState,
    pub events: EventBus,
    pub rng: Pcg32,
    pub config: SimConfig,
    pub input: InputSnapshot,
    pub terrain: Box<dyn TerrainHeight>,
}

impl Sim {
    /// Validate `config` and start a session on flat ground.
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        Self::with_terrain(config, Box::new(FlatTerrain::default()))
    }

    pub fn with_terrain(config: SimConfig, terrain: Box<dyn TerrainHeight>) -> Result<Self, SimError> {
        config.validate()?;
        let mut world = World::new();
        components::register_all(&mut world);
        let state = fresh_state(&config);
        let mut sim = Self {
            world,
            state,
            events: EventBus::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            input: InputSnapshot::default(),
            terrain,
        };
        sim.start_session()?;
        Ok(sim)
    }

    /// Discard every entity and all run state, then start a new session with
    /// the same configuration. Event subscriptions and the RNG stream carry
    /// over, so the new run differs from the previous one.
    pub fn restart(&mut self) -> Result<(), SimError> {
        self.world.clear();
        self.state = fresh_state(&self.config);
        self.input = InputSnapshot::default();
        self.events.begin_frame();
        self.start_session()
    }

    fn start_session(&mut self) -> Result<(), SimError> {
        let character = self.config.character;
        let player = prefabs::spawn_player(self, character);
        self.state.player.entity = Some(player);
        upgrades::add_weapon(self, character.def().starting_weapon)?;
        prefabs::spawn_interactables(self);
        stats::recompute_player_stats(self);
        tracing::info!(
            seed = self.config.seed,
            character = character.def().key,
            difficulty = self.state.tier().name,
            "session started"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Helpers shared by systems
    // -----------------------------------------------------------------------

    /// Duration of the step being simulated.
    pub fn dt(&self) -> f32 {
        self.state.time.delta
    }

    /// The player entity, if it is still alive.
    pub fn player(&self) -> Option<EntityId> {
        self.state.player.entity.filter(|&e| self.world.is_alive(e))
    }

    /// Ground height under `(x, z)`.
    pub fn ground(&self, x: f32, z: f32) -> f32 {
        self.terrain.height(x, z)
    }

    /// Height an entity's origin rests at: ground plus half its collider.
    pub fn rest_height(&self, entity: EntityId, x: f32, z: f32) -> f32 {
        let half = self.world.get::<Collider>(entity).map_or(0.0, |c| c.half_height);
        self.ground(x, z) + half
    }

    /// `true` once an entity is marked for destruction this step (or is gone).
    pub fn is_doomed(&self, entity: EntityId) -> bool {
        !self.world.is_alive(entity) || self.world.has::<DestroyFlag>(entity)
    }

    /// Mark `entity` for destruction at the end of the step.
    pub fn flag_destroy(&mut self, entity: EntityId) {
        self.attach(entity, DestroyFlag);
    }

    /// Attach (or overwrite) a component, logging instead of failing when
    /// the entity is already gone.
    pub fn attach<T: Component>(&mut self, entity: EntityId, component: T) {
        if let Err(err) = self.world.insert(entity, component) {
            tracing::warn!(%entity, error = %err, "attach skipped");
        }
    }

    pub fn position(&self, entity: EntityId) -> Option<glam::Vec3> {
        self.world.get::<Transform>(entity).map(Transform::position)
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.emit(event);
    }
}

fn fresh_state(config: &SimConfig) -> WorldState {
    WorldState::new(
        config.character,
        config.difficulty,
        config.session_length,
        xp::xp_to_next_level(1, &config.balance.xp),
    )
}

impl std::fmt::Debug for Sim {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sim")
            .field("entities", &self.world.entity_count())
            .field("state", &self.state)
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{AutoAttack, IsPlayer, IsShrine, IsChest, PlayerStats};
    use crate::data::{CharacterId, WeaponId};

    #[test]
    fn new_session_spawns_player_weapon_and_interactables() {
        let sim = Sim::new(SimConfig::default()).unwrap();
        let player = sim.player().unwrap();
        assert!(sim.world.has::<IsPlayer>(player));
        assert!(sim.world.has::<PlayerStats>(player));
        assert_eq!(sim.state.player.weapons.len(), 1);
        assert_eq!(sim.state.player.weapons[0].weapon, WeaponId::Sword);
        assert!(sim.world.has::<AutoAttack>(sim.state.player.weapons[0].entity));
        assert_eq!(sim.world.count::<IsShrine>(), sim.config.balance.interactables.shrine_count);
        assert_eq!(sim.world.count::<IsChest>(), sim.config.balance.interactables.chest_count);
    }

    #[test]
    fn character_choice_sets_starting_weapon() {
        let config = SimConfig { character: CharacterId::Fox, ..SimConfig::default() };
        let sim = Sim::new(config).unwrap();
        assert_eq!(sim.state.player.weapons[0].weapon, WeaponId::Bow);
    }

    #[test]
    fn restart_resets_run_state() {
        let mut sim = Sim::new(SimConfig::default()).unwrap();
        let first_player = sim.player().unwrap();
        sim.state.player.kills = 12;
        sim.state.timeline.portal_spawned = true;
        sim.restart().unwrap();
        assert_eq!(sim.state.player.kills, 0);
        assert!(!sim.state.timeline.portal_spawned);
        assert!(!sim.world.is_alive(first_player));
        assert!(sim.player().is_some());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = SimConfig { fixed_dt: -1.0, ..SimConfig::default() };
        assert!(matches!(Sim::new(config), Err(SimError::Validation(_))));
    }
}
