//! Swarmfall Engine -- deterministic simulation core of a wave-survival
//! arena game.
//!
//! Builds on [`swarmfall_ecs`] with the gameplay layer: components and
//! static content tables, the fixed-timestep [`TickLoop`](tick::TickLoop)
//! running an ordered pipeline of systems (AI, combat, progression,
//! spawning), a synchronous [`EventBus`](events::EventBus) for presentation
//! layers, and BLAKE3 state hashing for determinism checks.
//!
//! Rendering, audio, raw input devices and terrain generation live outside
//! the crate. The simulation only reads an [`InputSnapshot`](input::InputSnapshot)
//! per step and a [`TerrainHeight`](terrain::TerrainHeight) query.
//!
//! # Quick Start
//!
//! ```
//! use swarmfall_engine::prelude::*;
//!
//! let mut tick_loop = TickLoop::standard(SimConfig { seed: 7, ..SimConfig::default() }).unwrap();
//! tick_loop.set_input(InputSnapshot { move_x: 1.0, ..Default::default() });
//! tick_loop.run_steps(60);
//!
//! let sim = tick_loop.sim();
//! assert_eq!(sim.state.time.ticks, 60);
//! assert!(sim.player().is_some());
//! ```

#![deny(unsafe_code)]

pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod data;
pub mod events;
pub mod input;
pub mod lifecycle;
pub mod math;
pub mod movement;
pub mod prefabs;
pub mod progression;
pub mod sim;
pub mod snapshot;
pub mod spawning;
pub mod state;
pub mod terrain;
pub mod tick;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from the few fallible boundary operations. Systems never fail;
/// they log and skip instead.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// The configuration JSON could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration parsed but holds values the simulation cannot run with.
    #[error("configuration rejected: {0}")]
    Validation(String),

    #[error("all {0} slots are full")]
    SlotsFull(&'static str),

    #[error("{0} is already at max level")]
    MaxLevel(String),

    #[error("no {kind} in slot {index}")]
    UnknownSlot { kind: &'static str, index: usize },

    /// The operation needs a live player entity.
    #[error("no live player")]
    NoPlayer,
}

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the ECS crate for convenience.
pub use swarmfall_ecs;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use swarmfall_ecs::prelude::*;

    pub use crate::config::SimConfig;
    pub use crate::events::{EventBus, EventKind, GameEvent, PickupKind, Reaction, SubscriptionId};
    pub use crate::input::InputSnapshot;
    pub use crate::progression::upgrades::LevelUpChoice;
    pub use crate::sim::{Sim, SystemFn};
    pub use crate::snapshot::SimSnapshot;
    pub use crate::state::WorldState;
    pub use crate::terrain::{FlatTerrain, TerrainHeight};
    pub use crate::tick::{FrameReport, TickDiagnostics, TickLoop};
    pub use crate::SimError;
}
