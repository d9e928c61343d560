//! Swarmfall ECS -- sparse-set entity/component store.
//!
//! Entities are generational ids drawn from a dense pool with free-list
//! reuse. Each registered component type lives in its own sparse-set column
//! keyed by entity slot, so attaching, detaching and membership checks are
//! O(1) and queries only walk entities that carry the rarest requested
//! component.
//!
//! # Quick Start
//!
//! ```
//! use swarmfall_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct Health { current: f32, max: f32 }
//!
//! #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
//! struct IsEnemy;
//!
//! let mut world = World::new();
//! world.register_component::<Health>("health");
//! world.register_component::<IsEnemy>("is_enemy");
//!
//! let goblin = world
//!     .build()
//!     .with(Health { current: 15.0, max: 15.0 })
//!     .with(IsEnemy)
//!     .id();
//!
//! world.get_mut::<Health>(goblin).unwrap().current -= 5.0;
//! assert_eq!(world.get::<Health>(goblin).unwrap().current, 10.0);
//! assert_eq!(world.query::<(Health, IsEnemy)>(), vec![goblin]);
//!
//! world.despawn(goblin).unwrap();
//! assert!(!world.has::<Health>(goblin));
//! ```

#![deny(unsafe_code)]

pub mod component;
pub mod entity;
pub mod query;
pub mod snapshot;
pub mod storage;
pub mod world;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors produced by ECS operations.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// The entity does not exist (stale generation or never allocated).
    #[error("entity {entity:?} does not exist (stale or never allocated)")]
    StaleEntity { entity: entity::EntityId },

    /// A component type was referenced that has not been registered.
    #[error("component type '{name}' not registered. Registered components: [{registered}]")]
    UnknownComponent { name: String, registered: String },

    /// A column could not be written out for a snapshot.
    #[error("failed to serialize component '{component}': {details}")]
    ComponentSerializationError { component: String, details: String },

    /// A snapshot column could not be read back.
    #[error("failed to deserialize component '{component}': {details}")]
    ComponentDeserializationError { component: String, details: String },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::component::{Component, ComponentInfo, ComponentRegistry, ComponentTypeId};
    pub use crate::entity::EntityId;
    pub use crate::query::ComponentSet;
    pub use crate::snapshot::WorldSnapshot;
    pub use crate::storage::Column;
    pub use crate::world::{EntityBuilder, World};
    pub use crate::EcsError;
}
