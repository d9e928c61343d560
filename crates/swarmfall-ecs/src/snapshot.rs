//! Whole-world snapshots.
//!
//! A [`WorldSnapshot`] is the id pool plus every column, each column keyed by
//! its registered name and serialized as index-ordered `[entity, value]`
//! pairs. Two worlds with the same contents always produce byte-identical
//! JSON, which is what the engine's state hashing relies on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::EntityAllocator;
use crate::world::World;
use crate::EcsError;

/// Serializable copy of a [`World`]'s contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub allocator: EntityAllocator,
    /// Column name -> serialized rows. `BTreeMap` keeps key order stable.
    pub columns: BTreeMap<String, serde_json::Value>,
}

impl World {
    /// Capture every live entity and component.
    pub fn capture_snapshot(&self) -> Result<WorldSnapshot, EcsError> {
        let mut columns = BTreeMap::new();
        for (idx, column) in self.columns.iter().enumerate() {
            let Some(info) = self.registry.get_info(crate::component::ComponentTypeId(idx as u32)) else {
                continue;
            };
            let rows = column
                .to_json()
                .map_err(|e| EcsError::ComponentSerializationError {
                    component: info.name.clone(),
                    details: e.to_string(),
                })?;
            columns.insert(info.name.clone(), rows);
        }
        Ok(WorldSnapshot {
            allocator: self.allocator.clone(),
            columns,
        })
    }

    /// Replace this world's contents with `snapshot`.
    ///
    /// Component types must already be registered under the same names.
    /// Columns present in the world but absent from the snapshot are left
    /// empty; snapshot columns with no registered type are rejected.
    pub fn restore_snapshot(&mut self, snapshot: WorldSnapshot) -> Result<(), EcsError> {
        for name in snapshot.columns.keys() {
            if self.registry.lookup_by_name(name).is_none() {
                return Err(EcsError::UnknownComponent {
                    name: name.clone(),
                    registered: self.registry.describe(),
                });
            }
        }

        self.clear();
        self.allocator = snapshot.allocator;
        for (name, rows) in snapshot.columns {
            let Some(id) = self.registry.lookup_by_name(&name) else {
                continue;
            };
            self.columns[id.column()]
                .load_json(rows)
                .map_err(|e| EcsError::ComponentDeserializationError {
                    component: name.clone(),
                    details: e.to_string(),
                })?;
        }
        tracing::debug!(entities = self.entity_count(), "world restored from snapshot");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Lifetime {
        remaining: f32,
    }

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct IsPickup;

    fn setup_world() -> World {
        let mut world = World::new();
        world.register_component::<Lifetime>("lifetime");
        world.register_component::<IsPickup>("is_pickup");
        world
    }

    #[test]
    fn restore_reproduces_contents_and_allocation() {
        let mut world = setup_world();
        let a = world.build().with(Lifetime { remaining: 3.0 }).with(IsPickup).id();
        let b = world.build().with(Lifetime { remaining: 1.0 }).id();
        world.despawn(a).unwrap();
        let snap = world.capture_snapshot().unwrap();

        let mut other = setup_world();
        other.restore_snapshot(snap).unwrap();
        assert_eq!(other.get::<Lifetime>(b), Some(&Lifetime { remaining: 1.0 }));
        assert!(!other.is_alive(a));
        // Both allocators hand out the same next id.
        assert_eq!(world.spawn(), other.spawn());
    }

    #[test]
    fn equal_worlds_serialize_identically() {
        let mut first = setup_world();
        let mut second = setup_world();
        let x = first.spawn();
        let y = first.spawn();
        first.insert(x, Lifetime { remaining: 2.0 }).unwrap();
        first.insert(y, Lifetime { remaining: 5.0 }).unwrap();
        // Same contents, opposite column insertion order.
        let p = second.spawn();
        let q = second.spawn();
        second.insert(q, Lifetime { remaining: 5.0 }).unwrap();
        second.insert(p, Lifetime { remaining: 2.0 }).unwrap();
        let a = serde_json::to_string(&first.capture_snapshot().unwrap()).unwrap();
        let b = serde_json::to_string(&second.capture_snapshot().unwrap()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn unknown_column_is_rejected() {
        let mut world = setup_world();
        world.build().with(IsPickup).id();
        let snap = world.capture_snapshot().unwrap();

        let mut bare = World::new();
        bare.register_component::<Lifetime>("lifetime");
        assert!(bare.restore_snapshot(snap).is_err());
    }
}
