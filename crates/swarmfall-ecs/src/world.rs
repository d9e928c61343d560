//! The entity/component store.
//!
//! [`World`] owns the id pool and one column per registered component type.
//! It is deliberately small: create and destroy entities, attach, read,
//! overwrite and detach components, and run set-membership queries. Systems
//! built on top keep all of their state in components or in their own
//! structures, never in the world itself.

use crate::component::{Component, ComponentRegistry, ComponentTypeId};
use crate::entity::{EntityAllocator, EntityId};
use crate::query::ComponentSet;
use crate::storage::{Column, ErasedColumn};
use crate::EcsError;

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// Entities plus their component columns.
pub struct World {
    pub(crate) allocator: EntityAllocator,
    pub(crate) registry: ComponentRegistry,
    /// Indexed by [`ComponentTypeId`].
    pub(crate) columns: Vec<Box<dyn ErasedColumn>>,
}

impl World {
    pub fn new() -> Self {
        Self {
            allocator: EntityAllocator::new(),
            registry: ComponentRegistry::new(),
            columns: Vec::new(),
        }
    }

    /// Register component type `T` under `name`, creating its column.
    ///
    /// Re-registering a type is a no-op that returns the existing id.
    pub fn register_component<T: Component>(&mut self, name: &str) -> ComponentTypeId {
        let id = self.registry.register::<T>(name);
        if id.column() == self.columns.len() {
            self.columns.push(Box::new(Column::<T>::new()));
        }
        id
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    // -- entity lifecycle ---------------------------------------------------

    /// Create an entity with no components.
    pub fn spawn(&mut self) -> EntityId {
        self.allocator.allocate()
    }

    /// Start building an entity; see [`EntityBuilder`].
    pub fn build(&mut self) -> EntityBuilder<'_> {
        let entity = self.spawn();
        EntityBuilder {
            world: self,
            entity,
        }
    }

    /// Destroy an entity and drop every component attached to it.
    pub fn despawn(&mut self, entity: EntityId) -> Result<(), EcsError> {
        if !self.allocator.deallocate(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        for column in &mut self.columns {
            column.remove_entity(entity);
        }
        Ok(())
    }

    pub fn is_alive(&self, entity: EntityId) -> bool {
        self.allocator.is_alive(entity)
    }

    pub fn entity_count(&self) -> usize {
        self.allocator.alive_count()
    }

    /// Every live entity, in slot order.
    pub fn entities(&self) -> Vec<EntityId> {
        self.allocator.iter_alive().collect()
    }

    /// Destroy every entity while keeping registrations. Generations keep
    /// advancing, so ids from before the clear stay dead.
    pub fn clear(&mut self) {
        let alive: Vec<EntityId> = self.allocator.iter_alive().collect();
        for entity in alive {
            self.allocator.deallocate(entity);
        }
        for column in &mut self.columns {
            column.clear();
        }
    }

    // -- component access ---------------------------------------------------

    fn column<T: Component>(&self) -> Option<&Column<T>> {
        let id = self.registry.lookup::<T>()?;
        self.columns[id.column()].as_any().downcast_ref::<Column<T>>()
    }

    fn column_mut<T: Component>(&mut self) -> Option<&mut Column<T>> {
        let id = self.registry.lookup::<T>()?;
        self.columns[id.column()]
            .as_any_mut()
            .downcast_mut::<Column<T>>()
    }

    /// Attach `value` to `entity`, returning the overwritten value if the
    /// entity already had one.
    pub fn insert<T: Component>(&mut self, entity: EntityId, value: T) -> Result<Option<T>, EcsError> {
        if !self.allocator.is_alive(entity) {
            return Err(EcsError::StaleEntity { entity });
        }
        match self.column_mut::<T>() {
            Some(column) => Ok(column.insert(entity, value)),
            None => Err(EcsError::UnknownComponent {
                name: std::any::type_name::<T>().to_owned(),
                registered: self.registry.describe(),
            }),
        }
    }

    /// Detach `T` from `entity`. Missing components and dead ids yield `None`.
    pub fn remove<T: Component>(&mut self, entity: EntityId) -> Option<T> {
        self.column_mut::<T>()?.remove(entity)
    }

    /// `false` for dead ids and unregistered types.
    pub fn has<T: Component>(&self, entity: EntityId) -> bool {
        self.column::<T>().is_some_and(|c| c.contains(entity))
    }

    pub fn get<T: Component>(&self, entity: EntityId) -> Option<&T> {
        self.column::<T>()?.get(entity)
    }

    pub fn get_mut<T: Component>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.column_mut::<T>()?.get_mut(entity)
    }

    /// Number of entities carrying `T`.
    pub fn count<T: Component>(&self) -> usize {
        self.column::<T>().map_or(0, Column::len)
    }

    // -- queries ------------------------------------------------------------

    /// Ids of every entity carrying all components in `S`, in slot order.
    pub fn query<S: ComponentSet>(&self) -> Vec<EntityId> {
        let Some(ids) = S::type_ids(&self.registry) else {
            return Vec::new();
        };
        let columns: Vec<&dyn ErasedColumn> =
            ids.iter().map(|id| self.columns[id.column()].as_ref()).collect();
        // Drive iteration from the smallest column.
        let Some(driver) = columns.iter().min_by_key(|c| c.len()) else {
            return Vec::new();
        };
        let mut matched: Vec<EntityId> = driver
            .owners()
            .iter()
            .copied()
            .filter(|&e| columns.iter().all(|c| c.contains(e)))
            .collect();
        matched.sort_unstable_by_key(|e| e.index());
        matched
    }

    /// First match of a query, in slot order.
    pub fn first<S: ComponentSet>(&self) -> Option<EntityId> {
        self.query::<S>().into_iter().next()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// EntityBuilder
// ---------------------------------------------------------------------------

/// Fluent construction of a freshly spawned entity.
///
/// The entity exists as soon as the builder is created. Attaching an
/// unregistered component type is logged and skipped rather than aborting
/// the whole build.
pub struct EntityBuilder<'w> {
    world: &'w mut World,
    entity: EntityId,
}

impl EntityBuilder<'_> {
    pub fn with<T: Component>(self, value: T) -> Self {
        if let Err(err) = self.world.insert(self.entity, value) {
            tracing::warn!(entity = %self.entity, error = %err, "component skipped while building entity");
        }
        self
    }

    /// Attach `value` only when `cond` holds.
    pub fn with_if<T: Component>(self, cond: bool, value: T) -> Self {
        if cond {
            self.with(value)
        } else {
            self
        }
    }

    pub fn id(self) -> EntityId {
        self.entity
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Transform {
        x: f32,
        z: f32,
    }

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Health {
        current: f32,
        max: f32,
    }

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct DestroyFlag;

    #[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Unregistered;

    fn setup_world() -> World {
        let mut world = World::new();
        world.register_component::<Transform>("transform");
        world.register_component::<Health>("health");
        world.register_component::<DestroyFlag>("destroy_flag");
        world
    }

    // -- 1. Attach / read / overwrite ---------------------------------------

    #[test]
    fn insert_then_get() {
        let mut world = setup_world();
        let e = world.spawn();
        world.insert(e, Transform { x: 1.0, z: 2.0 }).unwrap();
        assert_eq!(world.get::<Transform>(e), Some(&Transform { x: 1.0, z: 2.0 }));
        assert!(world.has::<Transform>(e));
        assert!(!world.has::<Health>(e));
    }

    #[test]
    fn duplicate_insert_overwrites() {
        let mut world = setup_world();
        let e = world.spawn();
        world.insert(e, Health { current: 10.0, max: 10.0 }).unwrap();
        let old = world.insert(e, Health { current: 4.0, max: 10.0 }).unwrap();
        assert_eq!(old, Some(Health { current: 10.0, max: 10.0 }));
        assert_eq!(world.get::<Health>(e).unwrap().current, 4.0);
        assert_eq!(world.count::<Health>(), 1);
    }

    #[test]
    fn get_mut_writes_through() {
        let mut world = setup_world();
        let e = world.spawn();
        world.insert(e, Health { current: 10.0, max: 10.0 }).unwrap();
        world.get_mut::<Health>(e).unwrap().current -= 3.0;
        assert_eq!(world.get::<Health>(e).unwrap().current, 7.0);
    }

    // -- 2. Errors and soft misses ------------------------------------------

    #[test]
    fn insert_on_dead_entity_is_stale() {
        let mut world = setup_world();
        let e = world.spawn();
        world.despawn(e).unwrap();
        let err = world.insert(e, DestroyFlag).unwrap_err();
        assert!(matches!(err, EcsError::StaleEntity { .. }));
    }

    #[test]
    fn insert_unregistered_reports_known_names() {
        let mut world = setup_world();
        let e = world.spawn();
        let err = world.insert(e, Unregistered).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("destroy_flag, health, transform"), "{msg}");
    }

    #[test]
    fn has_and_query_ignore_dead_ids() {
        let mut world = setup_world();
        let e = world.spawn();
        world.insert(e, DestroyFlag).unwrap();
        world.despawn(e).unwrap();
        assert!(!world.has::<DestroyFlag>(e));
        assert!(world.query::<(DestroyFlag,)>().is_empty());
        assert!(!world.has::<Unregistered>(e));
    }

    // -- 3. Destruction -----------------------------------------------------

    #[test]
    fn despawn_drops_all_components() {
        let mut world = setup_world();
        let e = world
            .build()
            .with(Transform { x: 0.0, z: 0.0 })
            .with(Health { current: 1.0, max: 1.0 })
            .id();
        world.despawn(e).unwrap();
        assert_eq!(world.count::<Transform>(), 0);
        assert_eq!(world.count::<Health>(), 0);
        assert_eq!(world.entity_count(), 0);
        assert!(world.despawn(e).is_err());
    }

    #[test]
    fn recycled_slot_does_not_inherit_components() {
        let mut world = setup_world();
        let old = world.build().with(Health { current: 5.0, max: 5.0 }).id();
        world.despawn(old).unwrap();
        let new = world.spawn();
        assert_eq!(new.index(), old.index());
        assert!(!world.has::<Health>(new));
    }

    // -- 4. Queries ---------------------------------------------------------

    #[test]
    fn query_is_slot_ordered_after_churn() {
        let mut world = setup_world();
        let ids: Vec<EntityId> = (0..6)
            .map(|i| world.build().with(Transform { x: i as f32, z: 0.0 }).id())
            .collect();
        // Removal reshuffles the dense column; query order must not care.
        world.remove::<Transform>(ids[0]);
        world.insert(ids[0], Transform { x: 0.0, z: 0.0 }).unwrap();
        let result = world.query::<(Transform,)>();
        assert_eq!(result, ids);
    }

    #[test]
    fn query_intersects_all_members() {
        let mut world = setup_world();
        let both = world
            .build()
            .with(Transform { x: 0.0, z: 0.0 })
            .with(Health { current: 1.0, max: 1.0 })
            .id();
        let _only_transform = world.build().with(Transform { x: 0.0, z: 0.0 }).id();
        assert_eq!(world.query::<(Transform, Health)>(), vec![both]);
        assert_eq!(world.first::<(Health,)>(), Some(both));
    }

    #[test]
    fn query_with_unregistered_type_is_empty() {
        let mut world = setup_world();
        world.build().with(Transform { x: 0.0, z: 0.0 }).id();
        assert!(world.query::<(Transform, Unregistered)>().is_empty());
    }

    #[test]
    fn builder_skips_unregistered_component() {
        let mut world = setup_world();
        let e = world.build().with(Unregistered).with(DestroyFlag).id();
        assert!(world.is_alive(e));
        assert!(world.has::<DestroyFlag>(e));
    }

    #[test]
    fn clear_keeps_registrations() {
        let mut world = setup_world();
        let old = world.build().with(Transform { x: 0.0, z: 0.0 }).id();
        world.clear();
        assert_eq!(world.entity_count(), 0);
        let e = world.build().with(Transform { x: 1.0, z: 1.0 }).id();
        assert!(world.has::<Transform>(e));
        // Same slot, newer generation.
        assert_eq!(e.index(), old.index());
        assert!(!world.is_alive(old));
    }
}
