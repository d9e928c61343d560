//! Sparse-set component columns.
//!
//! Each registered component type gets one [`Column<T>`]: a dense `Vec<T>`
//! of values, a parallel `Vec<EntityId>` of owners, and a sparse table that
//! maps an entity's slot index to its position in the dense arrays. Lookups
//! are O(1), iteration touches only entities that actually carry the
//! component, and removal is a swap-remove.
//!
//! Columns are stored type-erased behind [`ErasedColumn`] so the world can
//! hold them in a single `Vec` and operate on "all components of entity E"
//! (destruction, snapshots) without knowing their types.

use std::any::Any;

use crate::component::Component;
use crate::entity::EntityId;

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// Storage for a single component type.
#[derive(Debug, Clone)]
pub struct Column<T> {
    /// Slot index -> position in `dense`.
    sparse: Vec<Option<u32>>,
    dense: Vec<T>,
    owners: Vec<EntityId>,
}

impl<T> Default for Column<T> {
    fn default() -> Self {
        Self {
            sparse: Vec::new(),
            dense: Vec::new(),
            owners: Vec::new(),
        }
    }
}

impl<T> Column<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, entity: EntityId) -> Option<usize> {
        let pos = (*self.sparse.get(entity.index() as usize)?)? as usize;
        // A stale handle shares the slot index but not the generation.
        (self.owners[pos] == entity).then_some(pos)
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.position(entity).is_some()
    }

    pub fn get(&self, entity: EntityId) -> Option<&T> {
        self.position(entity).map(|pos| &self.dense[pos])
    }

    pub fn get_mut(&mut self, entity: EntityId) -> Option<&mut T> {
        self.position(entity).map(|pos| &mut self.dense[pos])
    }

    /// Attach `value` to `entity`, returning the previous value if one was
    /// attached. Attaching twice overwrites.
    pub fn insert(&mut self, entity: EntityId, value: T) -> Option<T> {
        if let Some(pos) = self.position(entity) {
            return Some(std::mem::replace(&mut self.dense[pos], value));
        }
        let slot = entity.index() as usize;
        if slot >= self.sparse.len() {
            self.sparse.resize(slot + 1, None);
        }
        self.sparse[slot] = Some(self.dense.len() as u32);
        self.dense.push(value);
        self.owners.push(entity);
        None
    }

    pub fn remove(&mut self, entity: EntityId) -> Option<T> {
        let pos = self.position(entity)?;
        self.sparse[entity.index() as usize] = None;
        let last = self.dense.len() - 1;
        if pos != last {
            let moved = self.owners[last];
            self.sparse[moved.index() as usize] = Some(pos as u32);
        }
        self.owners.swap_remove(pos);
        Some(self.dense.swap_remove(pos))
    }

    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Owners in dense (insertion/swap) order.
    pub fn owners(&self) -> &[EntityId] {
        &self.owners
    }

    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.owners.iter().copied().zip(self.dense.iter())
    }

    pub fn clear(&mut self) {
        self.sparse.clear();
        self.dense.clear();
        self.owners.clear();
    }
}

// ---------------------------------------------------------------------------
// ErasedColumn
// ---------------------------------------------------------------------------

/// Type-erased view of a [`Column`], used by the world for whole-entity
/// operations and snapshots.
pub(crate) trait ErasedColumn {
    fn contains(&self, entity: EntityId) -> bool;
    fn remove_entity(&mut self, entity: EntityId) -> bool;
    fn len(&self) -> usize;
    fn owners(&self) -> &[EntityId];
    fn clear(&mut self);
    /// Serialize as a list of `[entity, value]` pairs ordered by slot index.
    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error>;
    /// Replace the column contents from a value produced by [`to_json`](Self::to_json).
    fn load_json(&mut self, value: serde_json::Value) -> Result<(), serde_json::Error>;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Component> ErasedColumn for Column<T> {
    fn contains(&self, entity: EntityId) -> bool {
        Column::contains(self, entity)
    }

    fn remove_entity(&mut self, entity: EntityId) -> bool {
        self.remove(entity).is_some()
    }

    fn len(&self) -> usize {
        Column::len(self)
    }

    fn owners(&self) -> &[EntityId] {
        Column::owners(self)
    }

    fn clear(&mut self) {
        Column::clear(self)
    }

    fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        // Dense order depends on removal history; sort so equal worlds
        // serialize identically.
        let mut rows: Vec<(EntityId, &T)> = self.iter().collect();
        rows.sort_unstable_by_key(|(entity, _)| entity.index());
        serde_json::to_value(rows)
    }

    fn load_json(&mut self, value: serde_json::Value) -> Result<(), serde_json::Error> {
        let rows: Vec<(EntityId, T)> = serde_json::from_value(value)?;
        self.clear();
        for (entity, component) in rows {
            self.insert(entity, component);
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn id(index: u32) -> EntityId {
        EntityId::new(index, 0)
    }

    #[test]
    fn insert_get_and_overwrite() {
        let mut col: Column<f32> = Column::new();
        assert_eq!(col.insert(id(3), 1.0), None);
        assert_eq!(col.insert(id(3), 2.0), Some(1.0));
        assert_eq!(col.get(id(3)), Some(&2.0));
        assert_eq!(col.len(), 1);
    }

    #[test]
    fn swap_remove_keeps_sparse_table_consistent() {
        let mut col: Column<u32> = Column::new();
        for i in 0..4 {
            col.insert(id(i), i * 10);
        }
        assert_eq!(col.remove(id(1)), Some(10));
        // Slot 3 was moved into position 1.
        assert_eq!(col.get(id(3)), Some(&30));
        assert_eq!(col.get(id(1)), None);
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn stale_generation_misses() {
        let mut col: Column<u8> = Column::new();
        col.insert(EntityId::new(0, 0), 1);
        assert!(!col.contains(EntityId::new(0, 1)));
        assert_eq!(col.remove(EntityId::new(0, 1)), None);
    }

    #[test]
    fn json_roundtrip_is_index_ordered() {
        let mut col: Column<i32> = Column::new();
        col.insert(id(5), -5);
        col.insert(id(1), -1);
        let json = col.to_json().unwrap();
        assert_eq!(json[0][1], serde_json::json!(-1));

        let mut restored: Column<i32> = Column::new();
        restored.load_json(json).unwrap();
        assert_eq!(restored.get(id(5)), Some(&-5));
        assert_eq!(restored.get(id(1)), Some(&-1));
    }
}
