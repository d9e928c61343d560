//! Component type registration.
//!
//! Every component type must be registered with a [`ComponentRegistry`]
//! before it can be attached. Registration assigns a dense
//! [`ComponentTypeId`] (the column index inside the world) and a stable name
//! used by snapshots and error messages.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Bound satisfied by every storable component.
///
/// Components are plain records: cloneable, serializable for snapshots, and
/// `'static` so their columns can be type-erased.
pub trait Component: Clone + Serialize + DeserializeOwned + 'static {}

impl<T> Component for T where T: Clone + Serialize + DeserializeOwned + 'static {}

// ---------------------------------------------------------------------------
// ComponentTypeId
// ---------------------------------------------------------------------------

/// Dense identifier of a registered component type.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub(crate) u32);

impl ComponentTypeId {
    #[inline]
    pub(crate) fn column(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ComponentTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentTypeId({})", self.0)
    }
}

// ---------------------------------------------------------------------------
// ComponentInfo
// ---------------------------------------------------------------------------

/// Metadata about a registered component type.
#[derive(Debug, Clone)]
pub struct ComponentInfo {
    pub id: ComponentTypeId,
    /// Name supplied at registration; keys the type in snapshots.
    pub name: String,
    /// `true` for zero-sized marker components (tags).
    pub is_tag: bool,
    pub type_id: TypeId,
}

// ---------------------------------------------------------------------------
// ComponentRegistry
// ---------------------------------------------------------------------------

/// Maps Rust types and names to [`ComponentTypeId`]s.
///
/// Registering the same Rust type twice returns the first id; registering a
/// second type under an already-used name panics, since snapshots would no
/// longer be able to tell the columns apart.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    by_type: HashMap<TypeId, ComponentTypeId>,
    by_name: HashMap<String, ComponentTypeId>,
    infos: Vec<ComponentInfo>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `T` under `name`, returning its id.
    ///
    /// # Panics
    ///
    /// Panics if `name` is already taken by a different type.
    pub fn register<T: Component>(&mut self, name: &str) -> ComponentTypeId {
        let rust_type = TypeId::of::<T>();
        if let Some(&existing) = self.by_type.get(&rust_type) {
            return existing;
        }
        assert!(
            !self.by_name.contains_key(name),
            "component name '{name}' is already registered for a different type"
        );

        let id = ComponentTypeId(self.infos.len() as u32);
        self.infos.push(ComponentInfo {
            id,
            name: name.to_owned(),
            is_tag: std::mem::size_of::<T>() == 0,
            type_id: rust_type,
        });
        self.by_type.insert(rust_type, id);
        self.by_name.insert(name.to_owned(), id);
        id
    }

    /// Look up the id of a registered Rust type.
    pub fn lookup<T: 'static>(&self) -> Option<ComponentTypeId> {
        self.by_type.get(&TypeId::of::<T>()).copied()
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<ComponentTypeId> {
        self.by_name.get(name).copied()
    }

    pub fn get_info(&self, id: ComponentTypeId) -> Option<&ComponentInfo> {
        self.infos.get(id.column())
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    /// Registered names, sorted.
    pub fn registered_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.by_name.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Comma-separated registered names, for error messages.
    pub(crate) fn describe(&self) -> String {
        self.registered_names().join(", ")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
