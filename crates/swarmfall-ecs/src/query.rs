//! Set-membership queries.
//!
//! A query names a set of component types as a tuple and yields the ids of
//! every live entity carrying *all* of them:
//!
//! ```
//! use swarmfall_ecs::prelude::*;
//!
//! #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
//! struct Velocity { x: f32, z: f32 }
//! #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
//! struct IsEnemy;
//!
//! let mut world = World::new();
//! world.register_component::<Velocity>("velocity");
//! world.register_component::<IsEnemy>("is_enemy");
//!
//! let a = world.spawn();
//! world.insert(a, Velocity { x: 1.0, z: 0.0 }).unwrap();
//! world.insert(a, IsEnemy).unwrap();
//! let b = world.spawn();
//! world.insert(b, Velocity { x: 0.0, z: 1.0 }).unwrap();
//!
//! assert_eq!(world.query::<(Velocity, IsEnemy)>(), vec![a]);
//! assert_eq!(world.query::<(Velocity,)>(), vec![a, b]);
//! ```
//!
//! Results are owned and sorted by slot index. The order is therefore a pure
//! function of the world's contents, independent of column insertion or
//! removal history, and systems are free to mutate the world while walking
//! the returned ids.

use crate::component::{ComponentRegistry, ComponentTypeId};

/// A tuple of component types usable as a query filter.
pub trait ComponentSet {
    /// Resolve the tuple to registered ids, or `None` if any member type is
    /// unregistered (such a query can never match).
    fn type_ids(registry: &ComponentRegistry) -> Option<Vec<ComponentTypeId>>;
}

macro_rules! impl_component_set {
    ($($name:ident),+) => {
        impl<$($name: 'static),+> ComponentSet for ($($name,)+) {
            fn type_ids(registry: &ComponentRegistry) -> Option<Vec<ComponentTypeId>> {
                Some(vec![$(registry.lookup::<$name>()?),+])
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct Health(f32);
    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct IsBoss;

    #[test]
    fn unregistered_member_resolves_to_none() {
        let mut reg = ComponentRegistry::new();
        reg.register::<Health>("health");
        assert!(<(Health,)>::type_ids(&reg).is_some());
        assert!(<(Health, IsBoss)>::type_ids(&reg).is_none());
    }

    #[test]
    fn ids_follow_tuple_order() {
        let mut reg = ComponentRegistry::new();
        let boss = reg.register::<IsBoss>("is_boss");
        let health = reg.register::<Health>("health");
        assert_eq!(<(Health, IsBoss)>::type_ids(&reg), Some(vec![health, boss]));
    }
}
