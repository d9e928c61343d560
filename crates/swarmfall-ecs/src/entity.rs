//! Entity handles and the id pool they are drawn from.
//!
//! An [`EntityId`] carries no data of its own. It packs a slot *index* in the
//! low 32 bits and a *generation* in the high 32 bits; every time a slot is
//! released its generation is bumped, so a handle kept past its entity's
//! destruction (an AI target, a weapon owner) is detected as stale instead of
//! silently aliasing whatever entity reuses the slot.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// A generational entity handle.
///
/// Layout: `[generation: u32 | index: u32]`
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Build a handle from a slot index and generation.
    #[inline]
    pub fn new(index: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | index as u64)
    }

    /// Slot index (low 32 bits). Column lookups are keyed by this.
    #[inline]
    pub fn index(self) -> u32 {
        self.0 as u32
    }

    /// Generation (high 32 bits).
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }

    #[inline]
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index(), self.generation())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

/// Dense id pool with free-list reuse.
///
/// Released slots are queued FIFO, so a slot freed during a heavy churn frame
/// (dozens of projectiles expiring at once) is not immediately handed back
/// out; generations spread across the whole pool instead of piling up on one
/// hot slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityAllocator {
    /// Current generation per slot.
    generations: Vec<u32>,
    /// Whether the slot currently holds a live entity.
    alive: Vec<bool>,
    /// Released slots waiting for reuse, oldest first.
    free_indices: VecDeque<u32>,
    /// Number of live entities.
    live: usize,
}

impl EntityAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a fresh id, reusing the oldest released slot when one exists.
    pub fn allocate(&mut self) -> EntityId {
        self.live += 1;
        if let Some(index) = self.free_indices.pop_front() {
            // Generation was already bumped when the slot was released.
            self.alive[index as usize] = true;
            EntityId::new(index, self.generations[index as usize])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(0);
            self.alive.push(true);
            EntityId::new(index, 0)
        }
    }

    /// Release `id`, bumping its slot generation.
    ///
    /// Returns `false` (and changes nothing) if `id` is already dead or stale.
    pub fn deallocate(&mut self, id: EntityId) -> bool {
        if !self.is_alive(id) {
            return false;
        }
        let idx = id.index() as usize;
        self.alive[idx] = false;
        self.generations[idx] = self.generations[idx].wrapping_add(1);
        self.free_indices.push_back(id.index());
        self.live -= 1;
        true
    }

    /// `true` if `id` names a live entity with a matching generation.
    pub fn is_alive(&self, id: EntityId) -> bool {
        let idx = id.index() as usize;
        idx < self.generations.len() && self.alive[idx] && self.generations[idx] == id.generation()
    }

    /// Number of live entities.
    pub fn alive_count(&self) -> usize {
        self.live
    }

    /// Number of slots ever created (live or free).
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Live ids in ascending slot order.
    pub fn iter_alive(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(idx, _)| EntityId::new(idx as u32, self.generations[idx]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
