//! Run snapshots and BLAKE3 state hashing.
//!
//! A [`SimSnapshot`] holds everything that determines how a run continues:
//! the ECS world, the per-run [`WorldState`], the RNG stream and the pending
//! input. Its `hash` is the BLAKE3 hex digest of that content serialized as
//! JSON, so two runs with equal hashes are in the same state.
//!
//! ```
//! use swarmfall_engine::prelude::*;
//!
//! let mut tick_loop = TickLoop::standard(SimConfig::default()).unwrap();
//! tick_loop.run_steps(30);
//! let snapshot = tick_loop.capture_snapshot().unwrap();
//! assert_eq!(snapshot.hash.len(), 64);
//!
//! tick_loop.run_steps(30);
//! tick_loop.restore_from_snapshot(&snapshot).unwrap();
//! assert_eq!(tick_loop.tick_count(), 30);
//! assert_eq!(tick_loop.state_hash().unwrap(), snapshot.hash);
//! ```
//!
//! Not captured: the configuration (restore into a simulation built from
//! the same [`SimConfig`](crate::config::SimConfig)), event subscriptions,
//! the terrain and registered systems.

use anyhow::Context;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use swarmfall_ecs::snapshot::WorldSnapshot;

use crate::input::InputSnapshot;
use crate::sim::Sim;
use crate::state::WorldState;
use crate::tick::TickLoop;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub world: WorldSnapshot,
    pub state: WorldState,
    pub rng: Pcg32,
    pub input: InputSnapshot,
    /// BLAKE3 hex digest of the fields above.
    pub hash: String,
}

#[derive(Serialize)]
struct HashableState<'a> {
    world: &'a WorldSnapshot,
    state: &'a WorldState,
    rng: &'a Pcg32,
    input: &'a InputSnapshot,
}

fn compute_hash(world: &WorldSnapshot, state: &WorldState, rng: &Pcg32, input: &InputSnapshot) -> anyhow::Result<String> {
    let bytes = serde_json::to_vec(&HashableState { world, state, rng, input })
        .context("serializing simulation state")?;
    Ok(blake3::hash(&bytes).to_hex().to_string())
}

impl Sim {
    pub fn capture_snapshot(&self) -> anyhow::Result<SimSnapshot> {
        let world = self.world.capture_snapshot().context("capturing ECS world")?;
        let hash = compute_hash(&world, &self.state, &self.rng, &self.input)?;
        Ok(SimSnapshot { world, state: self.state.clone(), rng: self.rng.clone(), input: self.input, hash })
    }

    /// Digest of the current state; equal digests mean equal runs.
    pub fn state_hash(&self) -> anyhow::Result<String> {
        Ok(self.capture_snapshot()?.hash)
    }

    /// Replace the run with `snapshot` after checking its hash. On error
    /// the simulation is left untouched.
    pub fn restore_from_snapshot(&mut self, snapshot: &SimSnapshot) -> anyhow::Result<()> {
        let expected = compute_hash(&snapshot.world, &snapshot.state, &snapshot.rng, &snapshot.input)?;
        if expected != snapshot.hash {
            anyhow::bail!(
                "snapshot hash mismatch: recorded {} but recomputed {expected}; the snapshot was modified",
                snapshot.hash
            );
        }
        self.world
            .restore_snapshot(snapshot.world.clone())
            .context("restoring ECS world from snapshot")?;
        self.state = snapshot.state.clone();
        self.rng = snapshot.rng.clone();
        self.input = snapshot.input;
        self.events.begin_frame();
        tracing::debug!(tick = self.state.time.ticks, "simulation restored from snapshot");
        Ok(())
    }
}

impl TickLoop {
    pub fn capture_snapshot(&self) -> anyhow::Result<SimSnapshot> {
        self.sim().capture_snapshot()
    }

    pub fn state_hash(&self) -> anyhow::Result<String> {
        self.sim().state_hash()
    }

    /// Restore the simulation and drop any accumulated frame time.
    pub fn restore_from_snapshot(&mut self, snapshot: &SimSnapshot) -> anyhow::Result<()> {
        self.sim_mut().restore_from_snapshot(snapshot)?;
        self.reset_accumulator();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn same_seed_same_hash() {
        let mut a = TickLoop::standard(SimConfig::default()).unwrap();
        let mut b = TickLoop::standard(SimConfig::default()).unwrap();
        a.run_steps(120);
        b.run_steps(120);
        assert_eq!(a.state_hash().unwrap(), b.state_hash().unwrap());
    }

    #[test]
    fn different_seed_different_hash() {
        let a = Sim::new(SimConfig::default()).unwrap();
        let b = Sim::new(SimConfig { seed: 99, ..SimConfig::default() }).unwrap();
        assert_ne!(a.state_hash().unwrap(), b.state_hash().unwrap());
    }

    #[test]
    fn tampered_snapshot_is_rejected() {
        let mut sim = Sim::new(SimConfig::default()).unwrap();
        let mut snapshot = sim.capture_snapshot().unwrap();
        snapshot.state.player.gold = 9_999;
        let before = sim.state_hash().unwrap();
        let err = sim.restore_from_snapshot(&snapshot).unwrap_err();
        assert!(err.to_string().contains("hash mismatch"));
        assert_eq!(sim.state_hash().unwrap(), before);
    }
}
