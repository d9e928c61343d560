//! Enemy behavior: pursuit steering, the melee windup/lunge/cooldown state
//! machine, boss phase controllers, ranged attack cadence, and steering of
//! homing and boomerang projectiles.
//!
//! Every decision is a pure function over plain values (`pursuit_velocity`,
//! `step_melee`, `compute_phase`, `steer_toward`, ...) wrapped by a thin
//! system that reads components, calls it, and writes the result back.

pub mod boss;
pub mod melee;
pub mod pursuit;
pub mod ranged;
pub mod steering;
