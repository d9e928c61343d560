//! Fixed-timestep frame scheduler.
//!
//! The [`TickLoop`] owns the [`Sim`] and an ordered list of named systems.
//! The presentation layer calls [`TickLoop::advance`] once per rendered
//! frame with the wall-clock time since the previous call. The elapsed time
//! is clamped, added to an accumulator, and drained in fixed steps; the
//! remainder is reported as an interpolation fraction the simulation itself
//! never reads.
//!
//! Each fixed step:
//!
//! 1. Sets the step delta and advances the run clock.
//! 2. Starts a new event frame.
//! 3. Runs every system in registration order.
//! 4. Clears the one-shot input triggers.
//! 5. Honours any pause requested by event subscribers.
//!
//! Because system order is fixed and all randomness comes from the seeded
//! RNG inside the [`Sim`], the loop is deterministic: same configuration +
//! same input snapshots = same state.
//!
//! # Example
//!
//! ```
//! use swarmfall_engine::prelude::*;
//!
//! let mut tick_loop = TickLoop::standard(SimConfig::default()).unwrap();
//! let report = tick_loop.advance(1.0);
//!
//! // One second of wall time is clamped to 0.25 s: 15 steps at 60 Hz.
//! assert!(report.clamped);
//! assert_eq!(report.steps, 15);
//! assert_eq!(tick_loop.tick_count(), 15);
//! ```

use std::time::{Duration, Instant};

use crate::ai;
use crate::combat;
use crate::config::SimConfig;
use crate::input::{self, InputSnapshot};
use crate::lifecycle;
use crate::movement;
use crate::progression;
use crate::sim::{Sim, SystemFn};
use crate::spawning;
use crate::SimError;

/// Slack when comparing the accumulator against the timestep, so that
/// exact multiples of `dt` are not lost to rounding.
const ACCUMULATOR_EPSILON: f64 = 1.0e-9;

// ---------------------------------------------------------------------------
// Diagnostics & reports
// ---------------------------------------------------------------------------

/// Timing diagnostics for the last fixed step.
#[derive(Debug, Clone, Default)]
pub struct TickDiagnostics {
    /// Wall-clock time per system, in execution order.
    pub system_times: Vec<(String, Duration)>,
    pub total_time: Duration,
}

/// What one call to [`TickLoop::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Fixed steps executed.
    pub steps: u32,
    /// Leftover fraction of a step, in `[0, 1)`, for render interpolation.
    pub alpha: f64,
    /// `true` if the frame time exceeded the clamp.
    pub clamped: bool,
}

// ---------------------------------------------------------------------------
// RegisteredSystem
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct RegisteredSystem {
    name: String,
    func: SystemFn,
    /// Names of systems that must execute before this one.
    after: Vec<String>,
}

// ---------------------------------------------------------------------------
// TickLoop
// ---------------------------------------------------------------------------

pub struct TickLoop {
    sim: Sim,
    systems: Vec<RegisteredSystem>,
    /// Unsimulated wall time, seconds.
    accumulator: f64,
    last_diagnostics: TickDiagnostics,
}

impl TickLoop {
    /// Wrap a simulation with no systems registered.
    pub fn new(sim: Sim) -> Self {
        assert!(
            sim.config.fixed_dt > 0.0 && sim.config.fixed_dt.is_finite(),
            "fixed_dt must be positive and finite, got {}",
            sim.config.fixed_dt
        );
        Self {
            sim,
            systems: Vec::new(),
            accumulator: 0.0,
            last_diagnostics: TickDiagnostics::default(),
        }
    }

    /// Start a session from `config` with the full gameplay pipeline.
    pub fn standard(config: SimConfig) -> Result<Self, SimError> {
        Ok(Self::with_standard_systems(Sim::new(config)?))
    }

    /// Register the gameplay pipeline on an existing simulation.
    pub fn with_standard_systems(sim: Sim) -> Self {
        let mut tick_loop = Self::new(sim);
        let pipeline: [(&str, SystemFn); 22] = [
            ("player_control", input::player_control),
            ("ai_pursuit", ai::pursuit::ai_pursuit),
            ("movement", movement::integrate_velocity),
            ("collision", movement::separate_bodies),
            ("boss_phase", ai::boss::boss_phase),
            ("melee_attack", ai::melee::melee_attack),
            ("ranged_attack", ai::ranged::ranged_attack),
            ("weapon_fire", combat::weapons::weapon_fire),
            ("boomerang", ai::steering::boomerang_steering),
            ("homing", ai::steering::homing_steering),
            ("damage", combat::damage::resolve_damage),
            ("invincibility", combat::health::tick_invincibility),
            ("health", combat::health::resolve_deaths),
            ("regen", combat::health::regenerate),
            ("xp", progression::xp::collect_xp),
            ("interactables", progression::interactables::resolve_interactables),
            ("wave_spawner", spawning::waves::wave_spawner),
            ("boss_timeline", spawning::timeline::boss_timeline),
            ("final_swarm", spawning::swarm::final_swarm),
            ("lifetime", lifecycle::expire_lifetimes),
            ("countdown", lifecycle::tick_countdown),
            ("cleanup", lifecycle::destroy_cleanup),
        ];
        let mut previous: Option<&str> = None;
        for (name, func) in pipeline {
            match previous {
                Some(prev) => tick_loop.add_system_after(name, &[prev], func),
                None => tick_loop.add_system(name, func),
            }
            previous = Some(name);
        }
        tick_loop
    }

    /// Register a system to run after every system registered so far.
    ///
    /// # Panics
    ///
    /// Panics if a system with the same name is already registered.
    pub fn add_system(&mut self, name: &str, func: SystemFn) {
        self.add_system_after(name, &[], func);
    }

    /// Register a system with explicit execution dependencies.
    ///
    /// # Panics
    ///
    /// - If any system in `after` is not already registered.
    /// - If a system with this name already exists.
    /// - If adding this system would create a dependency cycle.
    pub fn add_system_after(&mut self, name: &str, after: &[&str], func: SystemFn) {
        for dep in after {
            assert!(
                self.systems.iter().any(|s| s.name == *dep),
                "system '{name}' declares dependency on '{dep}', but '{dep}' is not registered"
            );
        }
        assert!(
            !self.systems.iter().any(|s| s.name == name),
            "duplicate system name: {name:?}"
        );
        self.systems.push(RegisteredSystem {
            name: name.to_owned(),
            func,
            after: after.iter().map(|s| s.to_string()).collect(),
        });
        self.validate_system_order();
    }

    /// Depth-first search for back edges in the dependency graph.
    ///
    /// # Panics
    ///
    /// Panics if a cycle is detected.
    fn validate_system_order(&self) {
        let mut visited = vec![false; self.systems.len()];
        let mut in_stack = vec![false; self.systems.len()];

        fn dfs(systems: &[RegisteredSystem], idx: usize, visited: &mut [bool], in_stack: &mut [bool]) -> bool {
            if in_stack[idx] {
                return false;
            }
            if visited[idx] {
                return true;
            }
            visited[idx] = true;
            in_stack[idx] = true;
            for dep_name in &systems[idx].after {
                if let Some(dep_idx) = systems.iter().position(|s| s.name == *dep_name) {
                    if !dfs(systems, dep_idx, visited, in_stack) {
                        return false;
                    }
                }
            }
            in_stack[idx] = false;
            true
        }

        for i in 0..self.systems.len() {
            assert!(
                dfs(&self.systems, i, &mut visited, &mut in_stack),
                "cycle detected in system dependencies"
            );
        }
    }

    // -----------------------------------------------------------------------
    // Driving the simulation
    // -----------------------------------------------------------------------

    /// Feed one presentation frame of wall time into the accumulator and run
    /// as many fixed steps as it covers.
    pub fn advance(&mut self, frame_seconds: f64) -> FrameReport {
        let dt = self.sim.config.fixed_dt;
        let max = self.sim.config.max_frame_time;
        let frame = if frame_seconds.is_finite() { frame_seconds.max(0.0) } else { 0.0 };
        let clamped = frame > max;

        let mut steps = 0;
        if !self.is_halted() {
            self.accumulator += frame.min(max);
            while self.accumulator + ACCUMULATOR_EPSILON >= dt {
                if !self.step() {
                    break;
                }
                self.accumulator = (self.accumulator - dt).max(0.0);
                steps += 1;
            }
        }

        let alpha = (self.accumulator / dt).clamp(0.0, 1.0 - f64::EPSILON);
        FrameReport { steps, alpha, clamped }
    }

    /// Run exactly one fixed step. Returns `false` (and does nothing) while
    /// paused or after the run has ended.
    pub fn step(&mut self) -> bool {
        if self.is_halted() {
            return false;
        }
        let step_start = Instant::now();
        let dt = self.sim.config.fixed_dt;

        let clock = &mut self.sim.state.time;
        clock.delta = dt as f32;
        clock.elapsed = ((clock.ticks + 1) as f64 * dt) as f32;
        self.sim.events.begin_frame();

        let mut system_times = Vec::with_capacity(self.systems.len());
        for system in &self.systems {
            let sys_start = Instant::now();
            (system.func)(&mut self.sim);
            system_times.push((system.name.clone(), sys_start.elapsed()));
        }

        self.sim.input.clear_triggers();
        self.sim.state.time.ticks += 1;
        if self.sim.events.take_pause_request() {
            tracing::debug!(tick = self.sim.state.time.ticks, "paused by event subscriber");
            self.sim.state.paused = true;
        }

        self.last_diagnostics = TickDiagnostics { system_times, total_time: step_start.elapsed() };
        true
    }

    /// Run up to `count` steps back to back; returns how many ran.
    pub fn run_steps(&mut self, count: u64) -> u64 {
        let mut ran = 0;
        while ran < count && self.step() {
            ran += 1;
        }
        ran
    }

    fn is_halted(&self) -> bool {
        self.sim.state.paused || self.sim.state.run_over
    }

    /// Suspend stepping. Accumulated time is kept for when play resumes.
    pub fn pause(&mut self) {
        self.sim.state.paused = true;
    }

    pub fn resume(&mut self) {
        self.sim.state.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.sim.state.paused
    }

    pub fn is_run_over(&self) -> bool {
        self.sim.state.run_over
    }

    /// Manual restart: a new session with the same configuration.
    pub fn restart(&mut self) -> Result<(), SimError> {
        self.accumulator = 0.0;
        self.sim.restart()
    }

    pub(crate) fn reset_accumulator(&mut self) {
        self.accumulator = 0.0;
    }

    /// Input for the next step(s); triggers are consumed by the first step.
    pub fn set_input(&mut self, input: InputSnapshot) {
        self.sim.input = input;
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    pub fn sim(&self) -> &Sim {
        &self.sim
    }

    pub fn sim_mut(&mut self) -> &mut Sim {
        &mut self.sim
    }

    pub fn into_sim(self) -> Sim {
        self.sim
    }

    pub fn tick_count(&self) -> u64 {
        self.sim.state.time.ticks
    }

    /// `tick_count × fixed_dt`; computed, never accumulated.
    pub fn sim_time(&self) -> f64 {
        self.sim.state.time.ticks as f64 * self.sim.config.fixed_dt
    }

    pub fn system_names(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn last_diagnostics(&self) -> &TickDiagnostics {
        &self.last_diagnostics
    }
}

impl std::fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TickLoop")
            .field("systems", &self.system_names())
            .field("accumulator", &self.accumulator)
            .field("sim", &self.sim)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventKind, GameEvent, Reaction};

    fn bare_loop() -> TickLoop {
        TickLoop::new(Sim::new(SimConfig::default()).unwrap())
    }

    fn noop(_: &mut Sim) {}

    fn announce_swarm(sim: &mut Sim) {
        sim.emit(GameEvent::SwarmStarted);
    }

    #[test]
    fn standard_pipeline_order() {
        let tick_loop = TickLoop::standard(SimConfig::default()).unwrap();
        let names = tick_loop.system_names();
        assert_eq!(names.first(), Some(&"player_control"));
        assert_eq!(names.last(), Some(&"cleanup"));
        let pos = |n: &str| names.iter().position(|x| *x == n).unwrap();
        assert!(pos("movement") < pos("collision"));
        assert!(pos("weapon_fire") < pos("damage"));
        assert!(pos("damage") < pos("health"));
        assert!(pos("health") < pos("boss_timeline"));
        assert!(pos("lifetime") < pos("countdown"));
    }

    #[test]
    #[should_panic(expected = "duplicate system name")]
    fn duplicate_system_name_panics() {
        let mut tick_loop = bare_loop();
        tick_loop.add_system("a", noop);
        tick_loop.add_system("a", noop);
    }

    #[test]
    #[should_panic(expected = "is not registered")]
    fn unknown_dependency_panics() {
        let mut tick_loop = bare_loop();
        tick_loop.add_system_after("b", &["missing"], noop);
    }

    #[test]
    fn long_frame_is_clamped() {
        let mut tick_loop = bare_loop();
        let report = tick_loop.advance(1.0);
        assert!(report.clamped);
        assert_eq!(report.steps, 15);
        assert!((0.0..1.0).contains(&report.alpha));
    }

    #[test]
    fn short_frames_accumulate() {
        let mut tick_loop = bare_loop();
        let mut steps = 0;
        for _ in 0..10 {
            let report = tick_loop.advance(0.01);
            assert!(!report.clamped);
            steps += report.steps;
        }
        // 0.1 s at 60 Hz.
        assert_eq!(steps, 6);
        assert_eq!(tick_loop.tick_count(), 6);
    }

    #[test]
    fn pause_suspends_accumulation() {
        let mut tick_loop = bare_loop();
        tick_loop.pause();
        assert_eq!(tick_loop.advance(0.2).steps, 0);
        assert!(!tick_loop.step());
        tick_loop.resume();
        // No time debt from the paused frames.
        assert_eq!(tick_loop.advance(0.0).steps, 0);
        assert_eq!(tick_loop.tick_count(), 0);
    }

    #[test]
    fn subscriber_pause_stops_the_frame() {
        let mut tick_loop = bare_loop();
        tick_loop.add_system("announce", announce_swarm);
        tick_loop.sim_mut().events.subscribe(EventKind::SwarmStarted, |_| Reaction::Pause);

        let report = tick_loop.advance(0.1);
        assert_eq!(report.steps, 1);
        assert!(tick_loop.is_paused());
    }

    #[test]
    fn run_over_halts_stepping() {
        let mut tick_loop = bare_loop();
        tick_loop.sim_mut().state.run_over = true;
        assert_eq!(tick_loop.run_steps(10), 0);
    }

    #[test]
    fn elapsed_time_is_computed_from_ticks() {
        let mut tick_loop = bare_loop();
        tick_loop.run_steps(600);
        assert_eq!(tick_loop.sim_time(), 600.0 * (1.0 / 60.0));
        assert!((tick_loop.sim().state.time.elapsed - 10.0).abs() < 1e-4);
    }

    #[test]
    fn one_shot_triggers_are_consumed() {
        let mut tick_loop = bare_loop();
        tick_loop.set_input(InputSnapshot { jump_pressed: true, move_x: 1.0, ..Default::default() });
        tick_loop.step();
        let input = tick_loop.sim().input;
        assert!(!input.jump_pressed);
        assert_eq!(input.move_x, 1.0);
    }

    #[test]
    fn diagnostics_cover_every_system() {
        let mut tick_loop = TickLoop::standard(SimConfig::default()).unwrap();
        tick_loop.step();
        assert_eq!(tick_loop.last_diagnostics().system_times.len(), tick_loop.system_names().len());
    }
}
