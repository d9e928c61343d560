//! Headless run of the simulation.
//!
//! Usage: `sim_harness [CONFIG_JSON] [SECONDS]`
//!
//! Runs a session with an idle player for the given number of seconds of
//! simulated time (default 60), taking the first offered choice on every
//! level-up, then prints a summary, quest progress and the final state hash. Set
//! `RUST_LOG=info` to follow the run.

use std::cell::Cell;
use std::rc::Rc;

use anyhow::Context;
use swarmfall_engine::prelude::*;
use swarmfall_engine::progression::quests::QuestTracker;
use swarmfall_engine::progression::upgrades;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            SimConfig::from_json_str(&json)?
        }
        None => SimConfig::default(),
    };
    let seconds: f64 = match args.next() {
        Some(s) => s.parse().with_context(|| format!("invalid duration {s:?}"))?,
        None => 60.0,
    };

    let mut tick_loop = TickLoop::standard(config)?;
    let damage_events = Rc::new(Cell::new(0u64));
    {
        let counter = Rc::clone(&damage_events);
        let events = &mut tick_loop.sim_mut().events;
        events.subscribe(EventKind::EntityDamaged, move |_| {
            counter.set(counter.get() + 1);
            Reaction::Continue
        });
        events.subscribe(EventKind::PlayerLevelUp, |_| Reaction::Pause);
    }
    let quests = QuestTracker::attach(&mut tick_loop.sim_mut().events);

    let steps = (seconds / tick_loop.sim().config.fixed_dt).round() as u64;
    let mut ran = 0;
    while ran < steps && !tick_loop.is_run_over() {
        ran += tick_loop.run_steps(steps - ran);
        if tick_loop.is_paused() {
            let sim = tick_loop.sim_mut();
            if let Some(&choice) = upgrades::roll_level_up_choices(sim).first() {
                upgrades::apply_choice(sim, choice)?;
                tracing::info!(?choice, "level-up choice applied");
            }
            tick_loop.resume();
        }
    }

    let sim = tick_loop.sim();
    quests.observe(&sim.state);
    let p = &sim.state.player;
    println!("ticks:         {}", sim.state.time.ticks);
    println!("run over:      {}", sim.state.run_over);
    println!("level:         {}", p.level);
    println!("kills:         {}", p.kills);
    println!("gold:          {}", p.gold);
    println!("weapons:       {:?}", p.weapons.iter().map(|w| (w.weapon.key(), w.level)).collect::<Vec<_>>());
    println!("items:         {}", p.items.len());
    println!("entities:      {}", sim.world.entity_count());
    println!("damage events: {}", damage_events.get());
    println!("quests:        {} done, {} reward gold", quests.completed_count(), quests.reward_gold());
    println!("state hash:    {}", tick_loop.state_hash()?);
    Ok(())
}
