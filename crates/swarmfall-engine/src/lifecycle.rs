//! End-of-step bookkeeping: lifetimes, the session countdown and deferred
//! destruction.

use crate::components::{AttachedTo, DestroyFlag, Lifetime, WeaponSlot};
use crate::events::GameEvent;
use crate::sim::Sim;

/// Flag every entity whose lifetime ran out this step.
pub fn expire_lifetimes(sim: &mut Sim) {
    let dt = sim.dt();
    for e in sim.world.query::<(Lifetime,)>() {
        let Some(life) = sim.world.get_mut::<Lifetime>(e) else {
            continue;
        };
        life.remaining -= dt;
        if life.remaining <= 0.0 {
            sim.flag_destroy(e);
        }
    }
}

pub fn tick_countdown(sim: &mut Sim) {
    let clock = &mut sim.state.time;
    clock.countdown = (clock.countdown - clock.delta).max(0.0);
}

/// Despawn every flagged entity, along with the weapons it owns and the
/// zones attached to it. Must be the last system of a step.
pub fn destroy_cleanup(sim: &mut Sim) {
    let mut doomed = sim.world.query::<(DestroyFlag,)>();
    if doomed.is_empty() {
        return;
    }
    let owned = sim.world.query::<(WeaponSlot,)>().into_iter().filter(|&e| {
        sim.world.get::<WeaponSlot>(e).is_some_and(|s| doomed.contains(&s.owner))
    });
    let attached = sim.world.query::<(AttachedTo,)>().into_iter().filter(|&e| {
        sim.world.get::<AttachedTo>(e).is_some_and(|a| doomed.contains(&a.owner))
    });
    let dependents: Vec<_> = owned.chain(attached).filter(|e| !doomed.contains(e)).collect();
    doomed.extend(dependents);

    for e in doomed {
        match sim.world.despawn(e) {
            Ok(()) => sim.emit(GameEvent::EntityDespawned { entity: e }),
            Err(err) => tracing::warn!(entity = %e, error = %err, "despawn skipped"),
        }
    }
}
