//! Experience, drops, derived stats, the loadout, interactables and quests.

pub mod drops;
pub mod interactables;
pub mod quests;
pub mod stats;
pub mod upgrades;
pub mod xp;
