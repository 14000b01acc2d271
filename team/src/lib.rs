//! Creature catalog loading and roster assignment.
//!
//! Both run before a battle exists: catalog problems surface at startup,
//! never mid-battle.

mod catalog;
mod error;
mod roster;

pub use catalog::{load_catalog, parse_catalog};
pub use error::TeamError;
pub use roster::{PLAYERS, assign_rosters, ensure_playable};
