//! Domain types for a battle

mod creature;
mod element;
mod side;
mod stats;

pub use creature::{Creature, DamageMultiplier, RosterEntry};
pub use element::Element;
pub use side::{ROSTER_SIZE, Side, SideState};
pub use stats::BaseStats;
