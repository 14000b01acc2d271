use thiserror::Error;

use crate::types::{Element, Side};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BattleError {
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    #[error("Creature {0} has no elements")]
    NoElements(String),

    #[error("Creature {0} has zero base HP")]
    NoHp(String),

    #[error("Creature {creature} has invalid {element} multiplier {coefficient}")]
    InvalidMultiplier {
        creature: String,
        element: Element,
        coefficient: f64,
    },

    #[error("Roster must hold {expected} creatures, got {actual}")]
    RosterSize { expected: usize, actual: usize },

    #[error("Roster index {index} is out of range (roster has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{name} (slot {index}) has fainted")]
    FaintedTarget { index: usize, name: String },

    #[error("Side {0} has no active creature")]
    NoActiveCreature(Side),
}
