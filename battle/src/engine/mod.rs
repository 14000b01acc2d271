//! Round resolution and the damage model

mod battle;
mod damage;

pub use battle::{
    AttackReport, Battle, EndReason, FaintResolution, Outcome, RoundResult, TurnAction,
};
pub use damage::{AttackKind, MIN_DAMAGE, calculate_damage, raw_damage};
