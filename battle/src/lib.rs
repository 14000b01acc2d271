//! Battle engine and domain types for two-player creature battles.
//!
//! This crate holds all of the decision logic of a match and none of the I/O.
//!
//! # Overview
//!
//! ```text
//! pokebat-team (catalog + roster assignment)
//!        │
//!        ▼
//! pokebat-battle (domain types + round engine) ← THIS CRATE
//!        │
//!        ▼
//! pokebat-server (drives a Battle over player connections)
//! ```
//!
//! # Main Types
//!
//! ## Domain Types
//! - [`Creature`] - Immutable template: elements, [`BaseStats`], damage multipliers
//! - [`RosterEntry`] - A creature in a battle with live HP
//! - [`SideState`] - One player's roster and active creature
//! - [`Element`] - Elemental typing
//!
//! ## Engine
//! - [`Battle`] - Both sides plus the round state machine
//! - [`calculate_damage`] - The damage model
//!
//! # Example Usage
//!
//! ```ignore
//! use pokebat_battle::{Battle, SideState, Side, TurnAction};
//!
//! let mut a = SideState::new(Side::A, "ash", roster_a)?;
//! let mut b = SideState::new(Side::B, "gary", roster_b)?;
//! a.choose_starting(0)?;
//! b.choose_starting(2)?;
//!
//! let mut battle = Battle::new(a, b)?;
//! let mut rng = rand::thread_rng();
//!
//! while !battle.is_over() {
//!     let actor = battle.acting_side()?;
//!     battle.play_round(actor, TurnAction::Attack, &mut rng)?;
//! }
//! ```

pub mod engine;
pub mod error;
pub mod types;

// Re-export main types at crate root for convenience
pub use engine::{
    AttackKind, AttackReport, Battle, EndReason, FaintResolution, MIN_DAMAGE, Outcome,
    RoundResult, TurnAction, calculate_damage, raw_damage,
};
pub use error::BattleError;
pub use types::{
    BaseStats, Creature, DamageMultiplier, Element, ROSTER_SIZE, RosterEntry, Side, SideState,
};
