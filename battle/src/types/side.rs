//! Side (player) state

use std::fmt;

use super::creature::{Creature, RosterEntry};
use crate::error::BattleError;

/// Number of creatures each player brings to a battle
pub const ROSTER_SIZE: usize = 3;

/// One of the two seats in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    pub fn opponent(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }

    /// Position of this side in `[A, B]` pairs
    pub fn index(self) -> usize {
        match self {
            Side::A => 0,
            Side::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::A => f.write_str("A"),
            Side::B => f.write_str("B"),
        }
    }
}

/// One player's side of the battle
#[derive(Debug, Clone)]
pub struct SideState {
    pub side: Side,

    /// Player's username
    pub username: String,

    /// Roster in its original order
    roster: Vec<RosterEntry>,

    /// Unset until the player picks a starting creature
    active: Option<usize>,
}

impl SideState {
    /// Create a side from exactly [`ROSTER_SIZE`] creature templates
    pub fn new(
        side: Side,
        username: impl Into<String>,
        creatures: Vec<Creature>,
    ) -> Result<Self, BattleError> {
        if creatures.len() != ROSTER_SIZE {
            return Err(BattleError::RosterSize {
                expected: ROSTER_SIZE,
                actual: creatures.len(),
            });
        }

        Ok(Self {
            side,
            username: username.into(),
            roster: creatures.into_iter().map(RosterEntry::new).collect(),
            active: None,
        })
    }

    pub fn roster(&self) -> &[RosterEntry] {
        &self.roster
    }

    pub fn roster_len(&self) -> usize {
        self.roster.len()
    }

    /// Get a roster entry by index
    pub fn get(&self, index: usize) -> Option<&RosterEntry> {
        self.roster.get(index)
    }

    /// Get a roster entry by index mutably
    pub fn get_mut(&mut self, index: usize) -> Option<&mut RosterEntry> {
        self.roster.get_mut(index)
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Get the active creature
    pub fn active(&self) -> Option<&RosterEntry> {
        self.active.and_then(|idx| self.roster.get(idx))
    }

    /// Get the active creature mutably
    pub fn active_mut(&mut self) -> Option<&mut RosterEntry> {
        let idx = self.active?;
        self.roster.get_mut(idx)
    }

    /// Pick the starting creature. Fainted entries are rejected.
    pub fn choose_starting(&mut self, index: usize) -> Result<&RosterEntry, BattleError> {
        self.activate(index)
    }

    /// Voluntarily switch to another creature. Fainted targets are rejected.
    pub fn switch_to(&mut self, index: usize) -> Result<&RosterEntry, BattleError> {
        self.activate(index)
    }

    /// First non-fainted entry in roster order
    pub fn first_alive(&self) -> Option<usize> {
        self.roster.iter().position(RosterEntry::is_alive)
    }

    /// If the active creature has fainted, make the first non-fainted
    /// entry active. Returns the new index, or `None` when the active
    /// creature is still standing or nobody is left.
    pub fn replace_fainted_active(&mut self) -> Option<usize> {
        if self.active().is_some_and(RosterEntry::is_alive) {
            return None;
        }

        let next = self.first_alive()?;
        self.active = Some(next);
        Some(next)
    }

    fn activate(&mut self, index: usize) -> Result<&RosterEntry, BattleError> {
        let entry = self.roster.get(index).ok_or(BattleError::IndexOutOfRange {
            index,
            len: self.roster.len(),
        })?;

        if entry.is_fainted() {
            return Err(BattleError::FaintedTarget {
                index,
                name: entry.name().to_string(),
            });
        }

        self.active = Some(index);
        Ok(&self.roster[index])
    }
}
