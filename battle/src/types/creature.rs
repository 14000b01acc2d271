//! Creature templates and per-battle roster entries

use super::element::Element;
use super::stats::BaseStats;
use crate::error::BattleError;

/// Incoming-damage coefficient for one attacking element
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageMultiplier {
    pub element: Element,
    pub coefficient: f64,
}

/// Immutable creature template from the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct Creature {
    pub name: String,

    /// Elemental types; the first entry is used when this creature attacks
    pub elements: Vec<Element>,

    pub stats: BaseStats,

    /// Damage received when hit by an element. Missing elements mean 1.0.
    pub damage_taken: Vec<DamageMultiplier>,
}

impl Creature {
    pub fn new(name: impl Into<String>, elements: Vec<Element>, stats: BaseStats) -> Self {
        Self {
            name: name.into(),
            elements,
            stats,
            damage_taken: Vec::new(),
        }
    }

    /// Add an incoming-damage multiplier
    pub fn with_multiplier(mut self, element: Element, coefficient: f64) -> Self {
        self.damage_taken.push(DamageMultiplier {
            element,
            coefficient,
        });
        self
    }

    /// Element used when this creature attacks
    pub fn attacking_element(&self) -> Option<Element> {
        self.elements.first().copied()
    }

    /// Multiplier applied to damage received from `element`.
    /// Only the first matching entry counts.
    pub fn multiplier_against(&self, element: Element) -> Option<f64> {
        self.damage_taken
            .iter()
            .find(|m| m.element == element)
            .map(|m| m.coefficient)
    }

    /// Reject templates a battle cannot use
    pub fn validate(&self) -> Result<(), BattleError> {
        if self.elements.is_empty() {
            return Err(BattleError::NoElements(self.name.clone()));
        }

        if self.stats.hp == 0 {
            return Err(BattleError::NoHp(self.name.clone()));
        }

        if let Some(bad) = self
            .damage_taken
            .iter()
            .find(|m| !m.coefficient.is_finite() || m.coefficient < 0.0)
        {
            return Err(BattleError::InvalidMultiplier {
                creature: self.name.clone(),
                element: bad.element,
                coefficient: bad.coefficient,
            });
        }

        Ok(())
    }
}

/// A creature taking part in one battle, with live HP
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub creature: Creature,

    /// Always in `0..=creature.stats.hp`
    hp: u32,
}

impl RosterEntry {
    /// Copy a template into a fresh entry at full HP
    pub fn new(creature: Creature) -> Self {
        let hp = creature.stats.hp;
        Self { creature, hp }
    }

    pub fn name(&self) -> &str {
        &self.creature.name
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.creature.stats.hp
    }

    /// Set live HP, clamped to the base HP
    pub fn set_hp(&mut self, hp: u32) {
        self.hp = hp.min(self.max_hp());
    }

    pub fn is_fainted(&self) -> bool {
        self.hp == 0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_fainted()
    }

    /// Subtract damage, stopping at zero. Returns the remaining HP.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount);
        self.hp
    }
}

impl From<Creature> for RosterEntry {
    fn from(creature: Creature) -> Self {
        Self::new(creature)
    }
}
