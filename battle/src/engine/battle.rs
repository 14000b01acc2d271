//! Battle - the round state machine

use rand::Rng;

use super::damage::{AttackKind, calculate_damage};
use crate::error::BattleError;
use crate::types::{RosterEntry, Side, SideState};

/// An action the acting player has committed to for this round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnAction {
    Attack,
    /// Zero-based roster index
    Switch(usize),
    Surrender,
}

/// Why a battle ended with a winner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Surrender,
    RosterExhausted,
}

/// Terminal result of a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub winner: Side,
    pub reason: EndReason,
}

impl Outcome {
    pub fn loser(&self) -> Side {
        self.winner.opponent()
    }
}

/// What happened when one creature hit another
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackReport {
    pub attacker: Side,
    pub kind: AttackKind,
    pub damage: u32,
    pub attacker_creature: String,
    pub defender_creature: String,
    /// Defender HP after the hit
    pub defender_hp: u32,
}

impl AttackReport {
    pub fn defender(&self) -> Side {
        self.attacker.opponent()
    }

    pub fn fainted(&self) -> bool {
        self.defender_hp == 0
    }
}

/// Result of checking the defender after an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaintResolution {
    /// Active creature still has HP
    Standing,
    /// Active creature fainted and this roster index took its place
    Replaced(usize),
    /// Nobody left on the roster
    Exhausted,
}

/// Everything that happened during one round
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundResult {
    Attacked {
        report: AttackReport,
        resolution: FaintResolution,
    },
    Switched {
        side: Side,
        index: usize,
    },
    Surrendered {
        side: Side,
    },
}

impl RoundResult {
    /// The terminal outcome this round produced, if any
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            RoundResult::Attacked {
                report,
                resolution: FaintResolution::Exhausted,
            } => Some(Outcome {
                winner: report.attacker,
                reason: EndReason::RosterExhausted,
            }),
            RoundResult::Surrendered { side } => Some(Outcome {
                winner: side.opponent(),
                reason: EndReason::Surrender,
            }),
            _ => None,
        }
    }
}

/// A two-player battle.
///
/// Owns both sides. There is no stored turn owner: [`Battle::acting_side`]
/// recomputes who moves from the current active creatures every round.
#[derive(Debug, Clone)]
pub struct Battle {
    sides: [SideState; 2],
    round: u32,
    outcome: Option<Outcome>,
}

impl Battle {
    /// Start a battle. Both sides must already have a standing active creature.
    pub fn new(a: SideState, b: SideState) -> Result<Self, BattleError> {
        for side in [&a, &b] {
            if !side.active().is_some_and(RosterEntry::is_alive) {
                return Err(BattleError::NoActiveCreature(side.side));
            }
        }

        let mut a = a;
        let mut b = b;
        a.side = Side::A;
        b.side = Side::B;

        Ok(Self {
            sides: [a, b],
            round: 0,
            outcome: None,
        })
    }

    pub fn side(&self, side: Side) -> &SideState {
        &self.sides[side.index()]
    }

    pub fn side_mut(&mut self, side: Side) -> &mut SideState {
        &mut self.sides[side.index()]
    }

    /// Number of completed rounds
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    fn active(&self, side: Side) -> Result<&RosterEntry, BattleError> {
        self.side(side)
            .active()
            .ok_or(BattleError::NoActiveCreature(side))
    }

    /// Side whose active creature is strictly faster acts first; ties go to A
    pub fn acting_side(&self) -> Result<Side, BattleError> {
        let speed_a = self.active(Side::A)?.creature.stats.speed;
        let speed_b = self.active(Side::B)?.creature.stats.speed;

        Ok(if speed_b > speed_a { Side::B } else { Side::A })
    }

    /// Hit the opponent's active creature with the attacker's active creature.
    ///
    /// Only the defender's HP changes. Does not resolve fainting.
    pub fn attack<R: Rng + ?Sized>(
        &mut self,
        attacker: Side,
        rng: &mut R,
    ) -> Result<AttackReport, BattleError> {
        let kind = AttackKind::roll(rng);
        self.attack_with(attacker, kind)
    }

    /// [`Battle::attack`] with a fixed attack kind
    pub fn attack_with(
        &mut self,
        attacker: Side,
        kind: AttackKind,
    ) -> Result<AttackReport, BattleError> {
        let defender = attacker.opponent();
        let (damage, attacker_creature) = {
            let offense = self.active(attacker)?;
            let defense = self.active(defender)?;
            (
                calculate_damage(&offense.creature, &defense.creature, kind),
                offense.name().to_string(),
            )
        };

        let target = self
            .side_mut(defender)
            .active_mut()
            .ok_or(BattleError::NoActiveCreature(defender))?;
        let defender_hp = target.take_damage(damage);

        Ok(AttackReport {
            attacker,
            kind,
            damage,
            attacker_creature,
            defender_creature: target.name().to_string(),
            defender_hp,
        })
    }

    /// Replace a fainted active creature with the first standing one in
    /// roster order, or report that the side is out of creatures.
    pub fn resolve_faint(&mut self, defender: Side) -> FaintResolution {
        let state = self.side_mut(defender);
        if state.active().is_some_and(RosterEntry::is_alive) {
            return FaintResolution::Standing;
        }

        match state.replace_fainted_active() {
            Some(index) => FaintResolution::Replaced(index),
            None => FaintResolution::Exhausted,
        }
    }

    /// Voluntary switch. Rejects out-of-range and fainted targets.
    pub fn switch(&mut self, side: Side, index: usize) -> Result<&RosterEntry, BattleError> {
        self.side_mut(side).switch_to(index)
    }

    /// Apply one committed action for `actor` and close the round.
    ///
    /// An attack is followed by the faint check on the defending side.
    /// Errors leave the battle unchanged and do not count as a round.
    pub fn play_round<R: Rng + ?Sized>(
        &mut self,
        actor: Side,
        action: TurnAction,
        rng: &mut R,
    ) -> Result<RoundResult, BattleError> {
        let result = match action {
            TurnAction::Attack => {
                let report = self.attack(actor, rng)?;
                let resolution = self.resolve_faint(actor.opponent());
                RoundResult::Attacked { report, resolution }
            }
            TurnAction::Switch(index) => {
                self.switch(actor, index)?;
                RoundResult::Switched { side: actor, index }
            }
            TurnAction::Surrender => RoundResult::Surrendered { side: actor },
        };

        self.round += 1;
        if let Some(outcome) = result.outcome() {
            self.outcome = Some(outcome);
        }

        Ok(result)
    }
}
