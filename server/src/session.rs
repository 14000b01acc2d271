//! Battle session: drives one [`Battle`] over two player links.
//!
//! A session runs strictly sequentially. Each round it works out who acts,
//! waits for that player's line, applies the action and reports the result.
//! Bad input is answered with a re-prompt; a failed connection aborts the
//! session without declaring a winner.

use pokebat_battle::{
    Battle, BattleError, EndReason, FaintResolution, Outcome, RoundResult, Side, SideState,
    TurnAction,
};
use pokebat_protocol::{ClientCommand, ServerMessage, parse_selection};
use rand::Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::connection::{ConnectionError, PlayerLink};

/// Why a session stopped before a winner was decided
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Connection to player {side} failed: {source}")]
    Connection {
        side: Side,
        #[source]
        source: ConnectionError,
    },

    #[error("Battle engine error: {0}")]
    Engine(#[from] BattleError),
}

impl SessionError {
    /// Side whose connection failed, if that is what happened
    pub fn failed_side(&self) -> Option<Side> {
        match self {
            SessionError::Connection { side, .. } => Some(*side),
            SessionError::Engine(_) => None,
        }
    }
}

/// How a session ended
#[derive(Debug)]
pub enum SessionOutcome {
    /// Someone won
    Finished(Outcome),
    /// Torn down without a winner
    Aborted(SessionError),
}

impl SessionOutcome {
    pub fn winner(&self) -> Option<Side> {
        match self {
            SessionOutcome::Finished(outcome) => Some(outcome.winner),
            SessionOutcome::Aborted(_) => None,
        }
    }
}

/// One match between two connected players
pub struct BattleSession<L, R> {
    sides: [SideState; 2],
    table: Table<L, R>,
}

impl<L, R> BattleSession<L, R>
where
    L: PlayerLink,
    R: Rng + Send,
{
    /// Seat two players. Their sides must not have an active creature yet;
    /// each player picks one when the session runs.
    pub fn new(a: SideState, link_a: L, b: SideState, link_b: L, rng: R) -> Self {
        let names = [a.username.clone(), b.username.clone()];
        Self {
            sides: [a, b],
            table: Table {
                links: [link_a, link_b],
                names,
                rng,
            },
        }
    }

    /// Play the match to the end and close both connections
    pub async fn run(self) -> SessionOutcome {
        let BattleSession { sides, mut table } = self;

        info!(
            player_a = %table.names[0],
            player_b = %table.names[1],
            "Battle session starting"
        );

        let result = table.play(sides).await;
        table.finish(result).await
    }
}

/// The I/O half of a session: links, display names and the rng
struct Table<L, R> {
    links: [L; 2],
    names: [String; 2],
    rng: R,
}

impl<L, R> Table<L, R>
where
    L: PlayerLink,
    R: Rng + Send,
{
    fn name(&self, side: Side) -> &str {
        &self.names[side.index()]
    }

    async fn send(&mut self, side: Side, message: ServerMessage) -> Result<(), SessionError> {
        self.links[side.index()]
            .send(&message)
            .await
            .map_err(|source| SessionError::Connection { side, source })
    }

    async fn recv(&mut self, side: Side) -> Result<String, SessionError> {
        self.links[side.index()]
            .recv_line()
            .await
            .map_err(|source| SessionError::Connection { side, source })
    }

    async fn play(&mut self, sides: [SideState; 2]) -> Result<Outcome, SessionError> {
        let [mut a, mut b] = sides;

        for side in Side::BOTH {
            let opponent = self.name(side.opponent()).to_string();
            self.send(side, ServerMessage::BattleStarted { opponent })
                .await?;
        }

        self.choose_starting(Side::A, &mut a).await?;
        self.choose_starting(Side::B, &mut b).await?;

        let mut battle = Battle::new(a, b)?;

        loop {
            let actor = battle.acting_side()?;
            let waiting = ServerMessage::OpponentTurn {
                opponent: self.name(actor).to_string(),
            };
            self.send(actor.opponent(), waiting).await?;

            let action = self.read_action(actor, battle.side(actor)).await?;
            let result = battle.play_round(actor, action, &mut self.rng)?;
            self.report(&battle, &result).await?;

            if let Some(outcome) = result.outcome() {
                info!(
                    winner = %self.name(outcome.winner),
                    reason = ?outcome.reason,
                    rounds = battle.round(),
                    "Battle finished"
                );
                return Ok(outcome);
            }
        }
    }

    /// Show the roster and keep asking until a valid slot is picked
    async fn choose_starting(
        &mut self,
        side: Side,
        state: &mut SideState,
    ) -> Result<(), SessionError> {
        for (i, entry) in state.roster().iter().enumerate() {
            let line = ServerMessage::RosterEntry {
                index: i + 1,
                name: entry.name().to_string(),
            };
            self.send(side, line).await?;
        }
        self.send(side, ServerMessage::ChooseStarting).await?;

        loop {
            let line = self.recv(side).await?;
            let chosen = parse_selection(&line, state.roster_len())
                .map_err(|e| e.to_string())
                .and_then(|index| state.choose_starting(index).map_err(|e| e.to_string()));

            match chosen {
                Ok(entry) => {
                    debug!(player = %self.name(side), creature = %entry.name(), "Starting creature chosen");
                    return Ok(());
                }
                Err(reason) => {
                    debug!(player = %self.name(side), error = %reason, "Rejected starting choice");
                    self.send(side, ServerMessage::InvalidChoice).await?;
                }
            }
        }
    }

    /// Prompt the acting player until they commit to an action
    async fn read_action(
        &mut self,
        actor: Side,
        state: &SideState,
    ) -> Result<TurnAction, SessionError> {
        loop {
            self.send(actor, ServerMessage::TurnPrompt).await?;
            let line = self.recv(actor).await?;

            match ClientCommand::parse(&line) {
                ClientCommand::Attack => return Ok(TurnAction::Attack),
                ClientCommand::Surrender => return Ok(TurnAction::Surrender),
                ClientCommand::Switch => {
                    let index = self.choose_switch(actor, state).await?;
                    return Ok(TurnAction::Switch(index));
                }
                ClientCommand::Invalid(text) => {
                    debug!(player = %self.name(actor), input = %text, "Rejected action");
                    self.send(actor, ServerMessage::InvalidAction).await?;
                }
            }
        }
    }

    /// List the roster with HP and keep asking until a standing creature is picked
    async fn choose_switch(&mut self, actor: Side, state: &SideState) -> Result<usize, SessionError> {
        self.send(actor, ServerMessage::SwitchPrompt).await?;
        for (i, entry) in state.roster().iter().enumerate() {
            let line = ServerMessage::RosterEntryWithHp {
                index: i + 1,
                name: entry.name().to_string(),
                hp: entry.hp(),
            };
            self.send(actor, line).await?;
        }

        loop {
            let line = self.recv(actor).await?;
            let choice = parse_selection(&line, state.roster_len())
                .ok()
                .filter(|&index| state.get(index).is_some_and(|e| e.is_alive()));

            match choice {
                Some(index) => return Ok(index),
                None => {
                    debug!(player = %self.name(actor), input = %line, "Rejected switch target");
                    self.send(actor, ServerMessage::InvalidChoice).await?;
                }
            }
        }
    }

    /// Tell both players what the round did
    async fn report(&mut self, battle: &Battle, result: &RoundResult) -> Result<(), SessionError> {
        match result {
            RoundResult::Attacked { report, resolution } => {
                let attacker = report.attacker;
                let defender = report.defender();

                let hit = ServerMessage::Attacked {
                    opponent: self.name(defender).to_string(),
                    creature: report.defender_creature.clone(),
                    damage: report.damage,
                };
                self.send(attacker, hit).await?;

                let taken = ServerMessage::WasAttacked {
                    creature: report.defender_creature.clone(),
                    damage: report.damage,
                };
                self.send(defender, taken).await?;

                if let FaintResolution::Replaced(index) = resolution {
                    let next = battle
                        .side(defender)
                        .get(*index)
                        .map(|e| e.name().to_string())
                        .unwrap_or_default();
                    info!(
                        player = %self.name(defender),
                        fainted = %report.defender_creature,
                        next = %next,
                        "Active creature fainted, switched automatically"
                    );
                }
            }
            RoundResult::Switched { side, index } => {
                let creature = battle
                    .side(*side)
                    .get(*index)
                    .map(|e| e.name().to_string())
                    .unwrap_or_default();

                self.send(
                    *side,
                    ServerMessage::Switched {
                        creature: creature.clone(),
                    },
                )
                .await?;

                let notice = ServerMessage::OpponentSwitched {
                    opponent: self.name(*side).to_string(),
                    creature,
                };
                self.send(side.opponent(), notice).await?;
            }
            RoundResult::Surrendered { side } => {
                info!(player = %self.name(*side), "Player surrendered");
            }
        }

        Ok(())
    }

    /// Deliver the final messages and close both connections
    async fn finish(&mut self, result: Result<Outcome, SessionError>) -> SessionOutcome {
        let outcome = match result {
            Ok(outcome) => {
                self.notify(outcome.winner, ServerMessage::Victory).await;
                self.notify(outcome.loser(), ServerMessage::Defeat).await;
                SessionOutcome::Finished(outcome)
            }
            Err(e) => {
                warn!(error = %e, "Battle session aborted");
                for side in Side::BOTH {
                    if e.failed_side() != Some(side) {
                        self.notify(side, ServerMessage::Aborted).await;
                    }
                }
                SessionOutcome::Aborted(e)
            }
        };

        self.close_all().await;
        outcome
    }

    /// Best-effort send; failures are only logged
    async fn notify(&mut self, side: Side, message: ServerMessage) {
        if let Err(e) = self.links[side.index()].send(&message).await {
            warn!(player = %self.name(side), error = %e, "Failed to deliver final message");
        }
    }

    /// Close both links independently; one failing does not stop the other
    async fn close_all(&mut self) {
        let [a, b] = &mut self.links;
        let (closed_a, closed_b) = tokio::join!(a.close(), b.close());

        for (side, result) in [(Side::A, closed_a), (Side::B, closed_b)] {
            if let Err(e) = result {
                warn!(player = %self.name(side), error = %e, "Error closing connection");
            }
        }
    }
}

/// Reason label used in logs and summaries
pub fn describe(outcome: &SessionOutcome) -> &'static str {
    match outcome {
        SessionOutcome::Finished(Outcome {
            reason: EndReason::Surrender,
            ..
        }) => "surrender",
        SessionOutcome::Finished(Outcome {
            reason: EndReason::RosterExhausted,
            ..
        }) => "roster exhausted",
        SessionOutcome::Aborted(_) => "aborted",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedLink;
    use pokebat_battle::{BaseStats, Creature, Element};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Every creature hits for 30: attack and special attack are both 50,
    /// defense and special defense both 20.
    fn creature(name: String, hp: u32, speed: u32) -> Creature {
        Creature::new(
            name,
            vec![Element::Normal],
            BaseStats::new(hp, 50, 20, speed, 50, 20),
        )
    }

    fn side(side: Side, name: &str, hp: u32, speeds: [u32; 3]) -> SideState {
        let roster = speeds
            .iter()
            .enumerate()
            .map(|(i, &speed)| creature(format!("{}-{}", name, i + 1), hp, speed))
            .collect();
        SideState::new(side, name, roster).unwrap()
    }

    async fn play(
        a: SideState,
        a_input: &[&str],
        b: SideState,
        b_input: &[&str],
    ) -> (SessionOutcome, ScriptedLink, ScriptedLink) {
        let link_a = ScriptedLink::new("ash", a_input);
        let link_b = ScriptedLink::new("gary", b_input);
        let session = BattleSession::new(
            a,
            link_a.clone(),
            b,
            link_b.clone(),
            StdRng::seed_from_u64(7),
        );

        (session.run().await, link_a, link_b)
    }

    #[tokio::test]
    async fn test_surrender_ends_battle() {
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [10, 10, 10]),
            &["1", "surrender"],
            side(Side::B, "gary", 100, [5, 5, 5]),
            &["2"],
        )
        .await;

        match outcome {
            SessionOutcome::Finished(outcome) => {
                assert_eq!(outcome.winner, Side::B);
                assert_eq!(outcome.reason, EndReason::Surrender);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }

        assert_eq!(
            a.sent(),
            vec![
                ServerMessage::BattleStarted {
                    opponent: "gary".to_string()
                },
                ServerMessage::RosterEntry {
                    index: 1,
                    name: "ash-1".to_string()
                },
                ServerMessage::RosterEntry {
                    index: 2,
                    name: "ash-2".to_string()
                },
                ServerMessage::RosterEntry {
                    index: 3,
                    name: "ash-3".to_string()
                },
                ServerMessage::ChooseStarting,
                ServerMessage::TurnPrompt,
                ServerMessage::Defeat,
            ]
        );
        assert_eq!(
            b.count(&ServerMessage::OpponentTurn {
                opponent: "ash".to_string()
            }),
            1
        );
        assert_eq!(b.last_sent(), Some(ServerMessage::Victory));
        assert!(a.is_closed());
        assert!(b.is_closed());
    }

    #[tokio::test]
    async fn test_invalid_action_reprompts_then_roster_exhaustion_wins() {
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [10, 10, 10]),
            &["1", "dance", "ATTACK", "attack", "attack", "attack"],
            side(Side::B, "gary", 30, [5, 5, 5]),
            &["1"],
        )
        .await;

        assert_eq!(outcome.winner(), Some(Side::A));
        assert_eq!(describe(&outcome), "roster exhausted");

        assert_eq!(a.count(&ServerMessage::InvalidAction), 2);
        assert_eq!(a.count(&ServerMessage::TurnPrompt), 5);
        assert_eq!(a.last_sent(), Some(ServerMessage::Victory));
        assert_eq!(a.remaining_input(), 0);

        for name in ["gary-1", "gary-2", "gary-3"] {
            let hit = ServerMessage::Attacked {
                opponent: "gary".to_string(),
                creature: name.to_string(),
                damage: 30,
            };
            let taken = ServerMessage::WasAttacked {
                creature: name.to_string(),
                damage: 30,
            };
            assert_eq!(a.count(&hit), 1);
            assert_eq!(b.count(&taken), 1);
        }
        assert_eq!(b.count(&ServerMessage::TurnPrompt), 0);
        assert_eq!(b.last_sent(), Some(ServerMessage::Defeat));
    }

    #[tokio::test]
    async fn test_turn_order_follows_switch() {
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [30, 5, 5]),
            &["1", "switch", "2"],
            side(Side::B, "gary", 100, [20, 20, 20]),
            &["1", "surrender"],
        )
        .await;

        assert_eq!(outcome.winner(), Some(Side::A));

        assert_eq!(a.count(&ServerMessage::SwitchPrompt), 1);
        assert_eq!(
            a.count(&ServerMessage::RosterEntryWithHp {
                index: 2,
                name: "ash-2".to_string(),
                hp: 100
            }),
            1
        );
        assert_eq!(
            a.count(&ServerMessage::Switched {
                creature: "ash-2".to_string()
            }),
            1
        );
        assert_eq!(
            b.count(&ServerMessage::OpponentSwitched {
                opponent: "ash".to_string(),
                creature: "ash-2".to_string()
            }),
            1
        );

        // After the switch gary is faster and gets the next turn
        assert_eq!(b.count(&ServerMessage::TurnPrompt), 1);
        assert_eq!(
            a.count(&ServerMessage::OpponentTurn {
                opponent: "gary".to_string()
            }),
            1
        );
    }

    #[tokio::test]
    async fn test_switch_to_fainted_creature_is_rejected() {
        // ash knocks out gary-1; gary-2 comes in and outspeeds ash
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [50, 50, 50]),
            &["1", "attack", "surrender"],
            side(Side::B, "gary", 30, [10, 60, 10]),
            &["1", "switch", "1", "7", "3"],
        )
        .await;

        assert_eq!(outcome.winner(), Some(Side::B));

        assert_eq!(
            b.count(&ServerMessage::RosterEntryWithHp {
                index: 1,
                name: "gary-1".to_string(),
                hp: 0
            }),
            1
        );
        assert_eq!(b.count(&ServerMessage::InvalidChoice), 2);
        assert_eq!(
            b.count(&ServerMessage::Switched {
                creature: "gary-3".to_string()
            }),
            1
        );
        assert_eq!(a.count(&ServerMessage::TurnPrompt), 2);
        assert_eq!(b.remaining_input(), 0);
    }

    #[tokio::test]
    async fn test_invalid_starting_choice_reprompts() {
        // Picking slot 2 gives ash the fast creature, so ash moves first
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [1, 99, 1]),
            &["0", "abc", "4", "", "2", "surrender"],
            side(Side::B, "gary", 100, [50, 50, 50]),
            &["3"],
        )
        .await;

        assert_eq!(outcome.winner(), Some(Side::B));
        assert_eq!(a.count(&ServerMessage::InvalidChoice), 4);
        assert_eq!(a.count(&ServerMessage::ChooseStarting), 1);
        assert_eq!(a.count(&ServerMessage::TurnPrompt), 1);
        assert_eq!(b.count(&ServerMessage::TurnPrompt), 0);
    }

    #[tokio::test]
    async fn test_fainted_starting_choice_reprompts() {
        // ash-1 would outspeed gary but has no HP left
        let mut a = side(Side::A, "ash", 100, [99, 10, 10]);
        a.get_mut(0).unwrap().set_hp(0);

        let (outcome, a, b) = play(
            a,
            &["1", "2"],
            side(Side::B, "gary", 100, [50, 50, 50]),
            &["1", "surrender"],
        )
        .await;

        assert_eq!(outcome.winner(), Some(Side::A));
        assert_eq!(a.count(&ServerMessage::InvalidChoice), 1);
        assert_eq!(a.count(&ServerMessage::TurnPrompt), 0);
        assert_eq!(b.count(&ServerMessage::TurnPrompt), 1);
        assert_eq!(a.remaining_input(), 0);
    }

    #[tokio::test]
    async fn test_disconnect_aborts_without_winner() {
        let (outcome, a, b) = play(
            side(Side::A, "ash", 100, [10, 10, 10]),
            &["1"],
            side(Side::B, "gary", 100, [5, 5, 5]),
            &["1"],
        )
        .await;

        assert_eq!(outcome.winner(), None);
        match &outcome {
            SessionOutcome::Aborted(e) => {
                assert_eq!(e.failed_side(), Some(Side::A));
                assert!(matches!(
                    e,
                    SessionError::Connection {
                        source: ConnectionError::Closed,
                        ..
                    }
                ));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(describe(&outcome), "aborted");

        assert_eq!(b.last_sent(), Some(ServerMessage::Aborted));
        assert_eq!(a.count(&ServerMessage::Aborted), 0);
        assert_eq!(a.count(&ServerMessage::Victory), 0);
        assert_eq!(b.count(&ServerMessage::Victory), 0);
        assert!(a.is_closed());
        assert!(b.is_closed());
    }
}
