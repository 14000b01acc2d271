//! Waiting room: pairs authenticated players and starts their battles

use std::sync::Arc;

use pokebat_battle::{Creature, Side, SideState};
use pokebat_protocol::ServerMessage;
use pokebat_team::assign_rosters;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{error, info, warn};

use crate::connection::PlayerLink;
use crate::session::{BattleSession, SessionOutcome, describe};

/// An authenticated connection waiting for a match
pub struct Player<L> {
    pub username: String,
    pub link: L,
}

impl<L> Player<L> {
    pub fn new(username: impl Into<String>, link: L) -> Self {
        Self {
            username: username.into(),
            link,
        }
    }
}

enum Event<L> {
    Arrived(Option<Player<L>>),
    Ended(Result<SessionOutcome, JoinError>),
}

/// Pairs players in arrival order. The first to arrive plays side A.
pub struct Lobby<L> {
    catalog: Arc<[Creature]>,
    waiting: Option<Player<L>>,
    sessions: JoinSet<SessionOutcome>,
    completed: usize,
}

impl<L> Lobby<L>
where
    L: PlayerLink + 'static,
{
    pub fn new(catalog: Arc<[Creature]>) -> Self {
        Self {
            catalog,
            waiting: None,
            sessions: JoinSet::new(),
            completed: 0,
        }
    }

    /// Take players from `arrivals` until the channel closes, then wait for
    /// every running battle to end. Returns how many battles were played.
    pub async fn run(mut self, mut arrivals: mpsc::Receiver<Player<L>>) -> usize {
        loop {
            let event = tokio::select! {
                player = arrivals.recv() => Event::Arrived(player),
                Some(joined) = self.sessions.join_next(), if !self.sessions.is_empty() => {
                    Event::Ended(joined)
                }
            };

            match event {
                Event::Arrived(Some(player)) => self.admit(player).await,
                Event::Arrived(None) => break,
                Event::Ended(joined) => self.reap(joined),
            }
        }

        if let Some(mut player) = self.waiting.take() {
            info!(player = %player.username, "Lobby closing, dropping waiting player");
            if let Err(e) = player.link.close().await {
                warn!(player = %player.username, error = %e, "Error closing connection");
            }
        }

        while let Some(joined) = self.sessions.join_next().await {
            self.reap(joined);
        }

        self.completed
    }

    /// Seat a player, starting a battle if someone was already waiting
    pub async fn admit(&mut self, mut player: Player<L>) {
        let Some(first) = self.waiting.take() else {
            if let Err(e) = player.link.send(&ServerMessage::WaitingForOpponent).await {
                warn!(player = %player.username, error = %e, "Player left while waiting");
                if let Err(e) = player.link.close().await {
                    warn!(player = %player.username, error = %e, "Error closing connection");
                }
                return;
            }
            info!(player = %player.username, "Waiting for an opponent");
            self.waiting = Some(player);
            return;
        };

        self.pair(first, player).await;
    }

    async fn pair(&mut self, a: Player<L>, b: Player<L>) {
        let mut rng = StdRng::from_entropy();

        let (side_a, side_b) = match self.deal(&a.username, &b.username, &mut rng) {
            Ok(sides) => sides,
            Err(e) => {
                error!(
                    player_a = %a.username,
                    player_b = %b.username,
                    error = %e,
                    "Failed to assign rosters"
                );
                for mut player in [a, b] {
                    if let Err(e) = player.link.close().await {
                        warn!(player = %player.username, error = %e, "Error closing connection");
                    }
                }
                return;
            }
        };

        info!(player_a = %a.username, player_b = %b.username, "Players paired");
        let session = BattleSession::new(side_a, a.link, side_b, b.link, rng);
        self.sessions.spawn(session.run());
    }

    /// Fresh rosters from the shared catalog, first roster to side A
    fn deal(&self, a: &str, b: &str, rng: &mut StdRng) -> anyhow::Result<(SideState, SideState)> {
        let [roster_a, roster_b] = assign_rosters(&self.catalog, rng)?;
        Ok((
            SideState::new(Side::A, a, roster_a)?,
            SideState::new(Side::B, b, roster_b)?,
        ))
    }

    fn reap(&mut self, joined: Result<SessionOutcome, JoinError>) {
        match joined {
            Ok(outcome) => {
                self.completed += 1;
                info!(
                    winner = ?outcome.winner(),
                    ended_by = describe(&outcome),
                    still_running = self.sessions.len(),
                    "Battle session ended"
                );
            }
            Err(e) => error!(error = %e, "Battle session task failed"),
        }
    }
}
