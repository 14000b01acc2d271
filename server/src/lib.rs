//! TCP battle server.
//!
//! Every accepted connection gets its own task that reads the login line.
//! Authenticated players are handed to the [`Lobby`], which pairs them and
//! spawns one [`BattleSession`] task per match.

pub mod auth;
pub mod config;
pub mod connection;
pub mod lobby;
pub mod session;

#[cfg(test)]
mod testing;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use pokebat_battle::Creature;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub use auth::{AuthError, CredentialStore, authenticate};
pub use config::ServerConfig;
pub use connection::{ConnectionError, LineConnection, PlayerLink};
pub use lobby::{Lobby, Player};
pub use session::{BattleSession, SessionError, SessionOutcome};

/// Authenticated players queued for the lobby
const LOBBY_QUEUE: usize = 64;

type TcpPlayer = Player<LineConnection<TcpStream>>;

/// A bound listener plus the shared data every connection needs
pub struct Server {
    listener: TcpListener,
    credentials: Arc<CredentialStore>,
    catalog: Arc<[Creature]>,
}

impl Server {
    pub async fn bind(
        config: &ServerConfig,
        catalog: Vec<Creature>,
        credentials: CredentialStore,
    ) -> io::Result<Self> {
        let listener = TcpListener::bind(config.bind_address()).await?;

        Ok(Self {
            listener,
            credentials: Arc::new(credentials),
            catalog: catalog.into(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accept connections forever
    pub async fn run(self) {
        let (arrivals, queue) = mpsc::channel::<TcpPlayer>(LOBBY_QUEUE);
        tokio::spawn(Lobby::new(self.catalog.clone()).run(queue));

        if let Ok(addr) = self.listener.local_addr() {
            info!(%addr, creatures = self.catalog.len(), "Listening for players");
        }

        loop {
            let (stream, addr) = match self.listener.accept().await {
                Ok(accepted) => accepted,
                Err(e) => {
                    warn!(error = %e, "Failed to accept connection");
                    continue;
                }
            };

            debug!(peer = %addr, "Connection accepted");
            let credentials = Arc::clone(&self.credentials);
            let arrivals = arrivals.clone();
            tokio::spawn(handshake(stream, addr, credentials, arrivals));
        }
    }
}

/// Authenticate a fresh connection and queue it for the lobby
async fn handshake(
    stream: TcpStream,
    addr: SocketAddr,
    credentials: Arc<CredentialStore>,
    arrivals: mpsc::Sender<TcpPlayer>,
) {
    let mut link = LineConnection::new(stream, addr.to_string());

    match authenticate(&mut link, &credentials).await {
        Ok(Some(username)) => {
            if arrivals.send(Player::new(username, link)).await.is_err() {
                warn!(peer = %addr, "Lobby is gone, dropping player");
            }
        }
        Ok(None) => {
            if let Err(e) = link.close().await {
                debug!(peer = %addr, error = %e, "Error closing rejected connection");
            }
        }
        Err(e) => {
            warn!(peer = %addr, error = %e, "Connection lost during login");
        }
    }
}
