//! Async client for the pokebat battle server.
//!
//! [`Client::connect`] opens the connection; [`Client::sender`] hands out
//! cloneable [`Sender`]s and [`Client::run`] feeds every server line to a
//! [`Handler`] until the battle ends.

pub mod config;
mod connection;
mod handler;
mod receiver;
mod sender;

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

pub use pokebat_protocol::{ClientCommand, ServerMessage};

pub use config::ClientConfig;
pub use handler::{BattleResult, Handler, RosterSlot};
pub use receiver::Receiver;
pub use sender::Sender;

/// A connection to a battle server
pub struct Client {
    sender: Sender,
    receiver: Receiver,
}

impl Client {
    /// Connect to a battle server at `host:port`
    pub async fn connect(addr: &str) -> Result<Self> {
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        tracing::debug!(%addr, "Connected");

        Ok(Self::from_stream(stream))
    }

    /// Wrap an already open stream. Must be called inside a tokio runtime.
    pub fn from_stream<S>(stream: S) -> Self
    where
        S: AsyncRead + AsyncWrite + Send + 'static,
    {
        let (outgoing, lines) = connection::split(stream);
        Self {
            sender: Sender::new(outgoing),
            receiver: Receiver::new(lines),
        }
    }

    /// Get a handle for sending lines
    pub fn sender(&self) -> Sender {
        self.sender.clone()
    }

    /// Run the message loop with the given handler
    pub async fn run<H: Handler>(&mut self, handler: &mut H) -> Result<Option<BattleResult>> {
        self.receiver.run(handler).await
    }

    pub fn split(self) -> (Sender, Receiver) {
        (self.sender, self.receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, duplex};

    /// Records events and answers prompts with fixed choices
    #[derive(Default)]
    struct Recorder {
        sender: Option<Sender>,
        lines: Vec<ServerMessage>,
        prompts: Vec<Vec<RosterSlot>>,
        turns: usize,
        authenticated: bool,
        result: Option<BattleResult>,
    }

    #[async_trait]
    impl Handler for Recorder {
        async fn on_line(&mut self, message: &ServerMessage) {
            self.lines.push(message.clone());
        }

        async fn on_authenticated(&mut self) {
            self.authenticated = true;
        }

        async fn on_turn_prompt(&mut self) {
            self.turns += 1;
            if let Some(sender) = &self.sender {
                sender.switch().await.unwrap();
            }
        }

        async fn on_selection_prompt(&mut self, roster: &[RosterSlot]) {
            self.prompts.push(roster.to_vec());
            if let Some(sender) = &self.sender {
                let last = roster.iter().rev().find(|s| s.is_selectable()).unwrap();
                sender.select(last.slot).await.unwrap();
            }
        }

        async fn on_battle_over(&mut self, result: BattleResult) {
            self.result = Some(result);
        }
    }

    async fn serve(server: &mut DuplexStream, lines: &[&str]) {
        for line in lines {
            server
                .write_all(format!("{}\n", line).as_bytes())
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_prompts_carry_roster_and_replies_are_sent() {
        let (client_end, mut server) = duplex(4096);
        let mut client = Client::from_stream(client_end);
        let mut recorder = Recorder {
            sender: Some(client.sender()),
            ..Recorder::default()
        };

        serve(
            &mut server,
            &[
                "authenticated",
                "1: Pikachu",
                "2: Geodude",
                "3: Abra",
                "Choose your starting Pokémon:",
                "Your turn! Choose an action: attack, switch, or surrender",
                "Choose a Pokémon to switch to:",
                "1: Pikachu (HP: 35)",
                "2: Geodude (HP: 40)",
                "3: Abra (HP: 0)",
                "You lost the battle.",
                "this line is never read",
            ],
        )
        .await;

        let result = client.run(&mut recorder).await.unwrap();
        assert_eq!(result, Some(BattleResult::Lost));
        assert_eq!(recorder.result, Some(BattleResult::Lost));
        assert!(recorder.authenticated);
        assert_eq!(recorder.turns, 1);
        assert_eq!(recorder.lines.last(), Some(&ServerMessage::Defeat));

        assert_eq!(recorder.prompts.len(), 2);
        assert_eq!(recorder.prompts[0].len(), 3);
        assert_eq!(recorder.prompts[0][2].hp, None);
        assert_eq!(
            recorder.prompts[1][2],
            RosterSlot {
                slot: 3,
                name: "Abra".to_string(),
                hp: Some(0)
            }
        );

        drop(client);
        drop(recorder);

        let mut replies = BufReader::new(server).lines();
        assert_eq!(replies.next_line().await.unwrap().as_deref(), Some("3"));
        assert_eq!(replies.next_line().await.unwrap().as_deref(), Some("switch"));
        // Abra has fainted, so the last selectable slot is Geodude
        assert_eq!(replies.next_line().await.unwrap().as_deref(), Some("2"));
        assert_eq!(replies.next_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_invalid_choice_reprompts_with_last_listing() {
        let (client_end, mut server) = duplex(4096);
        let mut client = Client::from_stream(client_end);
        let mut recorder = Recorder::default();

        serve(
            &mut server,
            &[
                "1: Pikachu",
                "2: Geodude",
                "3: Abra",
                "Choose your starting Pokémon:",
                "Invalid choice. Please choose a valid Pokémon.",
                "Congratulations! You won the battle.",
            ],
        )
        .await;

        assert_eq!(
            client.run(&mut recorder).await.unwrap(),
            Some(BattleResult::Won)
        );
        assert_eq!(recorder.prompts.len(), 2);
        assert_eq!(recorder.prompts[0], recorder.prompts[1]);
    }

    #[tokio::test]
    async fn test_run_ends_when_server_hangs_up() {
        let (client_end, mut server) = duplex(4096);
        let mut client = Client::from_stream(client_end);
        let mut recorder = Recorder::default();

        serve(&mut server, &["Authentication failed"]).await;
        drop(server);

        assert_eq!(client.run(&mut recorder).await.unwrap(), None);
        assert!(!recorder.authenticated);
        assert_eq!(recorder.lines, vec![ServerMessage::AuthenticationFailed]);
    }

    #[tokio::test]
    async fn test_login_line() {
        let (client_end, server) = duplex(4096);
        let client = Client::from_stream(client_end);

        client.sender().login("ash", "pikachu").await.unwrap();
        drop(client);

        let mut replies = BufReader::new(server).lines();
        assert_eq!(
            replies.next_line().await.unwrap().as_deref(),
            Some("ash_pikachu")
        );
    }
}
