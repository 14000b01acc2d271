use anyhow::Result;
use pokebat_protocol::{ClientCommand, Credentials};
use tokio::sync::mpsc;

/// Cloneable handle for sending lines to the server.
///
/// This can be passed to handlers and cloned freely.
#[derive(Clone)]
pub struct Sender {
    outgoing: mpsc::Sender<String>,
}

impl Sender {
    pub(crate) fn new(outgoing: mpsc::Sender<String>) -> Self {
        Self { outgoing }
    }

    /// Send a raw line to the server. The trailing newline is added for you.
    pub async fn send_raw(&self, line: impl Into<String>) -> Result<()> {
        self.outgoing
            .send(line.into())
            .await
            .map_err(|_| anyhow::anyhow!("Connection closed"))
    }

    /// Send the login line. Must be the first thing sent.
    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let credentials = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        self.send_raw(credentials.to_wire_format()).await
    }

    pub async fn command(&self, command: &ClientCommand) -> Result<()> {
        self.send_raw(command.to_protocol_string()).await
    }

    pub async fn attack(&self) -> Result<()> {
        self.command(&ClientCommand::Attack).await
    }

    pub async fn switch(&self) -> Result<()> {
        self.command(&ClientCommand::Switch).await
    }

    pub async fn surrender(&self) -> Result<()> {
        self.command(&ClientCommand::Surrender).await
    }

    /// Answer a selection prompt with a 1-based roster slot
    pub async fn select(&self, slot: usize) -> Result<()> {
        self.send_raw(slot.to_string()).await
    }
}
