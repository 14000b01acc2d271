use anyhow::{Context, Result};
use pokebat_protocol::ServerMessage;

use crate::connection::{LineReader, next_message};
use crate::handler::{BattleResult, Handler, RosterSlot};

/// Receives lines from the server and dispatches them to a handler.
///
/// Keeps the most recent roster listing so selection prompts come with the
/// slots to choose from.
pub struct Receiver {
    lines: LineReader,
    roster: Vec<RosterSlot>,
    /// Number of slots in the starting listing
    roster_size: usize,
    /// A switch prompt arrives before its listing; hold it until the
    /// listing is complete
    switch_pending: bool,
}

impl Receiver {
    pub(crate) fn new(lines: LineReader) -> Self {
        Self {
            lines,
            roster: Vec::new(),
            roster_size: 0,
            switch_pending: false,
        }
    }

    /// Run the message loop, dispatching events to the handler.
    ///
    /// Runs until the battle ends or the server closes the connection.
    /// Returns the battle result, or `None` if the connection closed first.
    pub async fn run<H: Handler>(&mut self, handler: &mut H) -> Result<Option<BattleResult>> {
        while let Some(message) = next_message(&mut self.lines)
            .await
            .context("Failed to read from server")?
        {
            if let Some(result) = self.dispatch(handler, message).await {
                return Ok(Some(result));
            }
        }

        tracing::debug!("Server closed the connection");
        Ok(None)
    }

    /// Dispatch a single message to the appropriate handler method
    async fn dispatch<H: Handler>(
        &mut self,
        handler: &mut H,
        message: ServerMessage,
    ) -> Option<BattleResult> {
        handler.on_line(&message).await;

        match message {
            ServerMessage::Authenticated => handler.on_authenticated().await,
            ServerMessage::AuthenticationFailed => handler.on_auth_failed().await,
            ServerMessage::TurnPrompt => handler.on_turn_prompt().await,
            ServerMessage::RosterEntry { index, name } => {
                self.record(index, name, None);
            }
            ServerMessage::RosterEntryWithHp { index, name, hp } => {
                self.record(index, name, Some(hp));
                if self.switch_pending && self.roster.len() >= self.roster_size {
                    self.switch_pending = false;
                    handler.on_selection_prompt(&self.roster).await;
                }
            }
            ServerMessage::ChooseStarting => {
                self.roster_size = self.roster.len();
                handler.on_selection_prompt(&self.roster).await;
            }
            ServerMessage::SwitchPrompt => {
                self.roster.clear();
                if self.roster_size == 0 {
                    handler.on_selection_prompt(&self.roster).await;
                } else {
                    self.switch_pending = true;
                }
            }
            ServerMessage::InvalidChoice => {
                handler.on_selection_prompt(&self.roster).await;
            }
            ref terminal if terminal.is_terminal() => {
                let result = BattleResult::from_message(terminal)?;
                handler.on_battle_over(result).await;
                return Some(result);
            }
            _ => {}
        }

        None
    }

    /// Slot 1 starts a fresh listing
    fn record(&mut self, slot: usize, name: String, hp: Option<u32>) {
        if slot == 1 {
            self.roster.clear();
        }
        self.roster.push(RosterSlot { slot, name, hp });
    }

    /// Most recent roster listing
    pub fn roster(&self) -> &[RosterSlot] {
        &self.roster
    }
}
