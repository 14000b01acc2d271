use async_trait::async_trait;
use pokebat_protocol::ServerMessage;

/// One line of a roster listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterSlot {
    /// 1-based, as shown by the server and expected back
    pub slot: usize,
    pub name: String,
    /// Only known when listed for a switch
    pub hp: Option<u32>,
}

impl RosterSlot {
    /// A slot is selectable unless it is known to have fainted
    pub fn is_selectable(&self) -> bool {
        self.hp != Some(0)
    }
}

/// How a battle ended for this player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleResult {
    Won,
    Lost,
    Aborted,
}

impl BattleResult {
    pub fn from_message(message: &ServerMessage) -> Option<Self> {
        match message {
            ServerMessage::Victory => Some(Self::Won),
            ServerMessage::Defeat => Some(Self::Lost),
            ServerMessage::Aborted => Some(Self::Aborted),
            _ => None,
        }
    }
}

/// Trait for reacting to server lines.
///
/// All methods have default no-op implementations, so you only need to
/// implement the events you care about.
///
/// # Example
///
/// ```ignore
/// struct AlwaysAttack {
///     sender: Sender,
/// }
///
/// #[async_trait]
/// impl Handler for AlwaysAttack {
///     async fn on_turn_prompt(&mut self) {
///         self.sender.attack().await.ok();
///     }
///
///     async fn on_selection_prompt(&mut self, roster: &[RosterSlot]) {
///         if let Some(slot) = roster.iter().find(|s| s.is_selectable()) {
///             self.sender.select(slot.slot).await.ok();
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Handler: Send {
    /// Called for every line, before any of the more specific methods
    async fn on_line(&mut self, message: &ServerMessage) {
        let _ = message;
    }

    /// Called when the server accepts the login line
    async fn on_authenticated(&mut self) {}

    /// Called when the login is rejected. The server hangs up right after.
    async fn on_auth_failed(&mut self) {}

    /// Called when it is this player's turn to act
    async fn on_turn_prompt(&mut self) {}

    /// Called when the server waits for a roster slot: the starting pick,
    /// a switch target, or a retry after an invalid choice.
    async fn on_selection_prompt(&mut self, roster: &[RosterSlot]) {
        let _ = roster;
    }

    /// Called once when the battle ends
    async fn on_battle_over(&mut self, result: BattleResult) {
        let _ = result;
    }
}
