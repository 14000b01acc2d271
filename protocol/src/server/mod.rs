
use std::fmt;

/// Lines the server sends to a player
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    // === Connection ===
    Authenticated,
    AuthenticationFailed,
    WaitingForOpponent,
    BattleStarted { opponent: String },

    // === Roster selection ===
    /// `<index>: <name>`, index is 1-based
    RosterEntry { index: usize, name: String },
    /// `<index>: <name> (HP: <hp>)`, index is 1-based
    RosterEntryWithHp { index: usize, name: String, hp: u32 },
    ChooseStarting,
    SwitchPrompt,
    InvalidChoice,
    Switched { creature: String },

    // === Turn ===
    TurnPrompt,
    InvalidAction,
    OpponentTurn { opponent: String },
    OpponentSwitched { opponent: String, creature: String },
    Attacked {
        opponent: String,
        creature: String,
        damage: u32,
    },
    WasAttacked { creature: String, damage: u32 },

    // === Terminal ===
    Victory,
    Defeat,
    Aborted,

    /// Anything not recognised by [`parse_server_line`]
    Raw(String),
}

const AUTHENTICATED: &str = "authenticated";
const AUTHENTICATION_FAILED: &str = "Authentication failed";
const WAITING_FOR_OPPONENT: &str = "Waiting for another player to connect...";
const CHOOSE_STARTING: &str = "Choose your starting Pokémon:";
const SWITCH_PROMPT: &str = "Choose a Pokémon to switch to:";
const INVALID_CHOICE: &str = "Invalid choice. Please choose a valid Pokémon.";
const TURN_PROMPT: &str = "Your turn! Choose an action: attack, switch, or surrender";
const INVALID_ACTION: &str = "Invalid action. Please choose attack, switch, or surrender.";
const VICTORY: &str = "Congratulations! You won the battle.";
const DEFEAT: &str = "You lost the battle.";
const ABORTED: &str = "The battle was aborted.";

impl ServerMessage {
    /// Serialize to wire format, including the trailing newline
    pub fn to_line(&self) -> String {
        format!("{}\n", self)
    }

    /// Whether this message ends the battle for the receiving player
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Victory | Self::Defeat | Self::Aborted)
    }

    /// Whether the receiving player is expected to answer with a roster index
    pub fn is_selection_prompt(&self) -> bool {
        matches!(
            self,
            Self::ChooseStarting | Self::SwitchPrompt | Self::InvalidChoice
        )
    }
}

impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authenticated => f.write_str(AUTHENTICATED),
            Self::AuthenticationFailed => f.write_str(AUTHENTICATION_FAILED),
            Self::WaitingForOpponent => f.write_str(WAITING_FOR_OPPONENT),
            Self::BattleStarted { opponent } => write!(f, "Battle started against {}!", opponent),
            Self::RosterEntry { index, name } => write!(f, "{}: {}", index, name),
            Self::RosterEntryWithHp { index, name, hp } => {
                write!(f, "{}: {} (HP: {})", index, name, hp)
            }
            Self::ChooseStarting => f.write_str(CHOOSE_STARTING),
            Self::SwitchPrompt => f.write_str(SWITCH_PROMPT),
            Self::InvalidChoice => f.write_str(INVALID_CHOICE),
            Self::Switched { creature } => write!(f, "Switched to {}.", creature),
            Self::TurnPrompt => f.write_str(TURN_PROMPT),
            Self::InvalidAction => f.write_str(INVALID_ACTION),
            Self::OpponentTurn { opponent } => write!(f, "Waiting for {} to act...", opponent),
            Self::OpponentSwitched { opponent, creature } => {
                write!(f, "{} switched to {}.", opponent, creature)
            }
            Self::Attacked {
                opponent,
                creature,
                damage,
            } => write!(
                f,
                "You attacked {}'s {} for {} damage.",
                opponent, creature, damage
            ),
            Self::WasAttacked { creature, damage } => {
                write!(f, "Your {} was attacked for {} damage.", creature, damage)
            }
            Self::Victory => f.write_str(VICTORY),
            Self::Defeat => f.write_str(DEFEAT),
            Self::Aborted => f.write_str(ABORTED),
            Self::Raw(text) => f.write_str(text),
        }
    }
}

/// Parse a single line from the server into a ServerMessage
pub fn parse_server_line(line: &str) -> ServerMessage {
    let line = line.trim();

    match line {
        AUTHENTICATED => return ServerMessage::Authenticated,
        AUTHENTICATION_FAILED => return ServerMessage::AuthenticationFailed,
        WAITING_FOR_OPPONENT => return ServerMessage::WaitingForOpponent,
        CHOOSE_STARTING => return ServerMessage::ChooseStarting,
        SWITCH_PROMPT => return ServerMessage::SwitchPrompt,
        INVALID_CHOICE => return ServerMessage::InvalidChoice,
        TURN_PROMPT => return ServerMessage::TurnPrompt,
        INVALID_ACTION => return ServerMessage::InvalidAction,
        VICTORY => return ServerMessage::Victory,
        DEFEAT => return ServerMessage::Defeat,
        ABORTED => return ServerMessage::Aborted,
        _ => {}
    }

    parse_attacked(line)
        .or_else(|| parse_was_attacked(line))
        .or_else(|| parse_roster_entry(line))
        .or_else(|| parse_battle_started(line))
        .or_else(|| parse_opponent_turn(line))
        .or_else(|| parse_switched(line))
        .or_else(|| parse_opponent_switched(line))
        .unwrap_or_else(|| ServerMessage::Raw(line.to_string()))
}

fn parse_attacked(line: &str) -> Option<ServerMessage> {
    // You attacked OPPONENT's CREATURE for N damage.
    let body = line.strip_prefix("You attacked ")?.strip_suffix(" damage.")?;
    let (target, damage) = body.rsplit_once(" for ")?;
    let (opponent, creature) = target.split_once("'s ")?;

    Some(ServerMessage::Attacked {
        opponent: opponent.to_string(),
        creature: creature.to_string(),
        damage: damage.parse().ok()?,
    })
}

fn parse_was_attacked(line: &str) -> Option<ServerMessage> {
    // Your CREATURE was attacked for N damage.
    let body = line.strip_prefix("Your ")?.strip_suffix(" damage.")?;
    let (creature, damage) = body.rsplit_once(" was attacked for ")?;

    Some(ServerMessage::WasAttacked {
        creature: creature.to_string(),
        damage: damage.parse().ok()?,
    })
}

fn parse_roster_entry(line: &str) -> Option<ServerMessage> {
    // INDEX: NAME or INDEX: NAME (HP: N)
    let (index, rest) = line.split_once(": ")?;
    let index: usize = index.parse().ok()?;

    if let Some((name, hp)) = rest.rsplit_once(" (HP: ")
        && let Some(hp) = hp.strip_suffix(')').and_then(|hp| hp.parse().ok())
    {
        return Some(ServerMessage::RosterEntryWithHp {
            index,
            name: name.to_string(),
            hp,
        });
    }

    Some(ServerMessage::RosterEntry {
        index,
        name: rest.to_string(),
    })
}

fn parse_battle_started(line: &str) -> Option<ServerMessage> {
    let opponent = line
        .strip_prefix("Battle started against ")?
        .strip_suffix('!')?;

    Some(ServerMessage::BattleStarted {
        opponent: opponent.to_string(),
    })
}

fn parse_opponent_turn(line: &str) -> Option<ServerMessage> {
    let opponent = line.strip_prefix("Waiting for ")?.strip_suffix(" to act...")?;

    Some(ServerMessage::OpponentTurn {
        opponent: opponent.to_string(),
    })
}

fn parse_switched(line: &str) -> Option<ServerMessage> {
    let creature = line.strip_prefix("Switched to ")?.strip_suffix('.')?;

    Some(ServerMessage::Switched {
        creature: creature.to_string(),
    })
}

fn parse_opponent_switched(line: &str) -> Option<ServerMessage> {
    // OPPONENT switched to CREATURE.
    let body = line.strip_suffix('.')?;
    let (opponent, creature) = body.split_once(" switched to ")?;

    Some(ServerMessage::OpponentSwitched {
        opponent: opponent.to_string(),
        creature: creature.to_string(),
    })
}
