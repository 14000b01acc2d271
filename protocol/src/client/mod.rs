use crate::ParseError;

/// Actions a player can take when it is their turn.
///
/// Anything that is not exactly one of the three tokens becomes
/// [`ClientCommand::Invalid`], which the server answers with a re-prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// `attack`
    Attack,

    /// `switch`
    Switch,

    /// `surrender`
    Surrender,

    /// Any other input, trimmed
    Invalid(String),
}

impl ClientCommand {
    /// Parse a turn action from a raw line
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "attack" => Self::Attack,
            "switch" => Self::Switch,
            "surrender" => Self::Surrender,
            other => Self::Invalid(other.to_string()),
        }
    }

    /// Serialize command to protocol format
    pub fn to_protocol_string(&self) -> String {
        match self {
            Self::Attack => "attack".to_string(),
            Self::Switch => "switch".to_string(),
            Self::Surrender => "surrender".to_string(),
            Self::Invalid(text) => text.clone(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

/// Parse a 1-based roster selection into a zero-based index.
///
/// Accepts only integers in `1..=roster_size`.
pub fn parse_selection(line: &str, roster_size: usize) -> Result<usize, ParseError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    let index: i64 = text
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("not a number: {}", text)))?;

    if index < 1 || index as u64 > roster_size as u64 {
        return Err(ParseError::OutOfRange {
            index,
            max: roster_size,
        });
    }

    Ok((index - 1) as usize)
}

/// Login line sent as the first message on a new connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Serialize to wire format: USERNAME_PASSWORD
    pub fn to_wire_format(&self) -> String {
        format!("{}_{}", self.username, self.password)
    }
}

/// Parse a `USERNAME_PASSWORD` line. Exactly one separator is allowed.
pub fn parse_credentials(line: &str) -> Result<Credentials, ParseError> {
    let text = line.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyMessage);
    }

    let parts: Vec<&str> = text.split('_').collect();
    if parts.len() != 2 {
        return Err(ParseError::InvalidFormat(format!(
            "expected 2 parts, got {}",
            parts.len()
        )));
    }

    Ok(Credentials {
        username: parts[0].to_string(),
        password: parts[1].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(ClientCommand::parse("attack"), ClientCommand::Attack);
        assert_eq!(ClientCommand::parse("  switch\r\n"), ClientCommand::Switch);
        assert_eq!(ClientCommand::parse("surrender\n"), ClientCommand::Surrender);
    }

    #[test]
    fn test_parse_action_is_case_sensitive() {
        assert_eq!(
            ClientCommand::parse("Attack"),
            ClientCommand::Invalid("Attack".to_string())
        );
    }

    #[test]
    fn test_parse_empty_action() {
        let command = ClientCommand::parse("   ");
        assert_eq!(command, ClientCommand::Invalid(String::new()));
        assert!(!command.is_valid());
    }

    #[test]
    fn test_selection_bounds() {
        assert_eq!(parse_selection("1", 3), Ok(0));
        assert_eq!(parse_selection(" 3 \n", 3), Ok(2));
        assert_eq!(
            parse_selection("0", 3),
            Err(ParseError::OutOfRange { index: 0, max: 3 })
        );
        assert_eq!(
            parse_selection("4", 3),
            Err(ParseError::OutOfRange { index: 4, max: 3 })
        );
        assert_eq!(
            parse_selection("-1", 3),
            Err(ParseError::OutOfRange { index: -1, max: 3 })
        );
    }

    #[test]
    fn test_selection_rejects_garbage() {
        assert!(matches!(
            parse_selection("two", 3),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_selection("1.5", 3),
            Err(ParseError::InvalidFormat(_))
        ));
        assert_eq!(parse_selection("", 3), Err(ParseError::EmptyMessage));
    }

    #[test]
    fn test_parse_credentials() {
        let creds = parse_credentials("ash_pikachu\n").unwrap();
        assert_eq!(creds.username, "ash");
        assert_eq!(creds.password, "pikachu");
        assert_eq!(creds.to_wire_format(), "ash_pikachu");
    }

    #[test]
    fn test_parse_credentials_wrong_part_count() {
        assert!(parse_credentials("ash").is_err());
        assert!(parse_credentials("ash_pika_chu").is_err());
        assert_eq!(parse_credentials(""), Err(ParseError::EmptyMessage));
    }
}
