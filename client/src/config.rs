//! Client configuration
use std::env;

pub const DEFAULT_ADDR: &str = "localhost:8081";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    pub addr: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            username: None,
            password: None,
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `POKEBAT_ADDR` - Server address (default: localhost:8081)
    /// - `POKEBAT_USER` - Username (default: prompt)
    /// - `POKEBAT_PASSWORD` - Password (default: prompt)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            addr: non_empty("POKEBAT_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string()),
            username: non_empty("POKEBAT_USER"),
            password: non_empty("POKEBAT_PASSWORD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ClientConfig::from_lookup(|_| None), ClientConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(|key| match key {
            "POKEBAT_ADDR" => Some("battle.example:9000".to_string()),
            "POKEBAT_USER" => Some("ash".to_string()),
            "POKEBAT_PASSWORD" => Some(String::new()),
            _ => None,
        });

        assert_eq!(config.addr, "battle.example:9000");
        assert_eq!(config.username.as_deref(), Some("ash"));
        assert_eq!(config.password, None);
    }
}
