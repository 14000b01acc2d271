//! Server configuration
use std::env;
use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_POKEDEX: &str = "assets/pokedex.json";
pub const DEFAULT_USERS: &str = "assets/users.json";

/// Where to listen and which data files to load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub pokedex_path: PathBuf,
    pub users_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            pokedex_path: PathBuf::from(DEFAULT_POKEDEX),
            users_path: PathBuf::from(DEFAULT_USERS),
        }
    }
}

impl ServerConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `POKEBAT_HOST` - Interface to bind (default: localhost)
    /// - `POKEBAT_PORT` - TCP port (default: 8081)
    /// - `POKEBAT_POKEDEX` - Creature catalog JSON (default: assets/pokedex.json)
    /// - `POKEBAT_USERS` - Credential JSON (default: assets/users.json)
    ///
    /// Unset or unparseable values keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(host) = lookup("POKEBAT_HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }

        if let Some(port) = read_var::<u16>(&lookup, "POKEBAT_PORT") {
            config.port = port;
        }

        if let Some(path) = lookup("POKEBAT_POKEDEX").filter(|p| !p.is_empty()) {
            config.pokedex_path = PathBuf::from(path);
        }

        if let Some(path) = lookup("POKEBAT_USERS").filter(|p| !p.is_empty()) {
            config.users_path = PathBuf::from(path);
        }

        config
    }

    /// `host:port` string accepted by `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.trim().parse().ok()
}
