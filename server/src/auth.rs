use std::collections::HashMap;
use std::path::Path;

use pokebat_protocol::{Credentials, ServerMessage, parse_credentials};
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::connection::{ConnectionError, PlayerLink};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Failed to read credential file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed credential file: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Deserialize)]
struct UsersFile {
    users: Vec<UserRecord>,
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    username: String,
    password: String,
}

/// Known usernames and their passwords, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| AuthError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let file: UsersFile = serde_json::from_str(json)?;
        Ok(Self {
            users: file
                .users
                .into_iter()
                .map(|u| (u.username, u.password))
                .collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Exact username and password match
    pub fn verify(&self, credentials: &Credentials) -> bool {
        self.users
            .get(&credentials.username)
            .is_some_and(|password| *password == credentials.password)
    }
}

/// Read the login line from a fresh connection and answer it.
///
/// Returns the username on success. On failure the player has already been
/// told and `None` comes back; closing the link is up to the caller.
pub async fn authenticate<L: PlayerLink + ?Sized>(
    link: &mut L,
    store: &CredentialStore,
) -> Result<Option<String>, ConnectionError> {
    let line = link.recv_line().await?;

    let credentials = match parse_credentials(&line) {
        Ok(credentials) if store.verify(&credentials) => credentials,
        Ok(credentials) => {
            warn!(peer = %link.peer(), username = %credentials.username, "Authentication failed");
            link.send(&ServerMessage::AuthenticationFailed).await?;
            return Ok(None);
        }
        Err(e) => {
            warn!(peer = %link.peer(), error = %e, "Malformed login line");
            link.send(&ServerMessage::AuthenticationFailed).await?;
            return Ok(None);
        }
    };

    info!(peer = %link.peer(), username = %credentials.username, "Player authenticated");
    link.send(&ServerMessage::Authenticated).await?;
    Ok(Some(credentials.username))
}
