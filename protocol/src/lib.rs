//! Line-oriented wire format for two-player creature battles.
//!
//! One line is one message. Clients send free text (`attack`, `switch`,
//! `surrender`, a 1-based roster index, or `<username>_<password>` when
//! connecting); the server answers with human-readable lines described by
//! [`ServerMessage`].

use thiserror::Error;

pub mod client;
pub mod server;

pub use client::{ClientCommand, Credentials, parse_credentials, parse_selection};
pub use server::{ServerMessage, parse_server_line};

/// Maximum number of bytes read for a single incoming line.
pub const LINE_BUFFER_SIZE: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid message format: {0}")]
    InvalidFormat(String),

    #[error("Selection {index} is out of range 1..={max}")]
    OutOfRange { index: i64, max: usize },

    #[error("Empty message")]
    EmptyMessage,
}
