//! In-memory player link for driving sessions from tests

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pokebat_protocol::ServerMessage;

use crate::connection::{ConnectionError, PlayerLink};

#[derive(Default)]
struct Script {
    input: VecDeque<String>,
    sent: Vec<ServerMessage>,
    closed: bool,
}

/// Replays canned input lines and records everything sent.
///
/// Runs out of input the same way a dropped TCP peer does: the next read
/// fails with [`ConnectionError::Closed`]. Clones share the same script.
#[derive(Clone, Default)]
pub struct ScriptedLink {
    peer: String,
    script: Arc<Mutex<Script>>,
}

impl ScriptedLink {
    pub fn new(peer: &str, lines: &[&str]) -> Self {
        Self {
            peer: peer.to_string(),
            script: Arc::new(Mutex::new(Script {
                input: lines.iter().map(|line| line.to_string()).collect(),
                ..Script::default()
            })),
        }
    }

    pub fn sent(&self) -> Vec<ServerMessage> {
        self.script.lock().unwrap().sent.clone()
    }

    pub fn count(&self, message: &ServerMessage) -> usize {
        self.sent().iter().filter(|m| *m == message).count()
    }

    pub fn last_sent(&self) -> Option<ServerMessage> {
        self.sent().last().cloned()
    }

    pub fn is_closed(&self) -> bool {
        self.script.lock().unwrap().closed
    }

    pub fn remaining_input(&self) -> usize {
        self.script.lock().unwrap().input.len()
    }
}

#[async_trait]
impl PlayerLink for ScriptedLink {
    async fn recv_line(&mut self) -> Result<String, ConnectionError> {
        let mut script = self.script.lock().unwrap();
        if script.closed {
            return Err(ConnectionError::Closed);
        }
        script
            .input
            .pop_front()
            .map(|line| line.trim().to_string())
            .ok_or(ConnectionError::Closed)
    }

    async fn send(&mut self, message: &ServerMessage) -> Result<(), ConnectionError> {
        let mut script = self.script.lock().unwrap();
        if script.closed {
            return Err(ConnectionError::Closed);
        }
        script.sent.push(message.clone());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.script.lock().unwrap().closed = true;
        Ok(())
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}
