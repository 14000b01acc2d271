use async_trait::async_trait;
use pokebat_protocol::{LINE_BUFFER_SIZE, ServerMessage};
use thiserror::Error;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf,
    WriteHalf,
};

#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Connection closed by peer")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A player's end of the conversation.
///
/// The battle session only ever talks to players through this trait, one
/// line at a time.
#[async_trait]
pub trait PlayerLink: Send {
    /// Wait for the next line from the player, with surrounding whitespace
    /// removed. Fails with [`ConnectionError::Closed`] once the peer is gone.
    async fn recv_line(&mut self) -> Result<String, ConnectionError>;

    /// Send one message as a single line
    async fn send(&mut self, message: &ServerMessage) -> Result<(), ConnectionError>;

    /// Shut the connection down
    async fn close(&mut self) -> Result<(), ConnectionError>;

    /// Human-readable peer description for logs
    fn peer(&self) -> &str;
}

/// Newline-delimited text over any byte stream
pub struct LineConnection<S> {
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    peer: String,
}

impl<S> LineConnection<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    pub fn new(stream: S, peer: impl Into<String>) -> Self {
        let (read, writer) = tokio::io::split(stream);
        Self {
            reader: BufReader::new(read),
            writer,
            peer: peer.into(),
        }
    }
}

#[async_trait]
impl<S> PlayerLink for LineConnection<S>
where
    S: AsyncRead + AsyncWrite + Send,
{
    async fn recv_line(&mut self) -> Result<String, ConnectionError> {
        let mut buffer = Vec::with_capacity(LINE_BUFFER_SIZE);
        let read = (&mut self.reader)
            .take(LINE_BUFFER_SIZE as u64)
            .read_until(b'\n', &mut buffer)
            .await?;

        if read == 0 {
            return Err(ConnectionError::Closed);
        }

        Ok(String::from_utf8_lossy(&buffer).trim().to_string())
    }

    async fn send(&mut self, message: &ServerMessage) -> Result<(), ConnectionError> {
        self.writer.write_all(message.to_line().as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ConnectionError> {
        self.writer.shutdown().await?;
        Ok(())
    }

    fn peer(&self) -> &str {
        &self.peer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::duplex;

    #[tokio::test]
    async fn test_recv_trims_each_line() {
        let (server, mut client) = duplex(4096);
        let mut conn = LineConnection::new(server, "test");

        client.write_all(b"  attack \r\nswitch\n").await.unwrap();

        assert_eq!(conn.recv_line().await.unwrap(), "attack");
        assert_eq!(conn.recv_line().await.unwrap(), "switch");
    }

    #[tokio::test]
    async fn test_recv_after_peer_close() {
        let (server, client) = duplex(64);
        let mut conn = LineConnection::new(server, "test");
        drop(client);

        assert!(matches!(
            conn.recv_line().await,
            Err(ConnectionError::Closed)
        ));
    }

    #[tokio::test]
    async fn test_recv_caps_line_length() {
        let (server, mut client) = duplex(4096);
        let mut conn = LineConnection::new(server, "test");

        let long = "a".repeat(LINE_BUFFER_SIZE + 10);
        client.write_all(format!("{}\n", long).as_bytes()).await.unwrap();

        assert_eq!(conn.recv_line().await.unwrap().len(), LINE_BUFFER_SIZE);
        assert_eq!(conn.recv_line().await.unwrap(), "a".repeat(10));
    }

    #[tokio::test]
    async fn test_send_writes_one_line() {
        let (server, client) = duplex(4096);
        let mut conn = LineConnection::new(server, "test");

        conn.send(&ServerMessage::TurnPrompt).await.unwrap();
        conn.close().await.unwrap();

        let mut received = String::new();
        let mut client = BufReader::new(client);
        client.read_to_string(&mut received).await.unwrap();

        assert_eq!(
            received,
            "Your turn! Choose an action: attack, switch, or surrender\n"
        );
    }
}
