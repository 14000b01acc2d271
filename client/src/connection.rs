use pokebat_protocol::{ServerMessage, parse_server_line};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::mpsc;

/// Outgoing lines buffered before `Sender::send_raw` starts waiting
const OUTGOING_BUFFER: usize = 32;

pub(crate) type LineReader = Lines<BufReader<Box<dyn AsyncRead + Send + Unpin>>>;

/// Split a stream into a line reader and a channel feeding a writer task.
///
/// The writer task ends, shutting down the write side, once every sender
/// has been dropped or a write fails.
pub(crate) fn split<S>(stream: S) -> (mpsc::Sender<String>, LineReader)
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (read, write) = tokio::io::split(stream);
    let (outgoing, queue) = mpsc::channel(OUTGOING_BUFFER);

    tokio::spawn(write_lines(write, queue));

    let read: Box<dyn AsyncRead + Send + Unpin> = Box::new(read);
    (outgoing, BufReader::new(read).lines())
}

async fn write_lines<W>(mut writer: W, mut queue: mpsc::Receiver<String>)
where
    W: AsyncWrite + Send + Unpin,
{
    while let Some(line) = queue.recv().await {
        let framed = format!("{}\n", line.trim_end_matches(['\r', '\n']));
        let written = async {
            writer.write_all(framed.as_bytes()).await?;
            writer.flush().await
        };

        if let Err(e) = written.await {
            tracing::error!(error = %e, "Failed to write to server");
            return;
        }
    }

    if let Err(e) = writer.shutdown().await {
        tracing::debug!(error = %e, "Error shutting down write side");
    }
}

/// Next classified line, or `None` once the server hangs up
pub(crate) async fn next_message(lines: &mut LineReader) -> std::io::Result<Option<ServerMessage>> {
    Ok(lines.next_line().await?.map(|line| parse_server_line(&line)))
}
