//! Interactive terminal client.
//!
//! Prints every server line and forwards each line typed on stdin.
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use pokebat_client::{BattleResult, Client, ClientConfig, Handler, Sender, ServerMessage};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

struct Printer;

#[async_trait]
impl Handler for Printer {
    async fn on_line(&mut self, message: &ServerMessage) {
        println!("{}", message);
    }

    async fn on_auth_failed(&mut self) {
        tracing::warn!("Login rejected by server");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ClientConfig::from_env();
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    let username = match config.username {
        Some(username) => username,
        None => prompt(&mut stdin, "Username: ").await?,
    };
    let password = match config.password {
        Some(password) => password,
        None => prompt(&mut stdin, "Password: ").await?,
    };

    let mut client = Client::connect(&config.addr).await?;
    let sender = client.sender();
    sender.login(&username, &password).await?;

    tokio::spawn(forward_stdin(stdin, sender));

    match client.run(&mut Printer).await? {
        Some(BattleResult::Won) | Some(BattleResult::Lost) => Ok(()),
        Some(BattleResult::Aborted) => bail!("Battle was aborted"),
        None => bail!("Server closed the connection"),
    }
}

async fn prompt(stdin: &mut Lines<BufReader<Stdin>>, label: &str) -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(label.as_bytes()).await?;
    stdout.flush().await?;

    let line = stdin
        .next_line()
        .await?
        .context("Standard input closed")?;
    Ok(line.trim().to_string())
}

async fn forward_stdin(mut stdin: Lines<BufReader<Stdin>>, sender: Sender) {
    loop {
        match stdin.next_line().await {
            Ok(Some(line)) => {
                if sender.send_raw(line).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read standard input");
                break;
            }
        }
    }
}
