//! Battle server entry point.
use anyhow::{Context, Result};
use pokebat_server::{CredentialStore, Server, ServerConfig};
use pokebat_team::{ensure_playable, load_catalog};
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    setup_logging();

    let config = ServerConfig::from_env();

    let catalog = load_catalog(&config.pokedex_path).with_context(|| {
        format!(
            "Failed to load creature catalog from {}",
            config.pokedex_path.display()
        )
    })?;
    ensure_playable(&catalog).context("Creature catalog cannot fill two rosters")?;

    let credentials = CredentialStore::load(&config.users_path).with_context(|| {
        format!(
            "Failed to load credentials from {}",
            config.users_path.display()
        )
    })?;

    info!(
        creatures = catalog.len(),
        users = credentials.len(),
        "Data files loaded"
    );

    let server = Server::bind(&config, catalog, credentials)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;

    tokio::select! {
        _ = server.run() => {}
        result = tokio::signal::ctrl_c() => {
            result.context("Failed to listen for shutdown signal")?;
            info!("Shutting down");
        }
    }

    Ok(())
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
