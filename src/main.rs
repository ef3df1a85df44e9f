use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use devai_api::config::AppConfig;
use devai_api::database::{MemoryStore, PgStore};
use devai_api::{app, AppState};

#[derive(Debug, Parser)]
#[command(name = "devai-api", version, about = "Notes and projects API with JWT auth and AI assistance")]
struct Args {
    /// Address to bind
    #[arg(long, env = "API_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up JWT_SECRET, DATABASE_URL, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("devai_api=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().context("invalid configuration")?;
    info!("Starting DevAI API in {:?} mode", config.environment);

    let (state, pg) = match config.database.url {
        Some(_) => {
            let store = PgStore::connect(&config.database)
                .await
                .context("failed to connect to database")?;
            store.migrate().await.context("failed to apply schema")?;
            (AppState::new(config, store.clone())?, Some(store))
        }
        None => {
            // Config validation only allows this in development
            warn!("DATABASE_URL not set; using in-memory store (data is lost on restart)");
            (AppState::new(config, MemoryStore::new())?, None)
        }
    };

    let bind_addr = format!("{}:{}", args.host, args.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    info!("DevAI API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(store) = pg {
        store.close().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
