/// Folio short-link server binary
///
/// Serves `POST /api/shorten`, `GET /shorten/{id}`, `/health` and `/metrics`.

use anyhow::{Context, Result};
use clap::Parser;
use folio_core::{Shortener, ShortenerConfig};
use folio_server::{metrics, open_store, router, AppState, ServerConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "folio-server")]
#[command(about = "Folio short-link server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// Path to the link log file
    #[arg(short, long, value_name = "PATH", default_value = ".data/links.log")]
    data_path: PathBuf,

    /// Keep links in memory only (ignores --data-path)
    #[arg(long)]
    in_memory: bool,

    /// Public origin used in returned short URLs
    #[arg(long, env = "FOLIO_PUBLIC_URL")]
    public_url: Option<String>,

    /// Maximum shorten requests per second (0 = unlimited)
    #[arg(long, default_value = "10")]
    shorten_rps: u32,

    /// Fresh ids tried before giving up on collisions
    #[arg(long, default_value = "5")]
    max_id_attempts: usize,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Default to info level, override with RUST_LOG
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    metrics::register_metrics();
    info!("Initialized Prometheus metrics");

    let args = Args::parse();

    let mut config = ServerConfig::new()
        .with_host(args.host)
        .with_port(args.port)
        .with_shorten_rps(args.shorten_rps);
    if !args.in_memory {
        config = config.with_data_path(args.data_path);
    }
    if let Some(url) = args.public_url {
        config = config.with_public_base_url(url);
    }
    config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid server configuration")?;

    let shortener_config = ShortenerConfig::new().with_max_id_attempts(args.max_id_attempts);
    shortener_config
        .validate()
        .map_err(anyhow::Error::msg)
        .context("invalid shortener configuration")?;

    let store = open_store(&config).context("failed to open link store")?;
    let shortener = Shortener::with_config(store, shortener_config);
    let state = AppState::new(shortener, &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(
        "Folio server listening on http://{} (rate limit: {})",
        addr,
        if config.shorten_rps == 0 {
            "unlimited".to_string()
        } else {
            format!("{}/s", config.shorten_rps)
        }
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
