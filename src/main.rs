use anyhow::{Context, Result};
use clap::Parser;
use exo_habitat::{AppState, Config, StatsStore};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "exo-habitat", about = "Exoplanet habitability scoring service")]
struct Cli {
    /// Config file to load (stem, without extension)
    #[arg(long, default_value = "config/exo-habitat")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = Config::load(&cli.config)?;

    info!("{} v{}", cfg.service.name, env!("CARGO_PKG_VERSION"));
    info!("Stats file: {}", cfg.stats.path);
    info!("TAP upstream: {}", cfg.upstream.tap_url);
    info!("Prediction API: {}", cfg.upstream.prediction_url);
    info!("Static assets: {}", cfg.web.static_dir);

    let stats = Arc::new(StatsStore::load(&cfg.stats.path).await);
    let state = AppState::new(Arc::clone(&stats), cfg.upstream.clone())?;
    let router = exo_habitat::create_router(state, &cfg.web.static_dir);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // One final best-effort write so the on-disk snapshot reflects shutdown
    if let Err(e) = stats.save().await {
        warn!("Final stats save failed: {:#}", e);
    }
    info!("Shut down cleanly");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}
