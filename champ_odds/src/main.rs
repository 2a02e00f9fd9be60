use anyhow::Context;
use tracing_subscriber::EnvFilter;

use champ_odds::{config::ServiceConfig, server};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = ServiceConfig::from_env()?;
    if !cfg.data_dir.is_dir() {
        tracing::warn!("data dir {} does not exist yet; run the scrapers", cfg.data_dir.display());
    }
    tracing::info!(
        "config: data_dir={} total_races={} simulations={} seeded={}",
        cfg.data_dir.display(),
        cfg.total_races,
        cfg.simulations,
        cfg.seed.is_some()
    );

    let app = server::router(server::AppState::new(&cfg));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await?;
    Ok(())
}
