//! Taste & Text service: binary entrypoint.
//! Loads config and the review dataset once, then serves the analysis and
//! recommendation endpoints with Axum.

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taste_text::config::AppConfig;
use taste_text::metrics::Metrics;
use taste_text::{api, AppState, Dataset};

/// Compact logs by default; `TASTE_LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("taste_text=info,tower_http=warn"));

    let json = std::env::var("TASTE_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer().compact()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = AppConfig::load()?;
    let dataset = Dataset::load(&cfg.dataset.path)?;
    let state = AppState::from_config(&cfg, dataset)?;

    let metrics = Metrics::init()?;
    let app = api::router(state).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(&cfg.server.bind)
        .await
        .with_context(|| format!("binding {}", cfg.server.bind))?;
    info!(bind = %cfg.server.bind, mode = ?cfg.sentiment.mode, "taste-text listening");
    axum::serve(listener, app).await?;
    Ok(())
}
