//! Subject Line Analyzer — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and middleware.

use shuttle_axum::ShuttleAxum;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use subject_line_analyzer::{api, metrics::Metrics, AppState, ServiceConfig};

/// Compact logs filtered by `RUST_LOG`. Uses `try_init` so a subscriber the
/// runtime already installed wins.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("subject_line_analyzer=info,analyze=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    init_tracing();

    let cfg = ServiceConfig::from_env();
    let state = AppState::from_config(&cfg)?;
    let mut router = api::create_router(state);

    if cfg.metrics_enabled {
        let metrics = Metrics::init()?;
        router = router.merge(metrics.router());
    }

    info!(
        delay_ms = cfg.analyze_delay.as_millis() as u64,
        metrics = cfg.metrics_enabled,
        "subject line analyzer ready"
    );

    Ok(router.into())
}
