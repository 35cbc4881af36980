//! Exposition server and poll loop.
//!
//! # Architecture
//!
//! - **HTTP server**: axum server exposing `/metrics`, `/health` and `/`
//! - **Poll task**: background task that polls every configured inverter on
//!   a fixed interval and updates the Prometheus registry
//!
//! The poll task owns the [`InverterMetrics`] caches outright; the HTTP
//! handlers only hold a shared handle to the underlying registry for
//! rendering. Devices are polled sequentially within a cycle, and the
//! inter-cycle sleep starts only after a cycle fully completes — a slow
//! cycle delays the next one, it never stacks up. A failed cycle is logged
//! and the loop carries on; the fixed interval is the retry mechanism.

use crate::config::Config;
use crate::error::ExporterError;
use crate::kaco::{InverterProvider, KacoClient, KacoInverterProvider};
use crate::metrics::{render_registry, InverterMetrics};
use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use prometheus::Registry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Duration;
use tracing::{debug, error, info};

#[derive(Clone)]
struct AppState {
    registry: Registry,
    healthy: Arc<AtomicBool>,
}

/// Discover the inverters behind the configured host and run the exporter.
pub async fn start(config: Config) -> anyhow::Result<()> {
    let client = Arc::new(KacoClient::new(&config.kaco)?);

    let inverters = client.list_inverters().await?;
    info!(
        "found {} inverter(s) behind {}",
        inverters.len(),
        config.kaco.host
    );

    let providers: Vec<KacoInverterProvider> = inverters
        .into_iter()
        .map(|inverter| KacoInverterProvider::new(client.clone(), &config.kaco.host, inverter.serial))
        .collect();

    serve(config, providers).await
}

/// Run the poll task and the exposition server over a fixed provider set.
pub async fn serve<P>(config: Config, providers: Vec<P>) -> anyhow::Result<()>
where
    P: InverterProvider + Send + Sync + 'static,
{
    let metrics = InverterMetrics::new();
    let state = AppState {
        registry: metrics.registry(),
        healthy: Arc::new(AtomicBool::new(false)),
    };

    let interval = Duration::from_secs(config.poll.interval_seconds);
    let healthy = state.healthy.clone();
    tokio::spawn(async move {
        poll_loop(metrics, providers, interval, healthy).await;
    });

    let app = Router::new()
        .route("/", get(root_handler))
        .route("/metrics", get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state);

    let addr = format!("{}:{}", config.server.addr, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(ExporterError::Io)?;

    info!("metrics available at http://{}/metrics", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

async fn poll_loop<P: InverterProvider>(
    mut metrics: InverterMetrics,
    providers: Vec<P>,
    interval: Duration,
    healthy: Arc<AtomicBool>,
) {
    info!("polling every {}s ...", interval.as_secs());
    loop {
        debug!("polling ...");
        match metrics.poll(&providers).await {
            Ok(()) => healthy.store(true, Ordering::Relaxed),
            Err(e) => {
                error!("poll cycle failed: {e}");
                healthy.store(false, Ordering::Relaxed);
            }
        }
        // The sleep measures from cycle completion, success or failure.
        tokio::time::sleep(interval).await;
    }
}

async fn root_handler() -> impl IntoResponse {
    axum::response::Html(
        r#"<html>
<head><title>Kaco Exporter</title></head>
<body>
<h1>Kaco Inverter Prometheus Exporter</h1>
<p><a href="/metrics">Metrics</a></p>
<p><a href="/health">Health</a></p>
</body>
</html>"#,
    )
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    match render_registry(&state.registry) {
        Ok(metrics) => metrics.into_response(),
        Err(e) => {
            error!("failed to render metrics: {e}");
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error rendering metrics: {e}"),
            )
                .into_response()
        }
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.healthy.load(Ordering::Relaxed) {
        (axum::http::StatusCode::OK, "OK")
    } else {
        (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            "last poll cycle failed",
        )
    }
}
