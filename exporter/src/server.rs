//! HTTP surface: metrics endpoint and landing page.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::error::{ExporterError, Result};
use crate::exporter::SnapshotExporter;
use crate::metrics::{self, TEXT_FORMAT};

#[derive(Clone)]
struct AppState {
    exporter: Arc<SnapshotExporter>,
    landing_page: Arc<str>,
}

/// Build the router serving metrics under `telemetry_path` and the landing
/// page everywhere else.
pub fn router(exporter: Arc<SnapshotExporter>, telemetry_path: &str) -> Router {
    let state = AppState {
        exporter,
        landing_page: landing_page(telemetry_path).into(),
    };

    Router::new()
        .route(telemetry_path, get(metrics_handler))
        .fallback(landing_handler)
        .with_state(state)
}

/// Bind the listen address. Failure is fatal to the exporter.
pub async fn bind(addr: std::net::SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ExporterError::Bind {
            addr: addr.to_string(),
            source,
        })
}

/// Serve `app` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("Metrics exporter listening on {addr}");
    }
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(ExporterError::Serve)
}

async fn metrics_handler(State(state): State<AppState>) -> Response {
    let exporter = Arc::clone(&state.exporter);
    // Census reads the filesystem, keep it off the async workers.
    match tokio::task::spawn_blocking(move || exporter.scrape()).await {
        Ok(result) => ([(CONTENT_TYPE, TEXT_FORMAT)], metrics::render(&result)).into_response(),
        Err(e) => {
            error!("Scrape task failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "scrape failed").into_response()
        }
    }
}

async fn landing_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.landing_page.to_string())
}

fn landing_page(telemetry_path: &str) -> String {
    format!(
        "<html><head><title>folderstats exporter</title></head><body>\
         <h1>folderstats exporter</h1>\
         <p><a href='{telemetry_path}'>metrics can be found there!</a></p>\
         </body></html>"
    )
}
