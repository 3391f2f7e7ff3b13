//! `GET /health`: readiness of everything a content write depends on.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::{MediaBackend, MediaConfig};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` when every check passes, `degraded` otherwise.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Which object store backs uploaded media (`s3` or `memory`).
    pub media_backend: &'static str,
    /// Whether the upload staging directory exists and is a directory.
    pub staging_ready: bool,
}

fn backend_name(media: &MediaConfig) -> &'static str {
    match media.backend {
        MediaBackend::S3(_) => "s3",
        MediaBackend::Memory => "memory",
    }
}

async fn staging_ready(media: &MediaConfig) -> bool {
    match tokio::fs::metadata(&media.upload_dir).await {
        Ok(meta) => meta.is_dir(),
        Err(e) => {
            tracing::warn!(
                dir = %media.upload_dir.display(),
                error = %e,
                "Upload staging directory unavailable",
            );
            false
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = state.courses.health_check().await.is_ok();
    let staging_ready = staging_ready(&state.config.media).await;

    Json(HealthResponse {
        status: if db_healthy && staging_ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        media_backend: backend_name(&state.config.media),
        staging_ready,
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
