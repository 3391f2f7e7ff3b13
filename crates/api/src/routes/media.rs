//! Admin routes for orphaned media, mounted at `/admin/media`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// ```text
/// GET  /orphans    -> list_orphans
/// POST /reconcile  -> reconcile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orphans", get(media::list_orphans))
        .route("/reconcile", post(media::reconcile))
}
