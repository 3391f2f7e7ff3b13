pub mod courses;
pub mod health;
pub mod media;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /courses                                   list (public), create (admin)
/// /courses/{id}                              lectures (subscriber/admin),
///                                            add lecture, update, delete (admin)
/// /courses/{id}/lecture/{lecture_id}         update, delete lecture (admin)
///
/// /admin/media/orphans                       orphaned media ledger (admin)
/// /admin/media/reconcile                     destroy pending orphans (admin)
/// ```
pub fn api_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .nest("/courses", courses::router(config))
        .nest("/admin/media", media::router())
}
