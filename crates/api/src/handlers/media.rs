//! Admin handlers for the orphaned-media ledger.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::reconcile::reconcile_orphans;
use crate::services::run_to_completion;
use crate::state::AppState;

/// GET /api/v1/admin/media/orphans
pub async fn list_orphans(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let orphans = state.courses.list_orphans().await?;
    Ok(Json(DataResponse { data: orphans }))
}

/// POST /api/v1/admin/media/reconcile
///
/// Destroy pending orphans once and report the outcome.
pub async fn reconcile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let courses = state.courses.clone();
    let media = state.media.clone();
    let report =
        run_to_completion(async move { reconcile_orphans(courses.as_ref(), &media).await })
            .await?;

    tracing::info!(
        user_id = admin.identity.user_id,
        destroyed = report.destroyed,
        failed = report.failed,
        "Media reconciliation requested",
    );

    Ok(Json(DataResponse { data: report }))
}
