//! Handlers for lectures nested under a course:
//! `/courses/{id}/lecture/{lecture_id}`

use axum::extract::{Multipart, State};
use axum::response::IntoResponse;
use axum::Json;
use lms_core::course::LecturePatch;
use lms_core::types::DbId;
use uuid::Uuid;

use super::courses::{lecture_service, read_form, LECTURE_FIELD};
use crate::error::AppResult;
use crate::extract::ApiPath;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::run_to_completion;
use crate::state::AppState;

/// PUT /api/v1/courses/{id}/lecture/{lecture_id}
///
/// Multipart: optional `lecture` video plus `title` and/or `description`.
pub async fn update_lecture(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath((course_id, lecture_id)): ApiPath<(DbId, Uuid)>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = read_form(&state, &mut multipart, LECTURE_FIELD).await?;
    let patch = LecturePatch {
        title: form.take(&["title"]),
        description: form.take(&["description"]),
    };

    let service = lecture_service(&state);
    let video = form.file.take();
    let course = run_to_completion(async move {
        service.update(course_id, lecture_id, patch, video).await
    })
    .await?;

    tracing::info!(
        course_id,
        %lecture_id,
        user_id = admin.identity.user_id,
        "Lecture update request completed",
    );

    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}/lecture/{lecture_id}
pub async fn delete_lecture(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath((course_id, lecture_id)): ApiPath<(DbId, Uuid)>,
) -> AppResult<impl IntoResponse> {
    let service = lecture_service(&state);
    let course =
        run_to_completion(async move { service.delete(course_id, lecture_id).await }).await?;

    tracing::info!(
        course_id,
        %lecture_id,
        user_id = admin.identity.user_id,
        "Lecture delete request completed",
    );

    Ok(Json(DataResponse { data: course }))
}
