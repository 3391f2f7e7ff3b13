//! Handlers for the `/courses` resource.

use axum::extract::{Multipart, State};
use axum::http::header::CACHE_CONTROL;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use lms_core::course::{CoursePatch, NewCourse, NewLecture};
use lms_core::types::DbId;
use serde::Serialize;

use crate::error::AppResult;
use crate::extract::ApiPath;
use crate::middleware::rbac::{RequireAdmin, RequireSubscriber};
use crate::response::DataResponse;
use crate::services::{run_to_completion, ContentDeps, CourseService, LectureService};
use crate::state::AppState;
use crate::upload::{MediaForm, MediaStager};

/// Multipart part carrying a course thumbnail.
const THUMBNAIL_FIELD: &str = "thumbnail";
/// Multipart part carrying a lecture video.
pub(crate) const LECTURE_FIELD: &str = "lecture";

const NO_STORE: &str = "no-store, no-cache, must-revalidate, private";

/// Confirmation body for `DELETE /courses/{id}`.
#[derive(Debug, Serialize)]
pub struct DeletedCourse {
    pub id: DbId,
    pub deleted: bool,
}

fn course_service(state: &AppState) -> CourseService {
    CourseService::new(ContentDeps::from_state(state))
}

pub(crate) fn lecture_service(state: &AppState) -> LectureService {
    LectureService::new(ContentDeps::from_state(state))
}

pub(crate) async fn read_form(
    state: &AppState,
    multipart: &mut Multipart,
    file_field: &str,
) -> AppResult<MediaForm> {
    let stager = MediaStager::from_config(&state.config.media);
    MediaForm::read(multipart, &stager, file_field).await
}

/// GET /api/v1/courses
///
/// Public course listing, lectures omitted.
pub async fn list_courses(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let courses = course_service(&state).list().await?;
    Ok(([(CACHE_CONTROL, NO_STORE)], Json(DataResponse { data: courses })))
}

/// POST /api/v1/courses
///
/// Multipart: optional `thumbnail` file plus `title`, `description`,
/// `category`, `created_by` (or `createdBy`).
pub async fn create_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = read_form(&state, &mut multipart, THUMBNAIL_FIELD).await?;
    let input = NewCourse {
        title: form.take(&["title"]).unwrap_or_default(),
        description: form.take(&["description"]).unwrap_or_default(),
        category: form.take(&["category"]).unwrap_or_default(),
        created_by: form.take(&["created_by", "createdBy"]).unwrap_or_default(),
    };

    let service = course_service(&state);
    let thumbnail = form.file.take();
    let course = run_to_completion(async move { service.create(input, thumbnail).await }).await?;

    tracing::info!(
        course_id = course.id,
        user_id = admin.identity.user_id,
        "Course create request completed",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: course })))
}

/// GET /api/v1/courses/{id}
///
/// Lectures of a course. Subscribers and admins only.
pub async fn list_lectures(
    RequireSubscriber(_user): RequireSubscriber,
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let lectures = lecture_service(&state).list(course_id).await?;
    Ok(Json(DataResponse { data: lectures }))
}

/// PUT /api/v1/courses/{id}
///
/// Multipart: optional `thumbnail` file plus any subset of the text fields.
pub async fn update_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = read_form(&state, &mut multipart, THUMBNAIL_FIELD).await?;
    let patch = CoursePatch {
        title: form.take(&["title"]),
        description: form.take(&["description"]),
        category: form.take(&["category"]),
        created_by: form.take(&["created_by", "createdBy"]),
    };

    let service = course_service(&state);
    let thumbnail = form.file.take();
    let course =
        run_to_completion(async move { service.update(course_id, patch, thumbnail).await })
            .await?;

    tracing::info!(course_id, user_id = admin.identity.user_id, "Course update request completed");

    Ok(Json(DataResponse { data: course }))
}

/// DELETE /api/v1/courses/{id}
pub async fn delete_course(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let service = course_service(&state);
    run_to_completion(async move { service.remove(course_id).await }).await?;

    tracing::info!(course_id, user_id = admin.identity.user_id, "Course delete request completed");

    Ok(Json(DataResponse {
        data: DeletedCourse {
            id: course_id,
            deleted: true,
        },
    }))
}

/// POST /api/v1/courses/{id}
///
/// Multipart: optional `lecture` video plus `title` and `description`.
pub async fn add_lecture(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    ApiPath(course_id): ApiPath<DbId>,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = read_form(&state, &mut multipart, LECTURE_FIELD).await?;
    let input = NewLecture {
        title: form.take(&["title"]).unwrap_or_default(),
        description: form.take(&["description"]).unwrap_or_default(),
    };

    let service = lecture_service(&state);
    let video = form.file.take();
    let course =
        run_to_completion(async move { service.add(course_id, input, video).await }).await?;

    tracing::info!(course_id, user_id = admin.identity.user_id, "Lecture add request completed");

    Ok(Json(DataResponse { data: course }))
}
