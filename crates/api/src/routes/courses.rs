//! Route definitions for courses and their lectures.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;

use crate::config::ServerConfig;
use crate::handlers::{courses, lectures};
use crate::state::AppState;

/// Headroom above the media limit for boundaries and text parts.
const FORM_OVERHEAD_BYTES: u64 = 64 * 1024;

/// Course routes mounted at `/courses`.
///
/// ```text
/// GET    /                            -> list_courses
/// POST   /                            -> create_course
/// GET    /{id}                        -> list_lectures
/// POST   /{id}                        -> add_lecture
/// PUT    /{id}                        -> update_course
/// DELETE /{id}                        -> delete_course
/// PUT    /{id}/lecture/{lecture_id}   -> update_lecture
/// DELETE /{id}/lecture/{lecture_id}   -> delete_lecture
/// ```
///
/// The request body limit is raised to the configured upload limit; the
/// staging layer enforces the per-file limit itself.
pub fn router(config: &ServerConfig) -> Router<AppState> {
    let body_limit = config
        .media
        .max_upload_bytes
        .saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route(
            "/",
            get(courses::list_courses).post(courses::create_course),
        )
        .route(
            "/{id}",
            get(courses::list_lectures)
                .post(courses::add_lecture)
                .put(courses::update_course)
                .delete(courses::delete_course),
        )
        .route(
            "/{id}/lecture/{lecture_id}",
            put(lectures::update_lecture).delete(lectures::delete_lecture),
        )
        .layer(DefaultBodyLimit::max(
            usize::try_from(body_limit).unwrap_or(usize::MAX),
        ))
}
