//! Extractors whose rejections use the API's JSON error envelope.

use axum::extract::rejection::PathRejection;
use axum::extract::FromRequestParts;

use crate::error::AppError;

/// `Path` whose parse failures are answered as `400 BAD_REQUEST` JSON.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}
