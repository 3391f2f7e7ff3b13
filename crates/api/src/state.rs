use std::sync::Arc;

use lms_db::CourseStore;
use lms_storage::MediaUploader;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Course aggregate storage and orphan ledger.
    pub courses: Arc<dyn CourseStore>,
    /// Remote media upload/destroy.
    pub media: MediaUploader,
    /// Server configuration (JWT secret, staging directory, ...).
    pub config: Arc<ServerConfig>,
}
