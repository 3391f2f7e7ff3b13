//! Course and lecture orchestration.
//!
//! Each operation runs as one linear chain: load the aggregate, mutate it,
//! call the object store, persist. Handlers run these chains through
//! [`run_to_completion`], so a timed-out or abandoned request cannot stop a
//! chain between a remote call and the save that follows it.
//!
//! Nothing is rolled back automatically; objects a failure leaves
//! unreferenced are written to the orphan ledger, and references to
//! destroyed objects are logged for manual repair.

pub mod courses;
pub mod lectures;
pub mod reconcile;

use std::future::Future;
use std::sync::Arc;

use lms_core::course::Course;
use lms_core::error::CoreError;
use lms_core::media::ResourceType;
use lms_core::types::DbId;
use lms_db::models::orphan::NewMediaOrphan;
use lms_db::CourseStore;
use lms_storage::{MediaUploader, UploadOptions};
use tracing::Instrument;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub use courses::CourseService;
pub use lectures::LectureService;

/// Run a content chain on its own task and wait for its result.
///
/// Dropping the returned future (request timeout, client disconnect) leaves
/// the task running to completion. The task stays inside the caller's span.
pub async fn run_to_completion<F, T>(chain: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(chain.in_current_span()).await.map_err(|e| {
        tracing::error!(error = %e, "Content task aborted");
        AppError::InternalError(format!("Content task aborted: {e}"))
    })?
}

/// Dependencies shared by the course and lecture services.
#[derive(Clone)]
pub struct ContentDeps {
    pub store: Arc<dyn CourseStore>,
    pub media: MediaUploader,
    pub folder: String,
}

impl ContentDeps {
    pub fn from_state(state: &AppState) -> Self {
        Self {
            store: Arc::clone(&state.courses),
            media: state.media.clone(),
            folder: state.config.media.folder.clone(),
        }
    }

    fn upload_options(&self, resource_type: ResourceType) -> UploadOptions {
        UploadOptions::new(self.folder.clone(), resource_type)
    }

    async fn load(&self, course_id: DbId) -> AppResult<Course> {
        Ok(self
            .store
            .find_by_id(course_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Course", course_id))?)
    }

    /// Persist the aggregate, treating a vanished row as not found.
    async fn save(&self, course: &Course) -> AppResult<Course> {
        Ok(self
            .store
            .save(course)
            .await?
            .ok_or_else(|| CoreError::not_found("Course", course.id))?)
    }

    /// Write an orphan to the ledger. Failures are logged, never returned.
    async fn record_orphan(&self, orphan: NewMediaOrphan) {
        match self.store.record_orphan(&orphan).await {
            Ok(recorded) => tracing::warn!(
                orphan_id = recorded.id,
                object_id = %orphan.object_id,
                reason = orphan.reason,
                course_id = ?orphan.course_id,
                lecture_id = ?orphan.lecture_id,
                "Remote media marked for cleanup",
            ),
            Err(e) => tracing::error!(
                object_id = %orphan.object_id,
                reason = orphan.reason,
                course_id = ?orphan.course_id,
                lecture_id = ?orphan.lecture_id,
                error = %e,
                "Failed to record orphaned media; manual cleanup required",
            ),
        }
    }
}
