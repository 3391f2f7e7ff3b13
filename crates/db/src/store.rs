//! Persistence port for the course aggregate.

use async_trait::async_trait;
use lms_core::course::{Course, CourseSummary, NewCourse};
use lms_core::media::MediaRef;
use lms_core::types::DbId;

use crate::models::orphan::{MediaOrphan, NewMediaOrphan};

/// Storage for course aggregates and the orphan ledger.
///
/// Lectures are persisted only as part of their course: [`CourseStore::save`]
/// replaces the whole aggregate, so the lecture sequence and
/// `number_of_lectures` are always written together.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// All courses in creation order, lectures omitted.
    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, sqlx::Error>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<Course>, sqlx::Error>;

    /// Insert a course with no lectures.
    async fn create(&self, input: &NewCourse, thumbnail: &MediaRef)
        -> Result<Course, sqlx::Error>;

    /// Replace a stored aggregate. `number_of_lectures` is recomputed from
    /// the lecture sequence. Returns `None` if the course no longer exists.
    async fn save(&self, course: &Course) -> Result<Option<Course>, sqlx::Error>;

    /// Returns `true` if a course was removed.
    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn record_orphan(&self, input: &NewMediaOrphan) -> Result<MediaOrphan, sqlx::Error>;

    /// Pending orphans, oldest first.
    async fn list_orphans(&self) -> Result<Vec<MediaOrphan>, sqlx::Error>;

    /// Drop an orphan from the ledger once its object is gone.
    async fn resolve_orphan(&self, id: DbId) -> Result<bool, sqlx::Error>;

    async fn health_check(&self) -> Result<(), sqlx::Error>;
}
