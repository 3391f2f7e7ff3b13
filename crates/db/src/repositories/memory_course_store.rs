//! In-memory implementation of [`CourseStore`].
//!
//! Used by tests and by local runs without PostgreSQL. Saves can be made to
//! fail on demand so callers' partial-failure handling can be exercised.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lms_core::course::{Course, CourseSummary, NewCourse};
use lms_core::media::MediaRef;
use lms_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::orphan::{MediaOrphan, NewMediaOrphan};
use crate::store::CourseStore;

#[derive(Debug, Default)]
struct State {
    courses: BTreeMap<DbId, Course>,
    orphans: Vec<MediaOrphan>,
    last_course_id: DbId,
    last_orphan_id: DbId,
}

#[derive(Debug, Default)]
pub struct MemoryCourseStore {
    state: RwLock<State>,
    fail_saves: AtomicBool,
}

impl MemoryCourseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent [`CourseStore::save`] fail.
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    pub async fn course_count(&self) -> usize {
        self.state.read().await.courses.len()
    }
}

#[async_trait]
impl CourseStore for MemoryCourseStore {
    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, sqlx::Error> {
        let state = self.state.read().await;
        Ok(state.courses.values().map(Course::summary).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        Ok(self.state.read().await.courses.get(&id).cloned())
    }

    async fn create(
        &self,
        input: &NewCourse,
        thumbnail: &MediaRef,
    ) -> Result<Course, sqlx::Error> {
        let mut state = self.state.write().await;
        state.last_course_id += 1;
        let now = chrono::Utc::now();
        let course = Course {
            id: state.last_course_id,
            title: input.title.clone(),
            description: input.description.clone(),
            category: input.category.clone(),
            created_by: input.created_by.clone(),
            thumbnail: thumbnail.clone(),
            lectures: Vec::new(),
            number_of_lectures: 0,
            created_at: now,
            updated_at: now,
        };
        state.courses.insert(course.id, course.clone());
        Ok(course)
    }

    async fn save(&self, course: &Course) -> Result<Option<Course>, sqlx::Error> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(sqlx::Error::Protocol("simulated save failure".into()));
        }

        let mut state = self.state.write().await;
        let Some(stored) = state.courses.get_mut(&course.id) else {
            return Ok(None);
        };

        let created_at = stored.created_at;
        *stored = course.clone();
        stored.sync_lecture_count();
        stored.created_at = created_at;
        stored.updated_at = chrono::Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        Ok(self.state.write().await.courses.remove(&id).is_some())
    }

    async fn record_orphan(&self, input: &NewMediaOrphan) -> Result<MediaOrphan, sqlx::Error> {
        let mut state = self.state.write().await;
        state.last_orphan_id += 1;
        let orphan = MediaOrphan {
            id: state.last_orphan_id,
            object_id: input.object_id.clone(),
            resource_type: input.resource_type.as_str().to_string(),
            reason: input.reason.to_string(),
            course_id: input.course_id,
            lecture_id: input.lecture_id,
            created_at: chrono::Utc::now(),
        };
        state.orphans.push(orphan.clone());
        Ok(orphan)
    }

    async fn list_orphans(&self) -> Result<Vec<MediaOrphan>, sqlx::Error> {
        Ok(self.state.read().await.orphans.clone())
    }

    async fn resolve_orphan(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state.write().await;
        let before = state.orphans.len();
        state.orphans.retain(|o| o.id != id);
        Ok(state.orphans.len() < before)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }
}
