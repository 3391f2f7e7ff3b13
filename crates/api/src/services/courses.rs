//! Course aggregate operations.

use lms_core::course::{Course, CoursePatch, CourseSummary, NewCourse};
use lms_core::error::CoreError;
use lms_core::media::{MediaRef, ResourceType};
use lms_core::types::DbId;
use lms_db::models::orphan::{
    NewMediaOrphan, REASON_COURSE_DELETED, REASON_REPLACED, REASON_SAVE_FAILED,
};

use super::ContentDeps;
use crate::error::AppResult;
use crate::upload::StagedFile;

pub struct CourseService {
    deps: ContentDeps,
}

impl CourseService {
    pub fn new(deps: ContentDeps) -> Self {
        Self { deps }
    }

    /// All courses, lectures omitted.
    pub async fn list(&self) -> AppResult<Vec<CourseSummary>> {
        Ok(self.deps.store.list_summaries().await?)
    }

    /// Create a course with the placeholder thumbnail, then bind the
    /// uploaded thumbnail if one was supplied.
    ///
    /// The course row survives a failed thumbnail upload.
    pub async fn create(
        &self,
        input: NewCourse,
        thumbnail: Option<StagedFile>,
    ) -> AppResult<Course> {
        let input = input.normalized()?;
        let course = self
            .deps
            .store
            .create(&input, &MediaRef::placeholder())
            .await?;

        tracing::info!(course_id = course.id, title = %course.title, "Course created");

        match thumbnail {
            Some(file) => self.bind_thumbnail(course, &file).await,
            None => Ok(course),
        }
    }

    /// Shallow-merge supplied fields, then replace the thumbnail if a new
    /// file was supplied. Field changes are persisted before the upload.
    ///
    /// The previous thumbnail object is not destroyed here; it goes to the
    /// orphan ledger.
    pub async fn update(
        &self,
        course_id: DbId,
        patch: CoursePatch,
        thumbnail: Option<StagedFile>,
    ) -> AppResult<Course> {
        let mut course = self.deps.load(course_id).await?;

        if !patch.is_empty() {
            patch.apply(&mut course);
            course = self.deps.save(&course).await?;
            tracing::info!(course_id, "Course fields updated");
        }

        match thumbnail {
            Some(file) => self.bind_thumbnail(course, &file).await,
            None => Ok(course),
        }
    }

    /// Delete the course document. Its remote media is retained and
    /// recorded in the orphan ledger.
    pub async fn remove(&self, course_id: DbId) -> AppResult<()> {
        let course = self.deps.load(course_id).await?;

        if !self.deps.store.delete(course_id).await? {
            return Err(CoreError::not_found("Course", course_id).into());
        }
        tracing::info!(course_id, lectures = course.number_of_lectures, "Course deleted");

        for bound in course.bound_media() {
            self.deps
                .record_orphan(NewMediaOrphan {
                    object_id: bound.media.object_id,
                    resource_type: bound.resource_type,
                    reason: REASON_COURSE_DELETED,
                    course_id: Some(course_id),
                    lecture_id: bound.lecture_id,
                })
                .await;
        }
        Ok(())
    }

    async fn bind_thumbnail(&self, mut course: Course, file: &StagedFile) -> AppResult<Course> {
        let media = self
            .deps
            .media
            .upload(file.path(), &self.deps.upload_options(ResourceType::Image))
            .await
            .inspect_err(|_| {
                tracing::error!(
                    course_id = course.id,
                    "Thumbnail upload failed; course keeps its previous thumbnail",
                );
            })?;

        let previous = std::mem::replace(&mut course.thumbnail, media.clone());

        match self.deps.save(&course).await {
            Ok(saved) => {
                tracing::info!(
                    course_id = saved.id,
                    object_id = %media.object_id,
                    "Course thumbnail bound",
                );
                if previous.is_bound() {
                    self.deps
                        .record_orphan(NewMediaOrphan {
                            object_id: previous.object_id,
                            resource_type: ResourceType::Image,
                            reason: REASON_REPLACED,
                            course_id: Some(saved.id),
                            lecture_id: None,
                        })
                        .await;
                }
                Ok(saved)
            }
            Err(e) => {
                tracing::error!(
                    course_id = course.id,
                    object_id = %media.object_id,
                    "Thumbnail uploaded but course save failed",
                );
                self.deps
                    .record_orphan(NewMediaOrphan {
                        object_id: media.object_id,
                        resource_type: ResourceType::Image,
                        reason: REASON_SAVE_FAILED,
                        course_id: Some(course.id),
                        lecture_id: None,
                    })
                    .await;
                Err(e)
            }
        }
    }
}
