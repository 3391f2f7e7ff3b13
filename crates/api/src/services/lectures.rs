//! Lecture operations, always scoped to the owning course.

use lms_core::course::{Course, Lecture, LecturePatch, NewLecture};
use lms_core::media::{MediaRef, ResourceType};
use lms_core::types::DbId;
use lms_db::models::orphan::{NewMediaOrphan, REASON_SAVE_FAILED};
use uuid::Uuid;

use super::ContentDeps;
use crate::error::AppResult;
use crate::upload::StagedFile;

pub struct LectureService {
    deps: ContentDeps,
}

impl LectureService {
    pub fn new(deps: ContentDeps) -> Self {
        Self { deps }
    }

    pub async fn list(&self, course_id: DbId) -> AppResult<Vec<Lecture>> {
        Ok(self.deps.load(course_id).await?.lectures)
    }

    /// Append a lecture, uploading its video first if one was supplied.
    ///
    /// A failed upload persists nothing.
    pub async fn add(
        &self,
        course_id: DbId,
        input: NewLecture,
        video: Option<StagedFile>,
    ) -> AppResult<Course> {
        let mut course = self.deps.load(course_id).await?;
        let input = input.normalized()?;
        let lecture_id = course.append_lecture(input);

        let uploaded = match video {
            Some(file) => {
                let media = self.upload_video(file, course_id, lecture_id).await?;
                course.lecture_mut(lecture_id)?.media = media.clone();
                Some(media)
            }
            None => None,
        };

        let saved = self
            .save_with_upload(&course, lecture_id, uploaded.as_ref())
            .await?;
        tracing::info!(course_id, %lecture_id, lectures = saved.number_of_lectures, "Lecture added");
        Ok(saved)
    }

    /// Apply supplied text fields and, if a new video was supplied, replace
    /// the lecture's media.
    ///
    /// Replacement destroys the old object first. If the destroy fails
    /// nothing is persisted. If the upload then fails, the lecture is
    /// persisted with no media before the error is returned.
    pub async fn update(
        &self,
        course_id: DbId,
        lecture_id: Uuid,
        patch: LecturePatch,
        video: Option<StagedFile>,
    ) -> AppResult<Course> {
        let mut course = self.deps.load(course_id).await?;
        patch.apply(course.lecture_mut(lecture_id)?);

        let Some(file) = video else {
            let saved = self.deps.save(&course).await?;
            tracing::info!(course_id, %lecture_id, "Lecture updated");
            return Ok(saved);
        };

        let old = course.lecture(lecture_id)?.media.clone();
        self.deps
            .media
            .destroy(&old.object_id, ResourceType::Video)
            .await?;
        course.lecture_mut(lecture_id)?.media = MediaRef::empty();

        let media = match self.upload_video(file, course_id, lecture_id).await {
            Ok(media) => media,
            Err(e) => {
                if old.is_bound() {
                    tracing::error!(
                        course_id,
                        %lecture_id,
                        old_object_id = %old.object_id,
                        "Old lecture media destroyed but replacement upload failed; lecture has no media",
                    );
                }
                if let Err(save_err) = self.deps.save(&course).await {
                    tracing::error!(
                        course_id,
                        %lecture_id,
                        old_object_id = %old.object_id,
                        error = %save_err,
                        "Could not clear destroyed media reference; lecture points at a missing object",
                    );
                }
                return Err(e);
            }
        };

        course.lecture_mut(lecture_id)?.media = media.clone();
        let saved = self
            .save_with_upload(&course, lecture_id, Some(&media))
            .await
            .inspect_err(|_| {
                if old.is_bound() {
                    tracing::error!(
                        course_id,
                        %lecture_id,
                        old_object_id = %old.object_id,
                        "Stored lecture still references destroyed media",
                    );
                }
            })?;

        tracing::info!(
            course_id,
            %lecture_id,
            object_id = %media.object_id,
            "Lecture media replaced",
        );
        Ok(saved)
    }

    /// Destroy the lecture's media, then remove the lecture.
    ///
    /// If the destroy fails the lecture is kept.
    pub async fn delete(&self, course_id: DbId, lecture_id: Uuid) -> AppResult<Course> {
        let mut course = self.deps.load(course_id).await?;
        let media = course.lecture(lecture_id)?.media.clone();

        self.deps
            .media
            .destroy(&media.object_id, ResourceType::Video)
            .await
            .inspect_err(|_| {
                tracing::error!(
                    course_id,
                    %lecture_id,
                    object_id = %media.object_id,
                    "Lecture media destroy failed; lecture kept for retry",
                );
            })?;

        course.remove_lecture(lecture_id)?;

        let saved = self.deps.save(&course).await.inspect_err(|_| {
            if media.is_bound() {
                tracing::error!(
                    course_id,
                    %lecture_id,
                    object_id = %media.object_id,
                    "Lecture media destroyed but course save failed; dangling reference",
                );
            }
        })?;

        tracing::info!(course_id, %lecture_id, lectures = saved.number_of_lectures, "Lecture deleted");
        Ok(saved)
    }

    async fn upload_video(
        &self,
        file: StagedFile,
        course_id: DbId,
        lecture_id: Uuid,
    ) -> AppResult<MediaRef> {
        let media = self
            .deps
            .media
            .upload(file.path(), &self.deps.upload_options(ResourceType::Video))
            .await
            .inspect_err(|_| {
                tracing::error!(course_id, %lecture_id, "Lecture video upload failed");
            })?;
        Ok(media)
    }

    /// Save after an upload; an object the save fails to reference is
    /// recorded as an orphan.
    async fn save_with_upload(
        &self,
        course: &Course,
        lecture_id: Uuid,
        uploaded: Option<&MediaRef>,
    ) -> AppResult<Course> {
        match self.deps.save(course).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                if let Some(media) = uploaded {
                    tracing::error!(
                        course_id = course.id,
                        %lecture_id,
                        object_id = %media.object_id,
                        "Lecture video uploaded but course save failed",
                    );
                    self.deps
                        .record_orphan(NewMediaOrphan {
                            object_id: media.object_id.clone(),
                            resource_type: ResourceType::Video,
                            reason: REASON_SAVE_FAILED,
                            course_id: Some(course.id),
                            lecture_id: Some(lecture_id),
                        })
                        .await;
                }
                Err(e)
            }
        }
    }
}
