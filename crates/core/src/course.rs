//! The course aggregate.
//!
//! A [`Course`] exclusively owns its ordered [`Lecture`]s. Lectures are only
//! reachable through the owning course's methods, which keep
//! `number_of_lectures` equal to `lectures.len()` after every mutation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::media::{MediaRef, ResourceType};
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// A lecture embedded in a course. Has no existence outside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub media: MediaRef,
}

/// A course document together with its lectures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail: MediaRef,
    pub lectures: Vec<Lecture>,
    pub number_of_lectures: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Listing view of a course with the lectures omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseSummary {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail: MediaRef,
    pub number_of_lectures: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A remote object referenced somewhere inside an aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundMedia {
    /// `None` for the course thumbnail.
    pub lecture_id: Option<Uuid>,
    pub resource_type: ResourceType,
    pub media: MediaRef,
}

impl Course {
    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            created_by: self.created_by.clone(),
            thumbnail: self.thumbnail.clone(),
            number_of_lectures: self.number_of_lectures,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Recompute `number_of_lectures` from the lecture sequence.
    pub fn sync_lecture_count(&mut self) {
        self.number_of_lectures = i32::try_from(self.lectures.len()).unwrap_or(i32::MAX);
    }

    /// Append a lecture with unset media and return its id.
    pub fn append_lecture(&mut self, input: NewLecture) -> Uuid {
        let id = Uuid::now_v7();
        self.lectures.push(Lecture {
            id,
            title: input.title,
            description: input.description,
            media: MediaRef::empty(),
        });
        self.sync_lecture_count();
        id
    }

    /// Position of a lecture in display order.
    ///
    /// Linear scan; lecture counts per course are small.
    pub fn lecture_position(&self, lecture_id: Uuid) -> Option<usize> {
        self.lectures.iter().position(|l| l.id == lecture_id)
    }

    pub fn lecture(&self, lecture_id: Uuid) -> Result<&Lecture, CoreError> {
        self.lectures
            .iter()
            .find(|l| l.id == lecture_id)
            .ok_or_else(|| CoreError::not_found("Lecture", lecture_id))
    }

    pub fn lecture_mut(&mut self, lecture_id: Uuid) -> Result<&mut Lecture, CoreError> {
        self.lectures
            .iter_mut()
            .find(|l| l.id == lecture_id)
            .ok_or_else(|| CoreError::not_found("Lecture", lecture_id))
    }

    /// Remove a lecture by id, returning it. The sequence and count are left
    /// untouched when the id is absent.
    pub fn remove_lecture(&mut self, lecture_id: Uuid) -> Result<Lecture, CoreError> {
        let index = self
            .lecture_position(lecture_id)
            .ok_or_else(|| CoreError::not_found("Lecture", lecture_id))?;
        let removed = self.lectures.remove(index);
        self.sync_lecture_count();
        Ok(removed)
    }

    /// Every remote object this aggregate points at.
    pub fn bound_media(&self) -> Vec<BoundMedia> {
        let thumbnail = self.thumbnail.is_bound().then(|| BoundMedia {
            lecture_id: None,
            resource_type: ResourceType::Image,
            media: self.thumbnail.clone(),
        });

        thumbnail
            .into_iter()
            .chain(
                self.lectures
                    .iter()
                    .filter(|l| l.media.is_bound())
                    .map(|l| BoundMedia {
                        lecture_id: Some(l.id),
                        resource_type: ResourceType::Video,
                        media: l.media.clone(),
                    }),
            )
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Fields required to create a course.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewCourse {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub category: String,
    #[validate(length(min = 1))]
    pub created_by: String,
}

impl NewCourse {
    /// Trim every field and require all of them to be non-empty.
    pub fn normalized(self) -> Result<Self, CoreError> {
        let input = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category.trim().to_string(),
            created_by: self.created_by.trim().to_string(),
        };
        input.validate().map_err(required_fields_error)?;
        Ok(input)
    }
}

/// Shallow partial update of a course's text fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub created_by: Option<String>,
}

impl CoursePatch {
    /// Apply supplied fields. Blank values count as omitted.
    pub fn apply(&self, course: &mut Course) {
        merge(&mut course.title, self.title.as_deref());
        merge(&mut course.description, self.description.as_deref());
        merge(&mut course.category, self.category.as_deref());
        merge(&mut course.created_by, self.created_by.as_deref());
    }

    pub fn is_empty(&self) -> bool {
        [&self.title, &self.description, &self.category, &self.created_by]
            .iter()
            .all(|f| supplied(f.as_deref()).is_none())
    }
}

/// Fields required to append a lecture.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewLecture {
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
}

impl NewLecture {
    pub fn normalized(self) -> Result<Self, CoreError> {
        let input = Self {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
        };
        input.validate().map_err(required_fields_error)?;
        Ok(input)
    }
}

/// Partial update of a lecture's text fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LecturePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl LecturePatch {
    /// Apply supplied fields. Blank values count as omitted.
    pub fn apply(&self, lecture: &mut Lecture) {
        merge(&mut lecture.title, self.title.as_deref());
        merge(&mut lecture.description, self.description.as_deref());
    }
}

fn supplied(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn merge(target: &mut String, value: Option<&str>) {
    if let Some(v) = supplied(value) {
        *target = v.to_string();
    }
}

fn required_fields_error(errors: ValidationErrors) -> CoreError {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|k| k.to_string())
        .collect();
    fields.sort();
    CoreError::Validation(format!("All fields are required (missing: {})", fields.join(", ")))
}
