//! Row types for the `courses` table.

use lms_core::course::{Course, CourseSummary, Lecture};
use lms_core::media::MediaRef;
use lms_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A full row from the `courses` table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail_object_id: String,
    pub thumbnail_url: String,
    pub lectures: Json<Vec<Lecture>>,
    pub number_of_lectures: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Course {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            created_by: row.created_by,
            thumbnail: MediaRef::new(row.thumbnail_object_id, row.thumbnail_url),
            lectures: row.lectures.0,
            number_of_lectures: row.number_of_lectures,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A `courses` row without the `lectures` column.
#[derive(Debug, Clone, FromRow)]
pub struct CourseSummaryRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub created_by: String,
    pub thumbnail_object_id: String,
    pub thumbnail_url: String,
    pub number_of_lectures: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<CourseSummaryRow> for CourseSummary {
    fn from(row: CourseSummaryRow) -> Self {
        CourseSummary {
            id: row.id,
            title: row.title,
            description: row.description,
            category: row.category,
            created_by: row.created_by,
            thumbnail: MediaRef::new(row.thumbnail_object_id, row.thumbnail_url),
            number_of_lectures: row.number_of_lectures,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
