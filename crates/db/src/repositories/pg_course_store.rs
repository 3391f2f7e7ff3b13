//! PostgreSQL implementation of [`CourseStore`].

use async_trait::async_trait;
use lms_core::course::{Course, CourseSummary, NewCourse};
use lms_core::media::MediaRef;
use lms_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::course::{CourseRow, CourseSummaryRow};
use crate::models::orphan::{MediaOrphan, NewMediaOrphan};
use crate::store::CourseStore;

/// Column list shared across full-aggregate queries.
const COLUMNS: &str = "id, title, description, category, created_by, \
    thumbnail_object_id, thumbnail_url, lectures, number_of_lectures, created_at, updated_at";

/// Column list for the listing view (no `lectures`).
const SUMMARY_COLUMNS: &str = "id, title, description, category, created_by, \
    thumbnail_object_id, thumbnail_url, number_of_lectures, created_at, updated_at";

const ORPHAN_COLUMNS: &str =
    "id, object_id, resource_type, reason, course_id, lecture_id, created_at";

#[derive(Debug, Clone)]
pub struct PgCourseStore {
    pool: PgPool,
}

impl PgCourseStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseStore for PgCourseStore {
    async fn list_summaries(&self) -> Result<Vec<CourseSummary>, sqlx::Error> {
        let query = format!("SELECT {SUMMARY_COLUMNS} FROM courses ORDER BY created_at, id");
        let rows = sqlx::query_as::<_, CourseSummaryRow>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(CourseSummary::from).collect())
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        let row = sqlx::query_as::<_, CourseRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Course::from))
    }

    async fn create(
        &self,
        input: &NewCourse,
        thumbnail: &MediaRef,
    ) -> Result<Course, sqlx::Error> {
        let query = format!(
            "INSERT INTO courses
                (title, description, category, created_by, thumbnail_object_id, thumbnail_url)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.created_by)
            .bind(&thumbnail.object_id)
            .bind(&thumbnail.url)
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn save(&self, course: &Course) -> Result<Option<Course>, sqlx::Error> {
        let mut course = course.clone();
        course.sync_lecture_count();

        let query = format!(
            "UPDATE courses SET
                title = $2,
                description = $3,
                category = $4,
                created_by = $5,
                thumbnail_object_id = $6,
                thumbnail_url = $7,
                lectures = $8,
                number_of_lectures = $9,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, CourseRow>(&query)
            .bind(course.id)
            .bind(&course.title)
            .bind(&course.description)
            .bind(&course.category)
            .bind(&course.created_by)
            .bind(&course.thumbnail.object_id)
            .bind(&course.thumbnail.url)
            .bind(Json(&course.lectures))
            .bind(course.number_of_lectures)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Course::from))
    }

    async fn delete(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn record_orphan(&self, input: &NewMediaOrphan) -> Result<MediaOrphan, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_orphans (object_id, resource_type, reason, course_id, lecture_id)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {ORPHAN_COLUMNS}"
        );
        sqlx::query_as::<_, MediaOrphan>(&query)
            .bind(&input.object_id)
            .bind(input.resource_type.as_str())
            .bind(input.reason)
            .bind(input.course_id)
            .bind(input.lecture_id)
            .fetch_one(&self.pool)
            .await
    }

    async fn list_orphans(&self) -> Result<Vec<MediaOrphan>, sqlx::Error> {
        let query = format!("SELECT {ORPHAN_COLUMNS} FROM media_orphans ORDER BY created_at, id");
        sqlx::query_as::<_, MediaOrphan>(&query)
            .fetch_all(&self.pool)
            .await
    }

    async fn resolve_orphan(&self, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM media_orphans WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }
}
