//! Orphan ledger entries: remote objects pending cleanup.

use lms_core::media::ResourceType;
use lms_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Upload succeeded but the document save that should reference it failed.
pub const REASON_SAVE_FAILED: &str = "save_failed";
/// A course thumbnail was replaced; the previous object was kept.
pub const REASON_REPLACED: &str = "replaced";
/// The owning course was deleted; its media is retained until reconciled.
pub const REASON_COURSE_DELETED: &str = "course_deleted";

/// A row from the `media_orphans` table.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct MediaOrphan {
    pub id: DbId,
    pub object_id: String,
    pub resource_type: String,
    pub reason: String,
    pub course_id: Option<DbId>,
    pub lecture_id: Option<Uuid>,
    pub created_at: Timestamp,
}

impl MediaOrphan {
    pub fn resource_type(&self) -> Option<ResourceType> {
        ResourceType::from_name(&self.resource_type)
    }
}

/// DTO for recording an orphan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMediaOrphan {
    pub object_id: String,
    pub resource_type: ResourceType,
    pub reason: &'static str,
    pub course_id: Option<DbId>,
    pub lecture_id: Option<Uuid>,
}
