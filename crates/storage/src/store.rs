//! Object store port.

use std::path::Path;

use async_trait::async_trait;
use lms_core::media::ResourceType;

use crate::error::StorageError;

/// Description of an object about to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSpec {
    pub object_id: String,
    pub resource_type: ResourceType,
    pub content_type: &'static str,
}

/// Port to the external content-hosting service.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload the file at `local_path` and return its public URL.
    async fn put(&self, local_path: &Path, spec: &ObjectSpec) -> Result<String, StorageError>;

    /// Delete a previously stored object.
    async fn delete(&self, object_id: &str, resource_type: ResourceType)
        -> Result<(), StorageError>;
}
