//! Upload orchestration between the local staging area and the object store.

use std::path::Path;
use std::sync::Arc;

use lms_core::media::{content_type_for, MediaRef, ResourceType};
use uuid::Uuid;

use crate::error::StorageError;
use crate::store::{ObjectSpec, ObjectStore};

/// Where and as what an upload is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub folder: String,
    pub resource_type: ResourceType,
}

impl UploadOptions {
    pub fn new(folder: impl Into<String>, resource_type: ResourceType) -> Self {
        Self {
            folder: folder.into(),
            resource_type,
        }
    }
}

/// Pushes staged files to the object store and destroys stored objects.
///
/// One attempt per call, no retry. The staged file is removed after every
/// upload attempt whatever its outcome; removal failures are logged only.
#[derive(Clone)]
pub struct MediaUploader {
    store: Arc<dyn ObjectStore>,
}

impl MediaUploader {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }

    /// Upload the staged file at `local_path`.
    pub async fn upload(
        &self,
        local_path: &Path,
        options: &UploadOptions,
    ) -> Result<MediaRef, StorageError> {
        let spec = object_spec(local_path, options);
        let result = self.store.put(local_path, &spec).await;
        discard_staged(local_path).await;

        match result {
            Ok(url) => {
                tracing::info!(
                    object_id = %spec.object_id,
                    resource_type = %options.resource_type,
                    "Media uploaded",
                );
                Ok(MediaRef::new(spec.object_id, url))
            }
            Err(e) => {
                tracing::error!(
                    object_id = %spec.object_id,
                    resource_type = %options.resource_type,
                    error = %e,
                    "Media upload failed",
                );
                Err(e)
            }
        }
    }

    /// Destroy a stored object. Unset and placeholder ids are a no-op, and
    /// an object the store no longer has counts as destroyed.
    pub async fn destroy(
        &self,
        object_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        if !MediaRef::new(object_id, "").is_bound() {
            return Ok(());
        }

        match self.store.delete(object_id, resource_type).await {
            Ok(()) => {
                tracing::info!(object_id, %resource_type, "Media destroyed");
                Ok(())
            }
            Err(StorageError::NotFound(_)) => {
                tracing::warn!(object_id, %resource_type, "Media already absent from store");
                Ok(())
            }
            Err(e) => {
                tracing::error!(object_id, %resource_type, error = %e, "Media destroy failed");
                Err(e)
            }
        }
    }
}

/// Best-effort removal of a staged file.
pub async fn discard_staged(local_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(local_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(
                path = %local_path.display(),
                error = %e,
                "Failed to remove staged upload",
            );
        }
    }
}

/// Object id layout: `<folder>/<resource_type>/<uuid>[.<ext>]`.
fn object_spec(local_path: &Path, options: &UploadOptions) -> ObjectSpec {
    let ext = local_path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let stem = Uuid::new_v4();
    let object_id = match &ext {
        Some(ext) => format!("{}/{}/{stem}.{ext}", options.folder, options.resource_type),
        None => format!("{}/{}/{stem}", options.folder, options.resource_type),
    };

    ObjectSpec {
        object_id,
        resource_type: options.resource_type,
        content_type: content_type_for(ext.as_deref().unwrap_or_default()),
    }
}
