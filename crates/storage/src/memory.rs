//! In-process object store.
//!
//! Keeps object metadata in memory and can be told to fail uploads or
//! deletes, which is how the partial-failure paths of the course services
//! are exercised in tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use lms_core::media::ResourceType;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::store::{ObjectSpec, ObjectStore};

#[derive(Debug, Clone)]
struct StoredObject {
    resource_type: ResourceType,
    size_bytes: u64,
}

#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, StoredObject>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub async fn contains(&self, object_id: &str) -> bool {
        self.objects.read().await.contains_key(object_id)
    }

    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.objects.read().await.is_empty()
    }

    pub async fn size_of(&self, object_id: &str) -> Option<u64> {
        self.objects.read().await.get(object_id).map(|o| o.size_bytes)
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, local_path: &Path, spec: &ObjectSpec) -> Result<String, StorageError> {
        let metadata = tokio::fs::metadata(local_path)
            .await
            .map_err(|source| StorageError::Io {
                path: local_path.to_path_buf(),
                source,
            })?;

        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::Upload {
                object_id: spec.object_id.clone(),
                message: "simulated upload failure".into(),
            });
        }

        self.objects.write().await.insert(
            spec.object_id.clone(),
            StoredObject {
                resource_type: spec.resource_type,
                size_bytes: metadata.len(),
            },
        );
        Ok(format!("memory://{}", spec.object_id))
    }

    async fn delete(
        &self,
        object_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Destroy {
                object_id: object_id.to_string(),
                message: "simulated destroy failure".into(),
            });
        }

        let mut objects = self.objects.write().await;
        match objects.get(object_id) {
            Some(o) if o.resource_type == resource_type => {
                objects.remove(object_id);
                Ok(())
            }
            _ => Err(StorageError::NotFound(object_id.to_string())),
        }
    }
}
