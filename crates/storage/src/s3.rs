//! S3-backed object store.

use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use lms_core::media::ResourceType;

use crate::error::StorageError;
use crate::store::{ObjectSpec, ObjectStore};

/// Connection settings for [`S3ObjectStore`].
#[derive(Debug, Clone)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible services (MinIO, R2, ...).
    /// Enables path-style addressing when set.
    pub endpoint: Option<String>,
    /// Base URL objects are served from. Defaults to the virtual-hosted
    /// bucket URL.
    pub public_base_url: Option<String>,
}

impl S3Config {
    fn resolved_base_url(&self) -> String {
        match &self.public_base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
        }
    }
}

pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS credential chain.
    pub async fn connect(config: &S3Config) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = Builder::from(&shared);
        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(
            bucket = %config.bucket,
            region = %config.region,
            endpoint = ?config.endpoint,
            "S3 object store configured",
        );

        Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: config.resolved_base_url(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, local_path: &Path, spec: &ObjectSpec) -> Result<String, StorageError> {
        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::Upload {
                object_id: spec.object_id.clone(),
                message: e.to_string(),
            })?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&spec.object_id)
            .content_type(spec.content_type)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                object_id: spec.object_id.clone(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(format!("{}/{}", self.public_base_url, spec.object_id))
    }

    async fn delete(
        &self,
        object_id: &str,
        resource_type: ResourceType,
    ) -> Result<(), StorageError> {
        tracing::debug!(object_id, %resource_type, bucket = %self.bucket, "Deleting S3 object");

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(object_id)
            .send()
            .await
            .map_err(|e| StorageError::Destroy {
                object_id: object_id.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}
