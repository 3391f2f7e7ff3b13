use std::path::PathBuf;

/// Failures talking to the remote object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Failed to read staged file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Upload of {object_id} failed: {message}")]
    Upload { object_id: String, message: String },

    #[error("Destroy of {object_id} failed: {message}")]
    Destroy { object_id: String, message: String },

    #[error("Object {0} not found")]
    NotFound(String),
}
