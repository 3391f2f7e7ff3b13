//! Media staging for multipart uploads.
//!
//! A file part is accepted only if its declared extension is allowed; the
//! check happens before a single byte is written. Accepted files are
//! streamed to the staging directory under a fresh UUID name and are
//! removed when the [`StagedFile`] guard drops, so a request that fails
//! after staging never leaves a file behind.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use lms_core::error::CoreError;
use lms_core::media::{accepted_extension, staged_filename};
use tokio::io::AsyncWriteExt;

use crate::config::MediaConfig;
use crate::error::{AppError, AppResult};

/// A file written to the staging directory for the duration of a request.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
    original_name: String,
    size_bytes: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        // Usually already gone: the uploader removes it after every attempt.
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove staged file");
            }
        }
    }
}

/// Writes accepted uploads into the staging directory.
#[derive(Debug, Clone)]
pub struct MediaStager {
    dir: PathBuf,
    max_bytes: u64,
}

impl MediaStager {
    pub fn new(dir: impl Into<PathBuf>, max_bytes: u64) -> Self {
        Self {
            dir: dir.into(),
            max_bytes,
        }
    }

    pub fn from_config(config: &MediaConfig) -> Self {
        Self::new(config.upload_dir.clone(), config.max_upload_bytes)
    }

    /// Validate and stream one multipart file part to disk.
    pub async fn stage(&self, mut field: Field<'_>) -> AppResult<StagedFile> {
        let original_name = field.file_name().unwrap_or_default().to_string();
        let ext = accepted_extension(&original_name)?;

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| AppError::InternalError(format!("Cannot create upload dir: {e}")))?;

        let path = self.dir.join(staged_filename(&ext));
        let mut file = tokio::fs::File::create(&path)
            .await
            .map_err(|e| AppError::InternalError(format!("Cannot create staged file: {e}")))?;

        let mut staged = StagedFile {
            path,
            original_name,
            size_bytes: 0,
        };

        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            staged.size_bytes += chunk.len() as u64;
            if staged.size_bytes > self.max_bytes {
                return Err(CoreError::PayloadTooLarge(format!(
                    "Upload exceeds the {} byte limit",
                    self.max_bytes
                ))
                .into());
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| AppError::InternalError(format!("Cannot write staged file: {e}")))?;
        }
        file.flush()
            .await
            .map_err(|e| AppError::InternalError(format!("Cannot write staged file: {e}")))?;

        tracing::debug!(
            path = %staged.path.display(),
            original_name = %staged.original_name,
            size_bytes = staged.size_bytes,
            "Upload staged",
        );
        Ok(staged)
    }
}

/// Text fields plus at most one staged file from a multipart form.
#[derive(Debug, Default)]
pub struct MediaForm {
    fields: HashMap<String, String>,
    pub file: Option<StagedFile>,
}

impl MediaForm {
    /// Read a whole multipart body, staging the part named `file_field`.
    ///
    /// A file part with an empty filename (an untouched file input) counts
    /// as no file. A file part under any other name is a bad request.
    pub async fn read(
        multipart: &mut Multipart,
        stager: &MediaStager,
        file_field: &str,
    ) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
            let name = field.name().unwrap_or_default().to_string();
            let file_name = field.file_name().map(str::to_string);

            match file_name {
                Some(file_name) if file_name.is_empty() => {}
                Some(_) if name == file_field => {
                    if form.file.is_some() {
                        return Err(AppError::BadRequest(format!(
                            "Only one '{file_field}' file may be uploaded"
                        )));
                    }
                    form.file = Some(stager.stage(field).await?);
                }
                Some(_) => {
                    return Err(AppError::BadRequest(format!(
                        "Unexpected file field '{name}'; expected '{file_field}'"
                    )));
                }
                None => {
                    let text = field.text().await.map_err(multipart_error)?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    /// Take the first present value among `names` (aliases of one field).
    pub fn take(&mut self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|n| self.fields.remove(*n))
    }
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Core(CoreError::PayloadTooLarge(err.body_text()))
    } else {
        AppError::BadRequest(err.body_text())
    }
}
