//! Media reference types and upload acceptance rules.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// File extensions accepted for staging (lowercase, without the dot).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "mp4"];

/// Maximum accepted upload size (500 MB).
pub const MAX_UPLOAD_BYTES: u64 = 500 * 1024 * 1024;

/// Object id and URL written onto a course created without a thumbnail.
pub const PLACEHOLDER: &str = "Dummy";

// ---------------------------------------------------------------------------
// Media references
// ---------------------------------------------------------------------------

/// Weak reference to an object held in the remote object store.
///
/// The core records the identifier but does not own the object's lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub object_id: String,
    pub url: String,
}

impl MediaRef {
    pub fn new(object_id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            url: url.into(),
        }
    }

    /// The `{Dummy, Dummy}` thumbnail of a course created without a file.
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER, PLACEHOLDER)
    }

    /// The unset reference of a lecture whose media has not been uploaded.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this points at a real remote object (neither empty nor the
    /// placeholder).
    pub fn is_bound(&self) -> bool {
        !self.object_id.is_empty() && self.object_id != PLACEHOLDER
    }
}

/// Kind of remote object, mirrored into object ids and content types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "image" => Some(Self::Image),
            "video" => Some(Self::Video),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Acceptance rules
// ---------------------------------------------------------------------------

/// Extract and validate the extension of an uploaded file's declared name.
///
/// Returns the lowercase extension without the dot. Names with no extension
/// or with an extension outside [`ALLOWED_EXTENSIONS`] are rejected.
pub fn accepted_extension(filename: &str) -> Result<String, CoreError> {
    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::UnsupportedMediaType(format!(
            "Unsupported file type '.{ext}'. Supported: .jpg, .jpeg, .png, .webp, .mp4"
        )))
    }
}

/// Globally unique staging filename, independent of the uploaded name.
pub fn staged_filename(ext: &str) -> String {
    format!("{}.{ext}", Uuid::new_v4())
}

/// MIME type for an accepted extension.
pub fn content_type_for(ext: &str) -> &'static str {
    match ext {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "webp" => "image/webp",
        "mp4" => "video/mp4",
        _ => "application/octet-stream",
    }
}
