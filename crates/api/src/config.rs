use std::path::PathBuf;

use lms_core::media::MAX_UPLOAD_BYTES;
use lms_storage::S3Config;

use crate::auth::jwt::JwtConfig;

/// Which object store backs course media.
#[derive(Debug, Clone)]
pub enum MediaBackend {
    S3(S3Config),
    /// In-process store; objects are lost on restart. Local development only.
    Memory,
}

/// Media staging and object-store settings.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Directory uploads are staged in before being pushed to the store.
    pub upload_dir: PathBuf,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: u64,
    /// Folder prefix for every stored object id.
    pub folder: String,
    pub backend: MediaBackend,
}

impl MediaConfig {
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `UPLOAD_DIR`            | `uploads`                |
    /// | `MAX_UPLOAD_BYTES`      | `524288000` (500 MB)     |
    /// | `MEDIA_FOLDER`          | `lms`                    |
    /// | `MEDIA_BACKEND`         | `s3` (`memory` allowed)  |
    /// | `S3_BUCKET`             | required for `s3`        |
    /// | `S3_REGION`             | `us-east-1`              |
    /// | `S3_ENDPOINT`           | unset                    |
    /// | `MEDIA_PUBLIC_BASE_URL` | unset                    |
    pub fn from_env() -> Self {
        let upload_dir = std::env::var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("uploads"));

        let max_upload_bytes: u64 = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| MAX_UPLOAD_BYTES.to_string())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid u64");

        let folder = std::env::var("MEDIA_FOLDER").unwrap_or_else(|_| "lms".into());

        let backend = match std::env::var("MEDIA_BACKEND")
            .unwrap_or_else(|_| "s3".into())
            .as_str()
        {
            "memory" => MediaBackend::Memory,
            "s3" => MediaBackend::S3(S3Config {
                bucket: std::env::var("S3_BUCKET")
                    .expect("S3_BUCKET must be set when MEDIA_BACKEND=s3"),
                region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".into()),
                endpoint: non_empty_var("S3_ENDPOINT"),
                public_base_url: non_empty_var("MEDIA_PUBLIC_BASE_URL"),
            }),
            other => panic!("MEDIA_BACKEND must be 's3' or 'memory', got '{other}'"),
        };

        Self {
            upload_dir,
            max_upload_bytes,
            folder,
            backend,
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `300`, lecture uploads are large).
    pub request_timeout_secs: u64,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    pub media: MediaConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `300`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            jwt: JwtConfig::from_env(),
            media: MediaConfig::from_env(),
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
