//! Remote media storage for course thumbnails and lecture videos.
//!
//! - [`store`] -- the [`ObjectStore`] port and the object description passed to it.
//! - [`s3`] -- S3 (or S3-compatible) implementation.
//! - [`memory`] -- in-process implementation for development and tests.
//! - [`uploader`] -- [`MediaUploader`], which pushes staged files and always
//!   disposes of the local copy afterwards.

pub mod error;
pub mod memory;
pub mod s3;
pub mod store;
pub mod uploader;

pub use error::StorageError;
pub use memory::MemoryObjectStore;
pub use s3::{S3Config, S3ObjectStore};
pub use store::{ObjectSpec, ObjectStore};
pub use uploader::{MediaUploader, UploadOptions};
