//! Domain types and rules for the course catalogue.
//!
//! Nothing in this crate performs I/O: persistence lives in `lms-db`, the
//! remote media store in `lms-storage`, and HTTP in `lms-api`.

pub mod authz;
pub mod course;
pub mod error;
pub mod media;
pub mod roles;
pub mod types;
