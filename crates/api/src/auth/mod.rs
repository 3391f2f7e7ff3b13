//! Authentication primitives.
//!
//! - [`jwt`] -- access-token generation and validation.
//!
//! Tokens are issued by the account service; this crate only needs to
//! validate them, and generates them for that service and for tests.

pub mod jwt;
