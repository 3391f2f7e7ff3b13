//! Authentication and authorization middleware extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated identity from a JWT.
//! - [`rbac::RequireAdmin`] -- Requires the `ADMIN` role.
//! - [`rbac::RequireSubscriber`] -- Requires an active subscription or `ADMIN`.
//!
//! Extractors run before the request body is read, so a rejected request
//! never reaches media staging or business logic.

pub mod auth;
pub mod rbac;
