//! Role- and subscription-based access control extractors.
//!
//! Each extractor authenticates via [`AuthUser`] and then applies one of the
//! pure predicates from [`lms_core::authz`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use lms_core::authz::{require_role, require_subscriber_or_admin};
use lms_core::roles::Role;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires the `ADMIN` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(admin): RequireAdmin) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user.identity, Role::Admin)?;
        Ok(RequireAdmin(user))
    }
}

/// Requires an active subscription or the `ADMIN` role. Rejects with 403
/// Forbidden otherwise.
pub struct RequireSubscriber(pub AuthUser);

impl FromRequestParts<AppState> for RequireSubscriber {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        require_subscriber_or_admin(&user.identity)?;
        Ok(RequireSubscriber(user))
    }
}
