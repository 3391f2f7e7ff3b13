//! Authorization predicates.
//!
//! Each predicate is a pure function from an [`Identity`] to pass/fail. The
//! HTTP layer chains them per route after authentication; a failure here
//! short-circuits before any business logic runs.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::roles::Role;
use crate::types::DbId;

/// Subscription status value that grants access to gated lecture content.
pub const SUBSCRIPTION_ACTIVE: &str = "active";

/// Subscription details as issued by the payment side of the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case(SUBSCRIPTION_ACTIVE))
    }
}

/// An authenticated caller. Owned by the account service; only read here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: DbId,
    pub role: Role,
    pub subscription: Option<Subscription>,
}

impl Identity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn has_active_subscription(&self) -> bool {
        self.subscription.as_ref().is_some_and(Subscription::is_active)
    }
}

/// Fails with [`CoreError::Forbidden`] unless the identity holds `role`.
pub fn require_role(identity: &Identity, role: Role) -> Result<(), CoreError> {
    if identity.role == role {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("{role} role required")))
    }
}

/// Fails with [`CoreError::Forbidden`] unless the identity is an admin or
/// has an active subscription.
pub fn require_subscriber_or_admin(identity: &Identity) -> Result<(), CoreError> {
    if identity.is_admin() || identity.has_active_subscription() {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "An active subscription is required to access this course".into(),
        ))
    }
}
