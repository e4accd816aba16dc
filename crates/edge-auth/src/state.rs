//! Observable authentication state.
//!
//! ```text
//! uninitialized → loading → authenticated
//!                         → unauthenticated
//! ```
//!
//! `is_initialized` becomes true the first time a terminal phase is reached
//! and never reverts for the controller's lifetime.

use edge_core::{ApplicationAccess, Tenant, User, WhoAmI};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    #[default]
    Uninitialized,
    Loading,
    Authenticated,
    Unauthenticated,
}

impl AuthPhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Authenticated => "authenticated",
            Self::Unauthenticated => "unauthenticated",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Authenticated | Self::Unauthenticated)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthState {
    pub phase: AuthPhase,
    pub user: Option<User>,
    pub tenant: Option<Tenant>,
    pub permissions: Vec<String>,
    pub is_initialized: bool,
}

impl AuthState {
    pub(crate) fn authenticated(whoami: WhoAmI) -> Self {
        Self {
            phase: AuthPhase::Authenticated,
            user: Some(whoami.user),
            tenant: Some(whoami.tenant),
            permissions: whoami.permissions,
            is_initialized: true,
        }
    }

    pub(crate) fn unauthenticated() -> Self {
        Self {
            phase: AuthPhase::Unauthenticated,
            is_initialized: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.phase == AuthPhase::Authenticated && self.user.is_some()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase == AuthPhase::Loading
    }

    /// Access grants of the current user; empty when signed out.
    #[must_use]
    pub fn application_access(&self) -> &[ApplicationAccess] {
        self.user
            .as_ref()
            .map_or(&[], |user| user.application_access.as_slice())
    }

    /// Super admins hold every permission.
    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        let Some(user) = &self.user else {
            return false;
        };
        user.role().is_some_and(|role| role.grants_all_permissions())
            || self.permissions.iter().any(|p| p == permission)
    }

    #[must_use]
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.user
            .as_ref()
            .is_some_and(|user| user.role_name.eq_ignore_ascii_case(role))
    }
}
