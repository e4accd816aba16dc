use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

use crate::application::{ApplicationAccess, deserialize_access_list};
use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Platform role of a user within their tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Analyst,
    Viewer,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "super_admin",
            Self::Admin => "admin",
            Self::Analyst => "analyst",
            Self::Viewer => "viewer",
        }
    }

    /// Whether the role holds every permission regardless of the granted list.
    #[must_use]
    pub const fn grants_all_permissions(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "super_admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "analyst" => Ok(Self::Analyst),
            "viewer" => Ok(Self::Viewer),
            _ => Err(CoreError::UnknownRole(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// User / Tenant
// ---------------------------------------------------------------------------

const fn default_active() -> bool {
    true
}

/// Authenticated user as returned by the backend.
///
/// `role` stays a raw string so an unrecognised role never breaks login;
/// use [`User::role`] for the typed view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(rename = "role")]
    pub role_name: String,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "deserialize_access_list")]
    #[schemars(with = "Vec<ApplicationAccess>")]
    pub application_access: Vec<ApplicationAccess>,
}

impl User {
    /// Typed role, or `None` if the backend sent a role this client does not know.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.role_name.parse().ok()
    }

    /// "First Last" when available, otherwise the email address.
    #[must_use]
    pub fn display_name(&self) -> String {
        match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(first), Some(last)) => format!("{first} {last}"),
            (Some(name), None) | (None, Some(name)) => name.to_string(),
            (None, None) => self.email.clone(),
        }
    }
}

/// Organization context of the authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub subscription_plan: Option<String>,
}

// ---------------------------------------------------------------------------
// WhoAmI
// ---------------------------------------------------------------------------

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Normalized current-user response: the user, their tenant, and the
/// permission strings granted for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct WhoAmI {
    pub user: User,
    pub tenant: Tenant,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Vec<String>")]
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Application;
    use pretty_assertions::assert_eq;

    fn user_json() -> serde_json::Value {
        serde_json::json!({
            "id": "4b1c5e0e-0000-4000-8000-000000000001",
            "email": "analyst@acme.test",
            "first_name": "Ada",
            "last_name": "Lovelace",
            "role": "analyst",
            "tenant_id": "tenant-1",
            "application_access": [
                {"application": "MARKET_EDGE", "has_access": false},
                {"application": "CAUSAL_EDGE", "has_access": true}
            ]
        })
    }

    #[test]
    fn user_deserializes_from_backend_shape() {
        let user: User = serde_json::from_value(user_json()).unwrap();
        assert_eq!(user.role(), Some(Role::Analyst));
        assert!(user.is_active);
        assert_eq!(
            user.application_access,
            vec![
                ApplicationAccess::denied(Application::MarketEdge),
                ApplicationAccess::granted(Application::CausalEdge),
            ]
        );
    }

    #[test]
    fn unknown_role_is_kept_raw() {
        let mut json = user_json();
        json["role"] = "auditor".into();
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role_name, "auditor");
        assert!(user.role().is_none());
    }

    #[test]
    fn display_name_falls_back_to_email() {
        let mut user: User = serde_json::from_value(user_json()).unwrap();
        assert_eq!(user.display_name(), "Ada Lovelace");
        user.first_name = None;
        user.last_name = None;
        assert_eq!(user.display_name(), "analyst@acme.test");
    }

    #[test]
    fn whoami_null_permissions_is_empty() {
        let whoami: WhoAmI = serde_json::from_value(serde_json::json!({
            "user": user_json(),
            "tenant": {"id": "tenant-1", "name": "Acme"},
            "permissions": null
        }))
        .unwrap();
        assert!(whoami.permissions.is_empty());
        assert_eq!(whoami.tenant.industry, None);
    }

    #[test]
    fn only_super_admin_grants_everything() {
        assert!(Role::SuperAdmin.grants_all_permissions());
        assert!(!Role::Admin.grants_all_permissions());
        assert!(!Role::Viewer.grants_all_permissions());
    }
}
