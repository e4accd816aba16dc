//! Backend identity API: the capability trait and its wire types.

use async_trait::async_trait;
use edge_core::{Session, Tenant, User, WhoAmI};
use serde::{Deserialize, Serialize};

use crate::error::BackendError;

/// Authorization-code exchange request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub code: String,
    pub redirect_uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

/// Successful login: identity plus the new token pair.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub tenant: Tenant,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl LoginResponse {
    /// Split into the identity published as state and the session handed to
    /// the token store.
    #[must_use]
    pub fn into_parts(self) -> (WhoAmI, Session) {
        let session = Session::new(self.access_token, self.refresh_token);
        let whoami = WhoAmI {
            user: self.user,
            tenant: self.tenant,
            permissions: self.permissions.unwrap_or_default(),
        };
        (whoami, session)
    }
}

/// Token refresh result. A missing `refresh_token` means the old one stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenRefresh {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Every backend call the session controller makes. All methods are required.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    /// `GET` current user for `access_token`. Expired or invalid tokens yield
    /// [`BackendError::Unauthorized`].
    async fn current_user(&self, access_token: &str) -> Result<WhoAmI, BackendError>;

    /// Exchange an authorization code for identity and tokens.
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError>;

    /// Invalidate the session server-side, optionally on every device.
    async fn logout(&self, access_token: &str, all_devices: bool) -> Result<(), BackendError>;

    /// Exchange a refresh token for a new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<TokenRefresh, BackendError>;
}
