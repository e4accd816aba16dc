//! `reqwest` implementation of [`AuthBackend`].

use async_trait::async_trait;
use edge_config::ApiConfig;
use edge_core::WhoAmI;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::backend::{AuthBackend, LoginRequest, LoginResponse, TokenRefresh};
use crate::error::BackendError;

const ME_PATH: &str = "/auth/me";
const LOGIN_PATH: &str = "/auth/login";
const LOGOUT_PATH: &str = "/auth/logout";
const REFRESH_PATH: &str = "/auth/refresh";

#[derive(Serialize)]
struct LogoutBody {
    #[serde(rename = "allDevices")]
    all_devices: bool,
}

#[derive(Serialize)]
struct RefreshBody<'a> {
    refresh_token: &'a str,
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    api: ApiConfig,
}

impl HttpBackend {
    /// Build a client with the configured request timeout.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Transport` if the TLS backend cannot initialize.
    pub fn new(api: ApiConfig) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(api.timeout())
            .build()
            .map_err(|e| BackendError::Transport(format!("build http client: {e}")))?;
        Ok(Self { client, api })
    }

    fn url(&self, path: &str) -> String {
        self.api.endpoint(path)
    }
}

async fn send(request: reqwest::RequestBuilder, what: &str) -> Result<reqwest::Response, BackendError> {
    let resp = request
        .send()
        .await
        .map_err(|e| BackendError::Transport(format!("{what}: {e}")))?;

    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(BackendError::Unauthorized(format!("{what}: {body}")));
    }
    Err(BackendError::Http {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(resp: reqwest::Response, what: &str) -> Result<T, BackendError> {
    resp.json::<T>()
        .await
        .map_err(|e| BackendError::Decode(format!("{what}: {e}")))
}

#[async_trait]
impl AuthBackend for HttpBackend {
    async fn current_user(&self, access_token: &str) -> Result<WhoAmI, BackendError> {
        let request = self.client.get(self.url(ME_PATH)).bearer_auth(access_token);
        let resp = send(request, "current user").await?;
        decode(resp, "current user").await
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let builder = self.client.post(self.url(LOGIN_PATH)).json(request);
        let resp = send(builder, "login").await?;
        decode(resp, "login").await
    }

    async fn logout(&self, access_token: &str, all_devices: bool) -> Result<(), BackendError> {
        let request = self
            .client
            .post(self.url(LOGOUT_PATH))
            .bearer_auth(access_token)
            .json(&LogoutBody { all_devices });
        send(request, "logout").await.map(|_| ())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<TokenRefresh, BackendError> {
        let request = self
            .client
            .post(self.url(REFRESH_PATH))
            .json(&RefreshBody { refresh_token });
        let resp = send(request, "token refresh").await?;
        decode(resp, "token refresh").await
    }
}
