use anyhow::Context;
use edge_access::{ApplicationSwitcher, SelectionStore};
use edge_auth::{AuthController, AuthState, KeyringTokenStore, TokenSource, TokenStore};
use edge_config::EdgeConfig;
use edge_core::Application;

/// Shared state for one CLI invocation.
pub struct AppContext {
    pub config: EdgeConfig,
    pub auth: AuthController,
}

impl AppContext {
    pub fn init(config: EdgeConfig) -> anyhow::Result<Self> {
        let auth = AuthController::from_config(&config)
            .context("failed to create authentication controller")?;
        Ok(Self { config, auth })
    }

    /// Resolve the stored session and fail unless it is authenticated.
    pub async fn require_session(&self) -> anyhow::Result<AuthState> {
        let state = self.auth.initialize().await;
        if !state.is_authenticated() {
            anyhow::bail!("not signed in; run `medge auth login`");
        }
        Ok(state)
    }

    /// Where the stored session would be loaded from, if anywhere.
    pub fn token_source(&self) -> Option<TokenSource> {
        KeyringTokenStore::from_config(&self.config.session).source()
    }

    pub fn priority(&self) -> anyhow::Result<Vec<Application>> {
        self.config
            .apps
            .priority_applications()
            .context("invalid apps.priority")
    }

    pub fn switcher(&self, state: &AuthState) -> anyhow::Result<ApplicationSwitcher> {
        let mut switcher =
            ApplicationSwitcher::new(state.application_access()).with_priority(self.priority()?);
        if let Some(path) = self.config.apps.selection_path() {
            switcher = switcher.with_store(SelectionStore::new(path));
        }
        Ok(switcher)
    }

    pub fn shutdown(&self) {
        self.auth.shutdown();
    }
}
