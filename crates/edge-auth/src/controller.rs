//! Authentication state machine.
//!
//! [`AuthController`] owns the session lifecycle and publishes [`AuthState`]
//! through a `watch` channel. While authenticated it also runs the token
//! refresh and idle timers.
//!
//! Every state-changing operation is stamped with a generation number.
//! `initialize`, `login`, `logout`, and `shutdown` start a new generation;
//! results that arrive after the generation moved on are discarded instead of
//! being published.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use edge_config::{EdgeConfig, SessionConfig};
use edge_core::{Session, User, WhoAmI};
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior};

use crate::backend::{AuthBackend, LoginRequest};
use crate::error::{AuthError, BackendError};
use crate::http::HttpBackend;
use crate::refresh::refresh_due;
use crate::state::{AuthPhase, AuthState};
use crate::timers::SessionTimers;
use crate::token_store::{KeyringTokenStore, TokenStore};

/// Floor for timer periods; `tokio::time::interval` rejects zero.
const MIN_TICK: Duration = Duration::from_millis(100);

/// Timing knobs for the background tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    pub token_refresh_interval: Duration,
    pub refresh_buffer: Duration,
    pub activity_check_interval: Duration,
    pub idle_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from(&SessionConfig::default())
    }
}

impl From<&SessionConfig> for SessionSettings {
    fn from(config: &SessionConfig) -> Self {
        Self {
            token_refresh_interval: config.token_refresh_interval(),
            refresh_buffer: config.refresh_buffer(),
            activity_check_interval: config.activity_check_interval(),
            idle_timeout: config.idle_timeout(),
        }
    }
}

/// Why a stored session could not be validated during `initialize`.
enum Rejection {
    /// Tokens are no longer usable; clear them.
    Terminal,
    /// Backend unreachable or misbehaving; keep tokens for the next attempt.
    Transient,
    /// A newer operation took over while we were waiting.
    Stale,
}

struct Inner {
    backend: Arc<dyn AuthBackend>,
    tokens: Arc<dyn TokenStore>,
    settings: SessionSettings,
    state: watch::Sender<AuthState>,
    generation: AtomicU64,
    init_started: AtomicBool,
    closed: AtomicBool,
    timers: Mutex<Option<SessionTimers>>,
    live_timers: Arc<AtomicUsize>,
    last_activity: Mutex<Instant>,
}

/// Session controller for one client instance.
///
/// Dropping the controller performs [`shutdown`](Self::shutdown).
pub struct AuthController {
    inner: Arc<Inner>,
}

impl AuthController {
    #[must_use]
    pub fn new(
        backend: Arc<dyn AuthBackend>,
        tokens: Arc<dyn TokenStore>,
        settings: SessionSettings,
    ) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self {
            inner: Arc::new(Inner {
                backend,
                tokens,
                settings,
                state,
                generation: AtomicU64::new(0),
                init_started: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                timers: Mutex::new(None),
                live_timers: Arc::new(AtomicUsize::new(0)),
                last_activity: Mutex::new(Instant::now()),
            }),
        }
    }

    /// Controller backed by the HTTP API and the OS keychain.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Backend` if the HTTP client cannot be built.
    pub fn from_config(config: &EdgeConfig) -> Result<Self, AuthError> {
        let backend = HttpBackend::new(config.api.clone())?;
        let tokens = KeyringTokenStore::from_config(&config.session);
        Ok(Self::new(
            Arc::new(backend),
            Arc::new(tokens),
            SessionSettings::from(&config.session),
        ))
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every published state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.inner.state.subscribe()
    }

    /// Resolve the stored session into an authenticated or unauthenticated
    /// state. Runs once; later calls return the current state untouched.
    ///
    /// Never fails: terminal problems surface as `Unauthenticated`.
    pub async fn initialize(&self) -> AuthState {
        let inner = &self.inner;
        if inner.init_started.swap(true, Ordering::SeqCst) {
            tracing::debug!("initialize already ran; ignoring repeat call");
            return self.state();
        }
        if inner.is_closed() {
            return self.state();
        }

        let generation = inner.begin();
        inner.publish_loading(generation);

        let Some(session) = inner.load_session() else {
            tracing::debug!("no stored session; starting signed out");
            inner.settle_unauthenticated(generation);
            return self.state();
        };

        match inner.validate_session(session, generation).await {
            Ok(whoami) => {
                if inner.enter_authenticated(generation, whoami) {
                    tracing::info!("stored session restored");
                }
            }
            Err(Rejection::Terminal) => {
                inner.clear_and_settle(generation);
            }
            Err(Rejection::Transient) => {
                inner.settle_unauthenticated(generation);
            }
            Err(Rejection::Stale) => {
                tracing::debug!("initialize result discarded; superseded");
            }
        }
        self.state()
    }

    /// Exchange an authorization code for a session.
    ///
    /// # Errors
    ///
    /// Returns the backend or token store error after clearing local state, or
    /// `AuthError::Superseded` if a newer operation replaced this one.
    pub async fn login(&self, request: LoginRequest) -> Result<User, AuthError> {
        let inner = &self.inner;
        let generation = inner.begin();
        inner.publish_loading(generation);

        let response = match inner.backend.login(&request).await {
            Ok(response) => response,
            Err(error) => {
                tracing::warn!(%error, "login failed");
                inner.clear_and_settle(generation);
                return Err(error.into());
            }
        };

        let (whoami, session) = response.into_parts();
        let user = whoami.user.clone();
        match inner.commit_login(generation, &session, whoami) {
            Ok(true) => {}
            Ok(false) => return Err(AuthError::Superseded),
            Err(error) => {
                tracing::warn!(%error, "failed to persist session after login");
                return Err(error);
            }
        }
        tracing::info!(user_id = %user.id, "login succeeded");
        Ok(user)
    }

    /// Sign out. Backend invalidation is best effort; the local session is
    /// always cleared.
    pub async fn logout(&self, all_devices: bool) {
        self.inner.logout(all_devices).await;
    }

    /// Re-fetch the current user. Does not attempt a token refresh.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` without a stored session, or the
    /// backend error; both clear local state so the caller must log in again.
    pub async fn refresh_user(&self) -> Result<User, AuthError> {
        let inner = &self.inner;
        let generation = inner.current_generation();
        let Some(session) = inner.load_session() else {
            inner.settle_unauthenticated(generation);
            return Err(AuthError::NotAuthenticated);
        };

        match inner.backend.current_user(&session.access_token).await {
            Ok(whoami) => {
                let user = whoami.user.clone();
                if inner.update_identity(generation, whoami) {
                    Ok(user)
                } else {
                    Err(AuthError::Superseded)
                }
            }
            Err(error) => {
                tracing::warn!(%error, "refreshing user failed; clearing session");
                inner.clear_and_settle(generation);
                Err(error.into())
            }
        }
    }

    /// Exchange the stored refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotAuthenticated` / `MissingRefreshToken` when
    /// there is nothing to refresh, or the backend error. A rejected refresh
    /// token (401) also clears local state.
    pub async fn refresh_token(&self) -> Result<(), AuthError> {
        self.inner.refresh_token().await
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.state.borrow().is_authenticated()
    }

    #[must_use]
    pub fn has_permission(&self, permission: &str) -> bool {
        self.inner.state.borrow().has_permission(permission)
    }

    #[must_use]
    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        self.inner.state.borrow().has_any_permission(permissions)
    }

    #[must_use]
    pub fn has_role(&self, role: &str) -> bool {
        self.inner.state.borrow().has_role(role)
    }

    /// Mark user activity, postponing the idle logout.
    pub fn record_activity(&self) {
        *self.inner.lock_activity() = Instant::now();
    }

    /// Number of background timer tasks currently alive.
    #[must_use]
    pub fn live_timer_count(&self) -> usize {
        self.inner.live_timers.load(Ordering::SeqCst)
    }

    /// Stop timers and discard the results of in-flight operations.
    /// Stored tokens are left alone.
    pub fn shutdown(&self) {
        let inner = &self.inner;
        if inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        inner.begin();
        inner.teardown_timers();
        tracing::debug!("auth controller shut down");
    }
}

impl Drop for AuthController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        !self.is_closed() && self.current_generation() == generation
    }

    fn lock_timers(&self) -> MutexGuard<'_, Option<SessionTimers>> {
        self.timers.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_activity(&self) -> MutexGuard<'_, Instant> {
        self.last_activity
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn load_session(&self) -> Option<Session> {
        self.tokens.load().unwrap_or_else(|error| {
            tracing::warn!(%error, "failed to read stored session");
            None
        })
    }

    fn clear_tokens(&self) {
        if let Err(error) = self.tokens.clear() {
            tracing::warn!(%error, "failed to clear stored session");
        }
    }

    fn teardown_timers(&self) {
        let released = self.lock_timers().take();
        drop(released);
    }

    /// Publish `Loading`. Timers of the previous session stop here; they only
    /// run while the phase is `Authenticated`.
    fn publish_loading(&self, generation: u64) {
        let mut timers = self.lock_timers();
        if !self.is_current(generation) {
            return;
        }
        let released = timers.take();
        self.state.send_modify(|state| state.phase = AuthPhase::Loading);
        drop(timers);
        drop(released);
    }

    /// Publish `Unauthenticated` and release timers, unless superseded.
    fn settle_unauthenticated(&self, generation: u64) -> bool {
        let mut timers = self.lock_timers();
        if !self.is_current(generation) {
            return false;
        }
        let released = timers.take();
        self.state.send_replace(AuthState::unauthenticated());
        drop(timers);
        drop(released);
        true
    }

    /// Clear stored tokens and publish `Unauthenticated`, unless superseded.
    /// Runs under the state lock so no concurrent store lands in between.
    fn clear_and_settle(&self, generation: u64) -> bool {
        let mut timers = self.lock_timers();
        if !self.is_current(generation) {
            return false;
        }
        self.clear_tokens();
        let released = timers.take();
        self.state.send_replace(AuthState::unauthenticated());
        drop(timers);
        drop(released);
        true
    }

    /// Persist `session` unless superseded. Returns `Ok(false)` when another
    /// operation took over before or during the write; the write is then
    /// undone unless the controller was shut down.
    fn store_if_current(&self, generation: u64, session: &Session) -> Result<bool, AuthError> {
        let _timers = self.lock_timers();
        if !self.is_current(generation) {
            return Ok(false);
        }
        self.tokens.store(session)?;
        Ok(self.keep_stored(generation))
    }

    /// Re-check after a write made under the state lock. A logout or login
    /// that started meanwhile clears or stores after us, so drop ours.
    fn keep_stored(&self, generation: u64) -> bool {
        if self.is_current(generation) {
            return true;
        }
        if !self.is_closed() {
            self.clear_tokens();
        }
        false
    }

    /// Persist a fresh login session and enter `Authenticated` in one step.
    fn commit_login(
        self: &Arc<Self>,
        generation: u64,
        session: &Session,
        whoami: WhoAmI,
    ) -> Result<bool, AuthError> {
        let mut timers = self.lock_timers();
        if !self.is_current(generation) {
            return Ok(false);
        }
        if let Err(error) = self.tokens.store(session) {
            self.clear_tokens();
            let released = timers.take();
            if self.is_current(generation) {
                self.state.send_replace(AuthState::unauthenticated());
            }
            drop(timers);
            drop(released);
            return Err(error);
        }
        if !self.keep_stored(generation) {
            return Ok(false);
        }
        let previous = self.install_session(&mut timers, whoami);
        drop(timers);
        drop(previous);
        Ok(true)
    }

    /// Publish `Authenticated` and start a fresh pair of timers, unless superseded.
    fn enter_authenticated(self: &Arc<Self>, generation: u64, whoami: WhoAmI) -> bool {
        let mut timers = self.lock_timers();
        if !self.is_current(generation) {
            return false;
        }
        let previous = self.install_session(&mut timers, whoami);
        drop(timers);
        drop(previous);
        true
    }

    /// Caller holds the state lock. Returns the timers being replaced so
    /// they can be dropped after the lock is released.
    fn install_session(
        self: &Arc<Self>,
        timers: &mut Option<SessionTimers>,
        whoami: WhoAmI,
    ) -> Option<SessionTimers> {
        *self.lock_activity() = Instant::now();
        let previous = timers.replace(self.spawn_timers());
        self.state.send_replace(AuthState::authenticated(whoami));
        previous
    }

    /// Replace the identity of an authenticated session in place; enters
    /// `Authenticated` if the session was not already there.
    fn update_identity(self: &Arc<Self>, generation: u64, whoami: WhoAmI) -> bool {
        let timers = self.lock_timers();
        if !self.is_current(generation) {
            return false;
        }
        if timers.is_some() && self.state.borrow().phase == AuthPhase::Authenticated {
            self.state.send_replace(AuthState::authenticated(whoami));
            return true;
        }
        drop(timers);
        self.enter_authenticated(generation, whoami)
    }

    async fn validate_session(
        &self,
        session: Session,
        generation: u64,
    ) -> Result<WhoAmI, Rejection> {
        match self.backend.current_user(&session.access_token).await {
            Ok(whoami) => Ok(whoami),
            Err(error) if error.is_unauthorized() => {
                let Some(refresh_token) = session.refresh_token.clone() else {
                    tracing::info!("stored access token rejected and no refresh token available");
                    return Err(Rejection::Terminal);
                };
                tracing::info!("stored access token rejected; attempting one refresh");
                let refreshed = self.backend.refresh(&refresh_token).await.map_err(|error| {
                    tracing::warn!(%error, "token refresh during initialize failed");
                    Rejection::Terminal
                })?;
                let session = session.rotated(refreshed.access_token, refreshed.refresh_token);
                match self.store_if_current(generation, &session) {
                    Ok(true) => {}
                    Ok(false) => return Err(Rejection::Stale),
                    Err(error) => tracing::warn!(%error, "failed to persist refreshed session"),
                }
                self.backend
                    .current_user(&session.access_token)
                    .await
                    .map_err(|error| {
                        tracing::warn!(%error, "current user still failing after refresh");
                        Rejection::Terminal
                    })
            }
            Err(error) => {
                tracing::warn!(%error, "could not validate stored session");
                Err(Rejection::Transient)
            }
        }
    }

    async fn refresh_token(&self) -> Result<(), AuthError> {
        let generation = self.current_generation();
        let session = self.load_session().ok_or(AuthError::NotAuthenticated)?;
        let refresh_token = session
            .refresh_token
            .clone()
            .ok_or(AuthError::MissingRefreshToken)?;

        match self.backend.refresh(&refresh_token).await {
            Ok(refreshed) => {
                let session = session.rotated(refreshed.access_token, refreshed.refresh_token);
                if !self.store_if_current(generation, &session)? {
                    return Err(AuthError::Superseded);
                }
                tracing::debug!("access token refreshed");
                Ok(())
            }
            Err(error @ BackendError::Unauthorized(_)) => {
                tracing::warn!(%error, "refresh token rejected; signing out");
                self.clear_and_settle(generation);
                Err(error.into())
            }
            Err(error) => Err(error.into()),
        }
    }

    async fn logout(&self, all_devices: bool) {
        let generation = self.begin();
        self.teardown_timers();

        if let Some(session) = self.load_session()
            && let Err(error) = self
                .backend
                .logout(&session.access_token, all_devices)
                .await
        {
            tracing::warn!(%error, all_devices, "backend logout failed; clearing local session anyway");
        }

        if self.clear_and_settle(generation) {
            tracing::info!(all_devices, "logged out");
        } else {
            // A newer login owns the token store now.
            tracing::debug!("logout superseded; leaving newer session in place");
        }
    }

    async fn auto_refresh_tick(&self) {
        let Some(session) = self.load_session() else {
            return;
        };
        if !refresh_due(
            &session.access_token,
            self.settings.refresh_buffer,
            chrono::Utc::now(),
        ) {
            tracing::trace!("access token still fresh");
            return;
        }
        match self.refresh_token().await {
            Ok(()) | Err(AuthError::Superseded) => {}
            Err(error) => tracing::warn!(%error, "automatic token refresh failed"),
        }
    }

    fn idle_for(&self) -> Duration {
        self.lock_activity().elapsed()
    }

    fn spawn_timers(self: &Arc<Self>) -> SessionTimers {
        let mut timers = SessionTimers::new(Arc::clone(&self.live_timers));

        let weak = Arc::downgrade(self);
        let period = self.settings.token_refresh_interval.max(MIN_TICK);
        timers.spawn("token-refresh", async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                inner.auto_refresh_tick().await;
            }
        });

        let weak: Weak<Self> = Arc::downgrade(self);
        let period = self.settings.activity_check_interval.max(MIN_TICK);
        let idle_timeout = self.settings.idle_timeout;
        timers.spawn("activity", async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else { break };
                let idle = inner.idle_for();
                if idle >= idle_timeout {
                    tracing::info!(idle_secs = idle.as_secs(), "session idle; logging out");
                    // Logout releases this task's own handle, so it runs detached.
                    tokio::spawn(async move { inner.logout(false).await });
                    break;
                }
            }
        });

        timers
    }
}
