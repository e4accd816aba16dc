#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use edge_auth::{
    AuthBackend, AuthController, AuthError, BackendError, LoginRequest, LoginResponse,
    MemoryTokenStore, SessionSettings, TokenRefresh, TokenSource, TokenStore,
};
use edge_core::{Application, ApplicationAccess, Session, Tenant, User, WhoAmI};
use tokio::sync::Semaphore;

/// Backend that replays queued results. Empty queues fall back to a
/// rejection so unexpected calls show up as failures.
#[derive(Default)]
pub struct ScriptedBackend {
    me: Mutex<VecDeque<Result<WhoAmI, BackendError>>>,
    login: Mutex<VecDeque<Result<LoginResponse, BackendError>>>,
    logout: Mutex<VecDeque<Result<(), BackendError>>>,
    refresh: Mutex<VecDeque<Result<TokenRefresh, BackendError>>>,
    me_gate: Option<Arc<Semaphore>>,
    login_gate: Option<(usize, Arc<Semaphore>)>,
    pub me_calls: AtomicUsize,
    pub login_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
    pub refresh_calls: AtomicUsize,
    pub me_tokens: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// `current_user` waits for a permit on `gate` before answering.
    pub fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            me_gate: Some(gate),
            ..Self::default()
        }
    }

    /// The `call`-th `login` (zero based) waits for a permit on `gate`.
    pub fn gate_login(mut self, call: usize, gate: Arc<Semaphore>) -> Self {
        self.login_gate = Some((call, gate));
        self
    }

    pub fn me(self, result: Result<WhoAmI, BackendError>) -> Self {
        self.me.lock().unwrap().push_back(result);
        self
    }

    pub fn login(self, result: Result<LoginResponse, BackendError>) -> Self {
        self.login.lock().unwrap().push_back(result);
        self
    }

    pub fn logout(self, result: Result<(), BackendError>) -> Self {
        self.logout.lock().unwrap().push_back(result);
        self
    }

    pub fn refresh(self, result: Result<TokenRefresh, BackendError>) -> Self {
        self.refresh.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthBackend for ScriptedBackend {
    async fn current_user(&self, access_token: &str) -> Result<WhoAmI, BackendError> {
        self.me_calls.fetch_add(1, Ordering::SeqCst);
        self.me_tokens.lock().unwrap().push(access_token.to_string());
        if let Some(gate) = &self.me_gate {
            gate.acquire().await.expect("gate open").forget();
        }
        self.me
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unauthorized("unscripted".into())))
    }

    async fn login(&self, _request: &LoginRequest) -> Result<LoginResponse, BackendError> {
        let call = self.login_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.login.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(BackendError::Http {
                status: 500,
                body: "unscripted".into(),
            })
        });
        if let Some((gated, gate)) = &self.login_gate
            && *gated == call
        {
            gate.acquire().await.expect("gate open").forget();
        }
        result
    }

    async fn logout(&self, _access_token: &str, _all_devices: bool) -> Result<(), BackendError> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        self.logout.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }

    async fn refresh(&self, _refresh_token: &str) -> Result<TokenRefresh, BackendError> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(BackendError::Unauthorized("unscripted".into())))
    }
}

/// Memory store whose first `store` call announces itself on `entered` and
/// then blocks until `resume` fires.
pub struct PausingTokenStore {
    pub inner: MemoryTokenStore,
    entered: Mutex<Option<std::sync::mpsc::Sender<()>>>,
    resume: Mutex<Option<std::sync::mpsc::Receiver<()>>>,
}

impl PausingTokenStore {
    pub fn new(
        entered: std::sync::mpsc::Sender<()>,
        resume: std::sync::mpsc::Receiver<()>,
    ) -> Self {
        Self {
            inner: MemoryTokenStore::new(),
            entered: Mutex::new(Some(entered)),
            resume: Mutex::new(Some(resume)),
        }
    }
}

impl TokenStore for PausingTokenStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        self.inner.load()
    }

    fn store(&self, session: &Session) -> Result<(), AuthError> {
        let entered = self.entered.lock().unwrap().take();
        if let Some(entered) = entered {
            entered.send(()).expect("test listening");
            let resume = self.resume.lock().unwrap().take().expect("resume channel");
            resume.recv().expect("resume signal");
        }
        self.inner.store(session)
    }

    fn clear(&self) -> Result<(), AuthError> {
        self.inner.clear()
    }

    fn source(&self) -> Option<TokenSource> {
        self.inner.source()
    }
}

pub fn whoami(role: &str, permissions: &[&str]) -> WhoAmI {
    WhoAmI {
        user: User {
            id: "user-1".into(),
            email: "analyst@acme.test".into(),
            first_name: Some("Ada".into()),
            last_name: Some("Lovelace".into()),
            role_name: role.into(),
            tenant_id: Some("tenant-1".into()),
            is_active: true,
            application_access: vec![
                ApplicationAccess::denied(Application::MarketEdge),
                ApplicationAccess::granted(Application::CausalEdge),
            ],
        },
        tenant: Tenant {
            id: "tenant-1".into(),
            name: "Acme Retail".into(),
            industry: Some("retail".into()),
            subscription_plan: None,
        },
        permissions: permissions.iter().map(|p| (*p).to_string()).collect(),
    }
}

pub fn login_response(access: &str, refresh: Option<&str>) -> LoginResponse {
    let identity = whoami("analyst", &["read:reports"]);
    LoginResponse {
        user: identity.user,
        tenant: identity.tenant,
        permissions: Some(identity.permissions),
        access_token: access.into(),
        refresh_token: refresh.map(str::to_string),
    }
}

pub fn login_request() -> LoginRequest {
    LoginRequest {
        code: "auth-code".into(),
        redirect_uri: "http://localhost:3000/callback".into(),
        state: None,
    }
}

pub fn refreshed(access: &str, refresh: Option<&str>) -> TokenRefresh {
    TokenRefresh {
        access_token: access.into(),
        refresh_token: refresh.map(str::to_string),
    }
}

/// Refresh timer far out; idle check every 10s with a two-minute timeout.
pub fn idle_settings() -> SessionSettings {
    SessionSettings {
        token_refresh_interval: Duration::from_secs(3600),
        refresh_buffer: Duration::from_secs(60),
        activity_check_interval: Duration::from_secs(10),
        idle_timeout: Duration::from_secs(120),
    }
}

/// Refresh every minute; idle logout effectively disabled.
pub fn refresh_settings() -> SessionSettings {
    SessionSettings {
        token_refresh_interval: Duration::from_secs(60),
        refresh_buffer: Duration::from_secs(60),
        activity_check_interval: Duration::from_secs(10),
        idle_timeout: Duration::from_secs(86_400),
    }
}

pub fn controller(
    backend: &Arc<ScriptedBackend>,
    tokens: &Arc<MemoryTokenStore>,
    settings: SessionSettings,
) -> AuthController {
    let backend: Arc<dyn AuthBackend> = backend.clone();
    AuthController::new(backend, tokens.clone(), settings)
}

/// Let aborted and freshly spawned tasks run to their next suspension point.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
