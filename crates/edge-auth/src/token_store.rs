//! Persistence for the access/refresh token pair.
//!
//! [`KeyringTokenStore`] keeps the session in the OS keychain and falls back
//! to a `0600` credentials file when no keychain is available.
//! [`MemoryTokenStore`] keeps it in process memory only.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use edge_config::SessionConfig;
use edge_core::Session;

use crate::error::AuthError;

const KEYRING_USER: &str = "session";

/// Environment variable holding an access token for headless use.
pub const ACCESS_TOKEN_ENV: &str = "MARKETEDGE_ACCESS_TOKEN";

/// Where a loaded session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Keyring,
    Env,
    File,
    Memory,
}

impl TokenSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyring => "keyring",
            Self::Env => "env",
            Self::File => "file",
            Self::Memory => "memory",
        }
    }
}

/// Owner of the persisted [`Session`]. No other component mutates tokens.
pub trait TokenStore: Send + Sync {
    /// Load the stored session, if any.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if stored data exists but cannot be read.
    fn load(&self) -> Result<Option<Session>, AuthError>;

    /// Persist `session`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if every storage tier fails.
    fn store(&self, session: &Session) -> Result<(), AuthError>;

    /// Remove the stored session. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenStore` if stored data exists but cannot be removed.
    fn clear(&self) -> Result<(), AuthError>;

    /// Which tier the current session would be loaded from.
    fn source(&self) -> Option<TokenSource>;
}

// ---------------------------------------------------------------------------
// Keyring (with env and file tiers)
// ---------------------------------------------------------------------------

/// OS keychain store. Load priority: keyring → `MARKETEDGE_ACCESS_TOKEN` → file.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    service: String,
    file: Option<FileTokenStore>,
}

impl KeyringTokenStore {
    #[must_use]
    pub fn new(service: impl Into<String>, credentials_path: Option<PathBuf>) -> Self {
        Self {
            service: service.into(),
            file: credentials_path.map(FileTokenStore::new),
        }
    }

    #[must_use]
    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.keyring_service.clone(), config.credentials_path())
    }

    fn entry(&self) -> Option<keyring::Entry> {
        match keyring::Entry::new(&self.service, KEYRING_USER) {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::debug!(%error, service = %self.service, "keyring unavailable");
                None
            }
        }
    }

    fn load_keyring(&self) -> Option<Session> {
        let raw = self.entry()?.get_password().ok()?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if !session.access_token.is_empty() => Some(session),
            Ok(_) => None,
            Err(error) => {
                tracing::warn!(%error, "ignoring unreadable keyring session");
                None
            }
        }
    }

    fn file(&self) -> Result<&FileTokenStore, AuthError> {
        self.file.as_ref().ok_or_else(|| {
            AuthError::TokenStore("home directory not found; cannot store credentials".into())
        })
    }
}

fn load_env() -> Option<Session> {
    std::env::var(ACCESS_TOKEN_ENV)
        .ok()
        .filter(|t| !t.is_empty())
        .map(|token| Session::new(token, None))
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        if let Some(session) = self.load_keyring() {
            return Ok(Some(session));
        }
        if let Some(session) = load_env() {
            return Ok(Some(session));
        }
        match &self.file {
            Some(file) => file.load(),
            None => Ok(None),
        }
    }

    fn store(&self, session: &Session) -> Result<(), AuthError> {
        let payload = serde_json::to_string(session)
            .map_err(|e| AuthError::TokenStore(format!("serialize session: {e}")))?;
        match self.entry().map(|entry| entry.set_password(&payload)) {
            // Platforms without a native keychain accept writes they never persist.
            Some(Ok(())) if self.load_keyring().as_ref() != Some(session) => {
                tracing::debug!("keyring write not readable back; using credentials file");
                self.file()?.store(session)
            }
            Some(Ok(())) => {
                // Drop any stale file copy so the tiers never disagree.
                if let Some(file) = &self.file {
                    file.clear()?;
                }
                Ok(())
            }
            Some(Err(error)) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                self.file()?.store(session)
            }
            None => self.file()?.store(session),
        }
    }

    fn clear(&self) -> Result<(), AuthError> {
        let keyring = self
            .entry()
            .map_or(Ok(()), |entry| keyring_deleted(entry.delete_credential()));
        if let Some(file) = &self.file {
            file.clear()?;
        }
        keyring
    }

    fn source(&self) -> Option<TokenSource> {
        if self.load_keyring().is_some() {
            return Some(TokenSource::Keyring);
        }
        if load_env().is_some() {
            return Some(TokenSource::Env);
        }
        self.file
            .as_ref()
            .and_then(FileTokenStore::source)
    }
}

/// A missing credential counts as cleared; anything else is reported.
fn keyring_deleted(result: keyring::Result<()>) -> Result<(), AuthError> {
    match result {
        Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
        Err(error) => {
            tracing::warn!(%error, "failed to delete keyring session");
            Err(AuthError::TokenStore(format!("delete keyring session: {error}")))
        }
    }
}

// ---------------------------------------------------------------------------
// File
// ---------------------------------------------------------------------------

/// JSON credentials file, created `0600` inside a `0700` directory on Unix.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(AuthError::TokenStore(format!(
                    "read {}: {e}",
                    self.path.display()
                )));
            }
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str::<Session>(&raw)
            .map(Some)
            .map_err(|e| AuthError::TokenStore(format!("parse {}: {e}", self.path.display())))
    }

    fn store(&self, session: &Session) -> Result<(), AuthError> {
        let path = &self.path;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AuthError::TokenStore(format!("mkdir {}: {e}", parent.display()))
            })?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                    tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
                }
            }
        }
        let payload = serde_json::to_string(session)
            .map_err(|e| AuthError::TokenStore(format!("serialize session: {e}")))?;
        fs::write(path, payload)
            .map_err(|e| AuthError::TokenStore(format!("write {}: {e}", path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AuthError::TokenStore(format!("chmod {}: {e}", path.display())))?;
        }

        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        if self.path.exists() {
            fs::remove_file(&self.path).map_err(|e| {
                AuthError::TokenStore(format!("failed to delete {}: {e}", self.path.display()))
            })?;
        }
        Ok(())
    }

    fn source(&self) -> Option<TokenSource> {
        self.load().ok().flatten().map(|_| TokenSource::File)
    }
}

// ---------------------------------------------------------------------------
// Memory
// ---------------------------------------------------------------------------

/// Process-local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    session: Mutex<Option<Session>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    /// Current session without going through the trait.
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Session>, AuthError> {
        Ok(self.snapshot())
    }

    fn store(&self, session: &Session) -> Result<(), AuthError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), AuthError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn source(&self) -> Option<TokenSource> {
        self.snapshot().map(|_| TokenSource::Memory)
    }
}
