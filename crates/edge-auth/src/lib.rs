//! # edge-auth
//!
//! Session lifecycle for MarketEdge clients.
//!
//! [`AuthController`] drives the state machine. It talks to the platform
//! through an [`AuthBackend`] (HTTP in production) and persists tokens through
//! a [`TokenStore`] (OS keychain with env and file fallbacks).

pub mod backend;
pub mod controller;
pub mod error;
pub mod http;
pub mod refresh;
pub mod state;
pub mod timers;
pub mod token_store;

pub use backend::{AuthBackend, LoginRequest, LoginResponse, TokenRefresh};
pub use controller::{AuthController, SessionSettings};
pub use error::{AuthError, BackendError};
pub use http::HttpBackend;
pub use state::{AuthPhase, AuthState};
pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenSource, TokenStore};
