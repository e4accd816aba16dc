//! # edge-core
//!
//! Core types shared by the MarketEdge client crates.
//!
//! - Identity types returned by the backend (`User`, `Tenant`, `WhoAmI`)
//! - The `Application` enum and per-application access grants
//! - The `Session` token pair owned by the token store
//! - Cross-cutting error types

pub mod application;
pub mod errors;
pub mod identity;
pub mod session;

pub use application::{Application, ApplicationAccess};
pub use errors::CoreError;
pub use identity::{Role, Tenant, User, WhoAmI};
pub use session::Session;
