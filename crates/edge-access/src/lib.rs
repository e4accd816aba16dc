//! # edge-access
//!
//! Resolves which MarketEdge applications a user may open and drives the
//! application switcher. Everything here is a pure function of the user's
//! [`ApplicationAccess`](edge_core::ApplicationAccess) list; the only I/O is the
//! persisted last selection, which is a UI convenience and never grants access.

pub mod error;
pub mod resolver;
pub mod switcher;
pub mod tester;

pub use error::AccessError;
pub use resolver::{
    accessible_applications, has_any_application_access, has_application_access, normalize,
    primary_application, primary_application_by,
};
pub use switcher::{ApplicationSwitcher, SelectionStore, SwitcherIcon};
pub use tester::{AccessReport, GrantRow};
