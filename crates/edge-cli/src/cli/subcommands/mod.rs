mod apps;
mod auth;

pub use apps::{AppsCommands, AppsSelectArgs};
pub use auth::{AuthCheckArgs, AuthCommands, AuthLoginArgs, AuthLogoutArgs};
