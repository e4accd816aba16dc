pub mod apps;
pub mod auth;
pub mod schema;

use crate::cli::{Commands, GlobalFlags};
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => auth::handle(&action, ctx, flags).await,
        Commands::Apps { action } => apps::handle(&action, ctx, flags).await,
        Commands::Schema(args) => schema::handle(&args, flags),
    }
}
