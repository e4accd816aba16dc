use edge_auth::AuthState;
use edge_core::Application;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AppsSelectArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AppsSelectResponse {
    application: Application,
    route: &'static str,
}

pub fn handle(
    args: &AppsSelectArgs,
    state: &AuthState,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.auth.record_activity();
    let application = ctx.switcher(state)?.select(args.application)?;
    output(
        &AppsSelectResponse {
            application,
            route: application.route(),
        },
        flags.format,
    )
}
