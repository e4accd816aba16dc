use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLogoutArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLogoutResponse {
    cleared: bool,
    all_devices: bool,
}

pub async fn handle(
    args: &AuthLogoutArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    ctx.auth.logout(args.all_devices).await;
    let response = AuthLogoutResponse {
        cleared: !ctx.auth.is_authenticated(),
        all_devices: args.all_devices,
    };
    output(&response, flags.format)
}
