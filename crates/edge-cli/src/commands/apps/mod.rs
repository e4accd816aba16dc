mod list;
mod select;
mod switcher;
mod test;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AppsCommands;
use crate::context::AppContext;

/// Handle `medge apps <subcommand>`.
pub async fn handle(
    action: &AppsCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let state = ctx.require_session().await?;
    match action {
        AppsCommands::List => list::handle(&state, ctx, flags),
        AppsCommands::Switcher => switcher::handle(&state, ctx, flags),
        AppsCommands::Select(args) => select::handle(args, &state, ctx, flags),
        AppsCommands::Test => test::handle(&state, ctx, flags),
    }
}
