use edge_auth::AuthState;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub fn handle(state: &AuthState, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let icons = ctx.switcher(state)?.icons();
    if icons.is_empty() {
        tracing::info!("switcher hidden: at most one application is accessible");
    }
    output(&icons, flags.format)
}
