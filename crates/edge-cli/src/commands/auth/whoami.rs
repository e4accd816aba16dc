use edge_core::{Tenant, User};
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct WhoAmIResponse {
    name: String,
    user: User,
    tenant: Option<Tenant>,
    permissions: Vec<String>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = ctx.require_session().await?;
    let Some(user) = state.user else {
        anyhow::bail!("session has no user");
    };

    let response = WhoAmIResponse {
        name: user.display_name(),
        user,
        tenant: state.tenant,
        permissions: state.permissions,
    };
    output(&response, flags.format)
}
