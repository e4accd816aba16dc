use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthStatusResponse {
    phase: &'static str,
    authenticated: bool,
    user: Option<String>,
    role: Option<String>,
    tenant: Option<String>,
    token_source: Option<&'static str>,
}

pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let state = ctx.auth.initialize().await;

    let response = AuthStatusResponse {
        phase: state.phase.as_str(),
        authenticated: state.is_authenticated(),
        user: state.user.as_ref().map(|user| user.email.clone()),
        role: state.user.as_ref().map(|user| user.role_name.clone()),
        tenant: state.tenant.as_ref().map(|tenant| tenant.name.clone()),
        token_source: ctx.token_source().map(edge_auth::TokenSource::as_str),
    };
    output(&response, flags.format)
}
