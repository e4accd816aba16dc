use anyhow::Context;
use edge_auth::LoginRequest;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthLoginArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuthLoginResponse {
    authenticated: bool,
    user_id: String,
    email: String,
    role: String,
    tenant: Option<String>,
    token_source: Option<&'static str>,
}

pub async fn handle(
    args: &AuthLoginArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let request = LoginRequest {
        code: args.code.clone(),
        redirect_uri: args.redirect_uri.clone(),
        state: args.state.clone(),
    };
    let user = ctx.auth.login(request).await.context("login failed")?;
    let state = ctx.auth.state();

    let response = AuthLoginResponse {
        authenticated: state.is_authenticated(),
        user_id: user.id,
        email: user.email,
        role: user.role_name,
        tenant: state.tenant.map(|tenant| tenant.name),
        token_source: ctx.token_source().map(edge_auth::TokenSource::as_str),
    };
    output(&response, flags.format)
}
