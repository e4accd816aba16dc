use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCheckArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct PermissionResult {
    permission: String,
    granted: bool,
}

#[derive(Serialize)]
struct AuthCheckResponse {
    allowed: bool,
    permissions: Vec<PermissionResult>,
    role: Option<RoleResult>,
}

#[derive(Serialize)]
struct RoleResult {
    role: String,
    matches: bool,
}

/// Print the check result; fail the command when the check does not pass.
pub async fn handle(
    args: &AuthCheckArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if args.permission.is_empty() && args.role.is_none() {
        anyhow::bail!("nothing to check; pass --permission and/or --role");
    }
    ctx.require_session().await?;

    let permissions = args
        .permission
        .iter()
        .map(|permission| PermissionResult {
            permission: permission.clone(),
            granted: ctx.auth.has_permission(permission),
        })
        .collect::<Vec<_>>();
    let role = args.role.as_ref().map(|role| RoleResult {
        role: role.clone(),
        matches: ctx.auth.has_role(role),
    });

    let requested: Vec<&str> = args.permission.iter().map(String::as_str).collect();
    let permissions_ok = if requested.is_empty() {
        true
    } else if args.any {
        ctx.auth.has_any_permission(&requested)
    } else {
        permissions.iter().all(|result| result.granted)
    };
    let role_ok = role.as_ref().is_none_or(|result| result.matches);
    let allowed = permissions_ok && role_ok;

    output(
        &AuthCheckResponse {
            allowed,
            permissions,
            role,
        },
        flags.format,
    )?;
    if !allowed {
        anyhow::bail!("access check failed");
    }
    Ok(())
}
