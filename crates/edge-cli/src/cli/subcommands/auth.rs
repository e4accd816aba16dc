use clap::{Args, Subcommand};

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Exchange an authorization code for a session.
    Login(AuthLoginArgs),
    /// Sign out and clear stored credentials.
    Logout(AuthLogoutArgs),
    /// Show current auth status.
    Status,
    /// Show the signed-in user, tenant, and permissions.
    Whoami,
    /// Check permissions or role of the signed-in user.
    Check(AuthCheckArgs),
}

#[derive(Clone, Debug, Args)]
pub struct AuthLoginArgs {
    /// Authorization code from the identity provider callback.
    #[arg(long)]
    pub code: String,
    /// Redirect URI the code was issued for.
    #[arg(long)]
    pub redirect_uri: String,
    /// Opaque state echoed by the identity provider.
    #[arg(long)]
    pub state: Option<String>,
}

#[derive(Clone, Debug, Args)]
pub struct AuthLogoutArgs {
    /// Invalidate sessions on every device, not just this one.
    #[arg(long)]
    pub all_devices: bool,
}

#[derive(Clone, Debug, Args)]
pub struct AuthCheckArgs {
    /// Permission to check (repeatable).
    #[arg(long)]
    pub permission: Vec<String>,
    /// Role to check.
    #[arg(long)]
    pub role: Option<String>,
    /// Pass when any permission is held instead of all of them.
    #[arg(long)]
    pub any: bool,
}
