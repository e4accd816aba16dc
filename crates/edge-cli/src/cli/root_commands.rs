use clap::{Args, Subcommand};

use crate::cli::subcommands::{AppsCommands, AuthCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Authentication and session management.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Application access and the application switcher.
    Apps {
        #[command(subcommand)]
        action: AppsCommands,
    },
    /// Print the JSON Schema of a wire type.
    Schema(SchemaArgs),
}

#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Type name: user, tenant, whoami, application, application_access, role.
    pub type_name: String,
}
