use clap::{Args, Subcommand};
use edge_core::Application;

/// Application access commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AppsCommands {
    /// List applications and whether the signed-in user may open them.
    List,
    /// Show the application switcher entries.
    Switcher,
    /// Switch to an application and remember the choice.
    Select(AppsSelectArgs),
    /// Print the full access report.
    Test,
}

#[derive(Clone, Debug, Args)]
pub struct AppsSelectArgs {
    /// Application identifier, e.g. `market_edge`.
    #[arg(value_parser = parse_application)]
    pub application: Application,
}

fn parse_application(value: &str) -> Result<Application, String> {
    value.parse::<Application>().map_err(|error| error.to_string())
}
