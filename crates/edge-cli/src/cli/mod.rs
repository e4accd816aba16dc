use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `medge` binary.
#[derive(Debug, Parser)]
#[command(name = "medge", version, about = "MarketEdge - session and application access client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub const fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use edge_core::Application;

    use super::subcommands::{AppsCommands, AuthCommands};
    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["medge", "--format", "table", "--verbose", "auth", "status"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Status
            }
        ));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["medge", "apps", "list", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(
            cli.command,
            Commands::Apps {
                action: AppsCommands::List
            }
        ));
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let parsed = Cli::try_parse_from(["medge", "-q", "-v", "auth", "status"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["medge", "--format", "xml", "auth", "status"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn login_requires_code_and_redirect_uri() {
        assert!(Cli::try_parse_from(["medge", "auth", "login", "--code", "abc"]).is_err());

        let cli = Cli::try_parse_from([
            "medge",
            "auth",
            "login",
            "--code",
            "abc",
            "--redirect-uri",
            "http://localhost:3000/callback",
            "--state",
            "xyz",
        ])
        .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Login(args),
        } = cli.command
        else {
            panic!("expected auth login");
        };
        assert_eq!(args.code, "abc");
        assert_eq!(args.state.as_deref(), Some("xyz"));
    }

    #[test]
    fn check_collects_repeated_permissions() {
        let cli = Cli::try_parse_from([
            "medge",
            "auth",
            "check",
            "--permission",
            "read:reports",
            "--permission",
            "manage:users",
            "--role",
            "admin",
        ])
        .expect("cli should parse");
        let Commands::Auth {
            action: AuthCommands::Check(args),
        } = cli.command
        else {
            panic!("expected auth check");
        };
        assert_eq!(args.permission, vec!["read:reports", "manage:users"]);
        assert_eq!(args.role.as_deref(), Some("admin"));
        assert!(!args.any);
    }

    #[test]
    fn select_parses_application_spellings() {
        for spelling in ["value_edge", "VALUE_EDGE", "value-edge"] {
            let cli = Cli::try_parse_from(["medge", "apps", "select", spelling])
                .expect("cli should parse");
            let Commands::Apps {
                action: AppsCommands::Select(args),
            } = cli.command
            else {
                panic!("expected apps select");
            };
            assert_eq!(args.application, Application::ValueEdge);
        }
        assert!(Cli::try_parse_from(["medge", "apps", "select", "spreadsheet_edge"]).is_err());
    }

    #[test]
    fn logout_all_devices_flag() {
        let cli = Cli::try_parse_from(["medge", "auth", "logout", "--all-devices"])
            .expect("cli should parse");
        assert!(matches!(
            cli.command,
            Commands::Auth {
                action: AuthCommands::Logout(ref args)
            } if args.all_devices
        ));
    }
}
