//! Command-line interface for geotrail.
//!
//! This module provides the CLI structure and output rendering for the
//! `geotrail` binary. It is presentation only; all persistence goes through
//! the library's stores.

mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CaptureCommand, ConfigCommand, ListCommand, OutputFormat, PrefCommand, StatusCommand,
    ThemeCommand,
};

/// geotrail - Keep a local history of where you've been
///
/// Captures your current position into an append-only on-device log and
/// remembers your display preferences.
#[derive(Debug, Parser)]
#[command(name = "geotrail")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Capture the current position
    Capture(CaptureCommand),

    /// List captured positions, oldest first
    List(ListCommand),

    /// Read or change preferences
    #[command(subcommand)]
    Pref(PrefCommand),

    /// Show the palette for the current dark-mode setting
    Theme(ThemeCommand),

    /// Show database status
    Status(StatusCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                2 => crate::logging::Verbosity::Debug,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::Verbosity;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "geotrail");
    }

    #[test]
    fn test_cli_verify() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["geotrail", "list"]).verbosity(), Verbosity::Normal);
        assert_eq!(
            parse(&["geotrail", "-v", "list"]).verbosity(),
            Verbosity::Verbose
        );
        assert_eq!(
            parse(&["geotrail", "-vv", "list"]).verbosity(),
            Verbosity::Debug
        );
        assert_eq!(
            parse(&["geotrail", "-vvv", "list"]).verbosity(),
            Verbosity::Trace
        );
        assert_eq!(
            parse(&["geotrail", "-q", "list"]).verbosity(),
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_parse_capture_with_negative_coordinates() {
        let cli = parse(&["geotrail", "capture", "--lat", "-23.55", "--lon", "-46.63"]);
        match cli.command {
            Command::Capture(cmd) => {
                assert_eq!(cmd.lat, Some(-23.55));
                assert_eq!(cmd.lon, Some(-46.63));
                assert_eq!(cmd.format, OutputFormat::Plain);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_capture_requires_both_coordinates() {
        let result = Cli::try_parse_from(["geotrail", "capture", "--lat", "10"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_capture_without_coordinates() {
        let cli = parse(&["geotrail", "capture"]);
        assert!(matches!(
            cli.command,
            Command::Capture(CaptureCommand {
                lat: None,
                lon: None,
                ..
            })
        ));
    }

    #[test]
    fn test_parse_list_json() {
        let cli = parse(&["geotrail", "list", "--format", "json"]);
        match cli.command {
            Command::List(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pref_set() {
        let cli = parse(&["geotrail", "pref", "set", "darkMode", "on"]);
        match cli.command {
            Command::Pref(PrefCommand::Set { name, value }) => {
                assert_eq!(name, "darkMode");
                assert!(value);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_pref_get_default() {
        let cli = parse(&["geotrail", "pref", "get", "missingKey"]);
        assert!(matches!(
            cli.command,
            Command::Pref(PrefCommand::Get { default: false, .. })
        ));

        let cli = parse(&["geotrail", "pref", "get", "missingKey", "--default", "true"]);
        assert!(matches!(
            cli.command,
            Command::Pref(PrefCommand::Get { default: true, .. })
        ));
    }

    #[test]
    fn test_parse_pref_toggle() {
        let cli = parse(&["geotrail", "pref", "toggle", "darkMode"]);
        assert!(matches!(cli.command, Command::Pref(PrefCommand::Toggle { .. })));
    }

    #[test]
    fn test_parse_with_config() {
        let cli = parse(&["geotrail", "-c", "/custom/config.toml", "status"]);
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_theme_json() {
        let cli = parse(&["geotrail", "theme", "--json"]);
        assert!(matches!(
            cli.command,
            Command::Theme(ThemeCommand { json: true })
        ));
    }
}
