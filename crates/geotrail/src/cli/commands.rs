//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::builder::BoolishValueParser;
use clap::{ArgAction, Args, Subcommand, ValueEnum};

/// Capture command arguments.
#[derive(Debug, Args)]
pub struct CaptureCommand {
    /// Latitude to record (overrides the configured position)
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude to record (overrides the configured position)
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Preference commands.
#[derive(Debug, Subcommand)]
pub enum PrefCommand {
    /// Print a preference value
    Get {
        /// Preference name (e.g. darkMode)
        name: String,

        /// Value to print when the preference is not set
        #[arg(long, action = ArgAction::Set, default_value_t = false, value_parser = BoolishValueParser::new())]
        default: bool,
    },

    /// Set a preference value
    Set {
        /// Preference name (e.g. darkMode)
        name: String,

        /// New value (true/false, on/off, yes/no)
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        value: bool,
    },

    /// Invert a preference and print the new value
    Toggle {
        /// Preference name (e.g. darkMode)
        name: String,
    },
}

/// Theme command arguments.
#[derive(Debug, Args)]
pub struct ThemeCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_pref_command_debug() {
        let cmd = PrefCommand::Set {
            name: "darkMode".to_string(),
            value: true,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Set"));
        assert!(debug_str.contains("darkMode"));
    }

    #[test]
    fn test_capture_command_debug() {
        let cmd = CaptureCommand {
            lat: Some(1.0),
            lon: Some(2.0),
            format: OutputFormat::Json,
        };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("lat"));
        assert!(debug_str.contains("Json"));
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: false };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
    }
}
