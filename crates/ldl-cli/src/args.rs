//! Command-line argument definitions for the LDL CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. A subcommand selects between checking and formatting a
//! level file; the global flags select the configuration file and logging
//! verbosity.

use clap::{Parser, Subcommand};

/// Command-line arguments for the LDL level tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse a level file and, when the configuration declares classes,
    /// execute it against probe entities
    Check {
        /// Path to the input level file
        input: String,
    },

    /// Print a level file in canonical form
    Fmt {
        /// Path to the input level file
        input: String,

        /// Write the formatted level here instead of standard output
        #[arg(short, long)]
        output: Option<String>,
    },
}

impl Command {
    /// The level file the command reads.
    pub fn input(&self) -> &str {
        match self {
            Command::Check { input } | Command::Fmt { input, .. } => input,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_with_global_flags() {
        let args = Args::try_parse_from([
            "ldl",
            "check",
            "level.ldl",
            "--config",
            "ldl.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert!(matches!(args.command, Command::Check { .. }));
        assert_eq!(args.command.input(), "level.ldl");
        assert_eq!(args.config.as_deref(), Some("ldl.toml"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_fmt_output_is_optional() {
        let args = Args::try_parse_from(["ldl", "fmt", "level.ldl"]).unwrap();
        assert!(matches!(args.command, Command::Fmt { output: None, .. }));
        assert_eq!(args.log_level, "info");

        let args = Args::try_parse_from(["ldl", "fmt", "level.ldl", "-o", "out.ldl"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Fmt { output: Some(ref path), .. } if path == "out.ldl"
        ));
    }

    #[test]
    fn test_subcommand_is_required() {
        assert!(Args::try_parse_from(["ldl", "level.ldl"]).is_err());
    }
}
