//! CLI logic for the LDL level tool.
//!
//! `ldl check` parses a level and, when the configuration declares a class
//! schema, executes it against probe entities. `ldl fmt` prints a level in
//! canonical form.

pub mod config;
pub mod error_adapter;

mod args;
mod schema;

pub use args::{Args, Command};

use std::{fs, io};

use log::info;
use thiserror::Error;

use ldl::{LdlError, LevelLoader, printer::FormatError, registry::Registry};

use crate::config::{CliConfig, ConfigError};

/// Every failure the CLI can report.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Ldl(#[from] LdlError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Cannot format level: {0}")]
    Format(#[from] FormatError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the LDL CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - File I/O errors
/// - Syntax errors
/// - Semantic errors while executing the level
/// - Statements the printer cannot spell
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.command.input(); "Processing level");

    let config = config::load_config(args.config.as_ref())?;

    match &args.command {
        Command::Check { input } => check(&config, input),
        Command::Fmt { input, output } => fmt(&config, input, output.as_deref()),
    }
}

fn check(config: &CliConfig, input: &str) -> Result<(), CliError> {
    let registry = schema::probe_registry(config.classes());
    let loader = LevelLoader::with_config(&registry, config.app().loader().clone());

    if config.classes().is_empty() {
        let statements = loader.load_level_statements(input)?;
        info!(statements = statements.len(); "Level is syntactically valid");
        return Ok(());
    }

    let level = loader.load_level(input)?;
    for placed in &level {
        let translation = placed.translation();
        info!(
            name = placed.name().as_str(),
            class = placed.class().as_str(),
            x = translation.x,
            y = translation.y,
            z = translation.z;
            "Placed entity"
        );
    }

    info!(entities = level.len(); "Level checked successfully");
    Ok(())
}

fn fmt(config: &CliConfig, input: &str, output: Option<&str>) -> Result<(), CliError> {
    // Formatting never constructs entities.
    let registry = Registry::new();
    let statements = LevelLoader::new(&registry).load_level_statements(input)?;
    let formatted = ldl::printer::format_statements(&statements, config.app().format())?;

    match output {
        Some(path) => {
            fs::write(path, formatted)?;
            info!(output_file = path; "Formatted level written");
        }
        None => print!("{formatted}"),
    }

    Ok(())
}
