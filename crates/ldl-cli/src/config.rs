//! CLI configuration: the library's [`AppConfig`] sections plus the class
//! schema `ldl check` uses to build probe entities.
//!
//! ```toml
//! [loader]
//! redeclaration = "reject"
//!
//! [[classes]]
//! name = "game.track.Rail"
//! constructors = [["number"], ["number", "string"]]
//! connectors = [
//!     { name = "tail", translation = [-1.0, 0.0, 0.0] },
//!     { name = "head", translation = [1.0, 0.0, 0.0] },
//! ]
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use ldl::{config::AppConfig, literal::LiteralKind};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),
}

/// The full CLI configuration: library settings plus the class schema.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    app: AppConfig,

    /// Classes that `ldl check` may construct.
    #[serde(default)]
    classes: Vec<ClassSchema>,
}

impl CliConfig {
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    pub fn classes(&self) -> &[ClassSchema] {
        &self.classes
    }
}

/// Declares one registry class for checking levels without the game.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassSchema {
    /// Fully qualified class name.
    name: String,

    /// Registered as a non-entity class; constructing it fails.
    #[serde(default)]
    opaque: bool,

    /// Parameter kind lists, tried in order.
    #[serde(default)]
    constructors: Vec<Vec<LiteralKind>>,

    /// Connectors of every constructed entity. Absent means the entity has
    /// no connector capability at all.
    #[serde(default)]
    connectors: Option<Vec<ConnectorSchema>>,
}

impl ClassSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn opaque(&self) -> bool {
        self.opaque
    }

    pub fn constructors(&self) -> &[Vec<LiteralKind>] {
        &self.constructors
    }

    pub fn connectors(&self) -> Option<&[ConnectorSchema]> {
        self.connectors.as_deref()
    }
}

/// A connector facing along its local +Z axis, offset from the entity origin.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectorSchema {
    name: String,

    #[serde(default)]
    translation: [f64; 3],
}

impl ConnectorSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn translation(&self) -> [f64; 3] {
        self.translation
    }
}

/// Loads the CLI configuration.
///
/// The first of these wins: `explicit_path`, `ldl/config.toml` under the
/// working directory, `config.toml` in the platform config directory. With
/// none present the defaults apply and no classes are declared.
///
/// # Errors
///
/// [`ConfigError::MissingFile`] when `explicit_path` does not exist, and
/// [`ConfigError::Io`] or [`ConfigError::Parse`] when the chosen file cannot
/// be read or parsed.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, ConfigError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("ldl/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    match ProjectDirs::from("com", "ldl", "ldl") {
        Some(dirs) => {
            let system_config = dirs.config_dir().join("config.toml");
            if system_config.exists() {
                info!(path = system_config.display().to_string(); "Loading configuration from system path");
                return load_config_file(&system_config);
            }
            debug!(path = system_config.display().to_string(); "System configuration file not found");
        }
        None => debug!("Could not determine platform-specific config directory"),
    }

    debug!("No configuration file found, using defaults");
    Ok(CliConfig::default())
}

fn load_config_file(path: &Path) -> Result<CliConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()));
    }

    parse_config(&fs::read_to_string(path)?)
}

fn parse_config(content: &str) -> Result<CliConfig, ConfigError> {
    let config: CliConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    debug!(classes = config.classes.len(); "Configuration parsed");
    Ok(config)
}
