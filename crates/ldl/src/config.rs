//! Configuration types for loading and formatting levels.
//!
//! All types implement [`serde::Deserialize`] with every field defaulted, so
//! an empty document yields the default configuration.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining loader and format settings.
//! - [`LoaderConfig`] - Controls statement execution, see [`RedeclarationPolicy`].
//! - [`FormatConfig`] - Controls the canonical printer layout.
//!
//! # Example
//!
//! ```
//! # use ldl::config::{AppConfig, RedeclarationPolicy};
//! let config = AppConfig::default();
//! assert_eq!(config.loader().redeclaration(), RedeclarationPolicy::Allow);
//! assert!(config.format().group_statements());
//! ```

use serde::Deserialize;

pub use ldl_parser::printer::FormatConfig;

/// Top-level configuration combining loader and format settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Loader configuration section.
    #[serde(default)]
    loader: LoaderConfig,

    /// Printer configuration section.
    #[serde(default)]
    format: FormatConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(loader: LoaderConfig, format: FormatConfig) -> Self {
        Self { loader, format }
    }

    /// Returns the loader configuration.
    pub fn loader(&self) -> &LoaderConfig {
        &self.loader
    }

    /// Returns the printer configuration.
    pub fn format(&self) -> &FormatConfig {
        &self.format
    }
}

/// What happens when a `let` statement reuses a declared name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RedeclarationPolicy {
    /// Rebind the name to the new entity. The earlier entity stays in the
    /// level but can no longer be referenced.
    #[default]
    Allow,
    /// Fail with [`LoadErrorKind::DuplicateName`](crate::LoadErrorKind::DuplicateName).
    Reject,
}

/// Statement execution settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    redeclaration: RedeclarationPolicy,
}

impl LoaderConfig {
    pub fn new(redeclaration: RedeclarationPolicy) -> Self {
        Self { redeclaration }
    }

    pub fn redeclaration(&self) -> RedeclarationPolicy {
        self.redeclaration
    }
}
