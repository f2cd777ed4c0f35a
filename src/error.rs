//! Error types for the Honey launcher.

use thiserror::Error;

use crate::plugin::PluginError;

/// Result type alias using the launcher Error.
pub type Result<T> = std::result::Result<T, Error>;

/// Launcher error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid plugin manifest.
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// A manifest pattern failed to compile.
    #[error("Invalid pattern for plugin '{plugin}': {source}")]
    Pattern {
        plugin: String,
        #[source]
        source: regex::Error,
    },

    /// Plugin registration or execution error.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parse error.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}
