//! Error types for configuration loading and store-file discovery.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while locating the pattern store file.
///
/// The `Display` text of the discovery variants is reported verbatim to
/// callers of the command-line tool.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither a store file nor a config file was supplied, or the config
    /// file does not exist.
    #[error("config file not found")]
    ConfigNotFound(Option<PathBuf>),

    /// The config file exists but could not be read or parsed.
    #[error("config file read error")]
    ConfigRead(#[source] Box<ConfigError>),

    /// The resolved store file does not exist.
    #[error("db file not found")]
    DatabaseNotFound(PathBuf),

    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

impl ConfigError {
    /// Returns the path the error refers to, if any.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::ConfigNotFound(path) => path.as_deref(),
            Self::DatabaseNotFound(path) => Some(path),
            _ => None,
        }
    }
}

/// Convenience alias for results with [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;
