/// Structured error types for promptctl-core.
///
/// The CLI wraps these in `anyhow` for context chains; library consumers get
/// a matchable enum.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for promptctl-core operations
#[derive(Error, Debug)]
pub enum PromptError {
    /// I/O failed on a specific path
    #[error("I/O error on {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },

    /// The export root handed to the extractor is not a directory
    #[error("Input directory does not exist: {}", path.display())]
    InputDirMissing { path: PathBuf },

    /// Directory walk failed
    #[error("Failed to walk export tree: {source}")]
    Walk {
        #[from]
        source: walkdir::Error,
    },

    /// Config file could not be parsed
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },

    /// JSON serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },
}

/// Result type alias for promptctl-core operations
pub type Result<T> = std::result::Result<T, PromptError>;

impl PromptError {
    /// Create an I/O error tied to the path that failed
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn input_dir_missing(path: impl Into<PathBuf>) -> Self {
        Self::InputDirMissing { path: path.into() }
    }

    pub fn config_parse(path: impl Into<PathBuf>, source: toml::de::Error) -> Self {
        Self::ConfigParse {
            path: path.into(),
            source,
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }
}
