//! Error handling
//!
//! The only fallible operations in the core are the two configuration loads.
//! Their errors never escape the repository: they are logged and replaced by
//! the fail-open defaults (absent model, empty allow-list).

use std::path::PathBuf;

use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration load failure taxonomy.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid model: {0}")]
    InvalidModel(String),
}
