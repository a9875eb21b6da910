//! Error types for loading configuration.

use std::path::PathBuf;

/// A misconfigured variant or settings file. Raised at load time only.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("variant `{variant}` is missing required tunable `{field}`")]
    MissingTunable { variant: String, field: &'static str },

    #[error("variant `{variant}` has invalid `{field}`: {reason}")]
    InvalidTunable {
        variant: String,
        field: &'static str,
        reason: &'static str,
    },

    #[error("variant `{0}` is defined more than once")]
    DuplicateVariant(String),
}
