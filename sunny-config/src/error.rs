use std::path::PathBuf;

use thiserror::Error;

/// Failures while resolving [`crate::ClientConfig`].
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid TOML in {path}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid JSON in {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to parse {path} as TOML ({toml}) or JSON ({json})")]
    UnknownFormat {
        path: PathBuf,
        toml: String,
        json: String,
    },
    #[error("failed to read env file {path}")]
    Dotenv {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
    #[error("invalid duration '{value}' for {key}")]
    InvalidDuration {
        key: String,
        value: String,
        #[source]
        source: humantime::DurationError,
    },
    #[error("invalid page '{page_id}': {reason}")]
    InvalidPage { page_id: String, reason: String },
}
