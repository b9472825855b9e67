//! Centralized error types for the provcrate workspace.

use thiserror::Error;

/// Top-level error enum. Variants map to subsystems.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CrateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provenance log error: {0}")]
    Log(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Crate assembly error: {0}")]
    Assembly(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CrateResult<T> = Result<T, CrateError>;
