//! Error types for loading payloads and configuration
//!
//! The analysis functions themselves never fail: malformed sample data
//! degrades to sentinel frames and empty results. Errors only arise at the
//! edges, when reading files or decoding JSON/TOML.

use thiserror::Error;

/// Errors that can occur while loading profiles or configuration
#[derive(Error, Debug)]
pub enum BrasaError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid profile JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("No profile data available for transaction '{transaction}'")]
    NoProfileData { transaction: String },
}

/// Result type for loading operations
pub type Result<T> = std::result::Result<T, BrasaError>;
