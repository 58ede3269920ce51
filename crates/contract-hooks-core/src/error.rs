//! Unified error types for Contract Hooks Core.

use contract_hooks_types::{ConfigError, HookError};
use serde::Serialize;
use thiserror::Error;

/// Main error type for all hook handler operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum AppError {
    /// A hook or protocol frame failed.
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    /// Configuration loading or validation failed.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network request failed (HTTP client).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Socket or file I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transaction does not describe a dispatchable URL.
    #[error("Invalid target URL: {0}")]
    InvalidUrl(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.to_string().as_str())
    }
}

/// Result type alias for hook handler operations.
pub type AppResult<T> = Result<T, AppError>;
