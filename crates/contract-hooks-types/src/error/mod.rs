//! Typed error definitions for Contract Hooks.
//!
//! All errors are serializable so they can be reported back over the hook
//! protocol or in CLI output, and matchable for error handling logic.

mod config;
mod hook;

pub use config::ConfigError;
pub use hook::HookError;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type that wraps all domain-specific errors.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "domain", content = "error")]
pub enum TypedError {
    /// Wraps a hook execution error
    #[error("Hook error: {0}")]
    Hook(#[from] HookError),

    /// Wraps a configuration error
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Standard Result type using TypedError.
pub type Result<T> = std::result::Result<T, TypedError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let err = TypedError::Hook(HookError::MissingField { field: "request.headers".to_string() });

        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("Hook"));
        assert!(json.contains("request.headers"));

        let deserialized: TypedError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, deserialized);
    }

    #[test]
    fn test_error_display() {
        let err = HookError::MissingCredential { var: "ORG".to_string() };

        let msg = format!("{}", TypedError::from(err));
        assert!(msg.starts_with("Hook error"));
        assert!(msg.contains("ORG"));
    }
}
