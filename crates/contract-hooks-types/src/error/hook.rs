//! Hook execution errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while running hooks against a transaction or while
/// exchanging hook protocol messages.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum HookError {
    /// The transaction lacks a field the hook writes to
    #[error("Transaction is missing required field `{field}`")]
    MissingField {
        /// Dotted path of the absent field
        field: String,
    },

    /// No credential available and the policy forbids the sentinel fallback
    #[error("Credential variable {var} is not set")]
    MissingCredential {
        /// Name of the environment variable that was read
        var: String,
    },

    /// Event name not understood by this handler
    #[error("Unknown hook event: {event}")]
    UnknownEvent {
        /// Event name as received
        event: String,
    },

    /// Malformed protocol frame or payload
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the framing or decoding failure
        message: String,
    },

    /// A registered hook reported a failure of its own
    #[error("Hook `{hook}` failed: {message}")]
    Failed {
        /// Name of the failing hook
        hook: String,
        /// Failure description
        message: String,
    },
}

impl HookError {
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol { message: message.into() }
    }
}

impl From<serde_json::Error> for HookError {
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(err.to_string())
    }
}
