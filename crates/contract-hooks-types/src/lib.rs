//! # Contract Hooks Types
//!
//! Core types, models, and error definitions for Contract Hooks.
//!
//! - **`error`** - Typed error hierarchy for hook execution and configuration
//! - **`models`** - Transaction model, hook events, protocol messages, config
//!
//! ## Architecture Role
//!
//! ```text
//!          contract-hooks-types (this crate)
//!                      │
//!                      ▼
//!             contract-hooks-core
//!                      │
//!                      ▼
//!            contract-hooks-server
//! ```

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::{ConfigError, HookError, Result, TypedError};

// Re-export core model types
pub use models::{
    CredentialConfig, Headers, HookEvent, HookMessage, HooksConfig, ListenConfig,
    MissingCredentialPolicy, Transaction, TransactionRequest, TransportConfig,
    DEFAULT_CREDENTIAL_VAR, DEFAULT_HOST, DEFAULT_PORT,
};
