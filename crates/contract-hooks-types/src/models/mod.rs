//! Core domain models for Contract Hooks.

mod config;
mod event;
mod transaction;

pub use config::{
    CredentialConfig, HooksConfig, ListenConfig, MissingCredentialPolicy, TransportConfig,
    DEFAULT_CREDENTIAL_VAR, DEFAULT_HOST, DEFAULT_PORT,
};
pub use event::{HookEvent, HookMessage};
pub use transaction::{Headers, Transaction, TransactionRequest};
