//! # Contract Hooks Core
//!
//! Runtime side of the hook handler for an API-contract testing engine.
//!
//! ```text
//! contract-hooks-core/src/
//! ├── credential.rs   # Where the bearer token comes from
//! ├── augmenter.rs    # beforeEach hook writing the Authorization header
//! ├── registry.rs     # Hooks keyed by lifecycle event / transaction name
//! ├── protocol/       # Newline-delimited JSON hook protocol over TCP
//! ├── transport/      # reqwest client with per-client TLS trust
//! ├── config.rs       # Load/save HooksConfig
//! └── logger.rs       # tracing-subscriber setup
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test code: panics and unwraps are the assertion mechanism"
    )
)]

pub mod augmenter;
pub mod config;
pub mod credential;
pub mod error;
pub mod logger;
pub mod protocol;
pub mod registry;
pub mod transport;

pub use augmenter::{RequestAugmenter, AUTHORIZATION_HEADER, UNDEFINED_CREDENTIAL};
pub use credential::{CredentialProvider, EnvCredential, StaticCredential};
pub use error::{AppError, AppResult};
pub use protocol::HookServer;
pub use registry::HookRegistry;
pub use transport::{build_http_client, DispatchOutcome, TransactionDispatcher};

pub use contract_hooks_types as types;
