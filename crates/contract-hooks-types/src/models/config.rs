//! Hook handler configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::error::ConfigError;

/// Port the test engine connects to by default.
pub const DEFAULT_PORT: u16 = 61321;
pub const DEFAULT_HOST: &str = "127.0.0.1";
/// Environment variable holding the bearer credential.
pub const DEFAULT_CREDENTIAL_VAR: &str = "ORG";

/// Full hook handler configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct HooksConfig {
    /// Where the hook protocol server listens
    #[validate(nested)]
    pub listen: ListenConfig,
    /// Credential source for the Authorization header
    #[validate(nested)]
    pub credential: CredentialConfig,
    /// HTTP client used to dispatch transactions
    #[validate(nested)]
    pub transport: TransportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct ListenConfig {
    #[validate(length(min = 1_u64))]
    pub host: String,
    #[validate(range(min = 1_u16))]
    pub port: u16,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), port: DEFAULT_PORT }
    }
}

impl ListenConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable read on every hook invocation
    #[validate(length(min = 1_u64))]
    pub env_var: String,
    /// What to do when the variable is unset
    pub missing: MissingCredentialPolicy,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self { env_var: DEFAULT_CREDENTIAL_VAR.to_string(), missing: MissingCredentialPolicy::default() }
    }
}

/// Behavior when no credential is available.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingCredentialPolicy {
    /// Send `Bearer undefined`
    #[default]
    Sentinel,
    /// Fail the hook
    Reject,
}

impl fmt::Display for MissingCredentialPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Sentinel => write!(f, "sentinel"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// Settings for the HTTP client that talks to the API under test.
///
/// Certificate trust is relaxed per client built from this config, never
/// for the whole process.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct TransportConfig {
    /// Skip certificate-chain and hostname validation
    pub accept_invalid_certs: bool,
    /// Request timeout in seconds
    #[validate(range(min = 1_u64, max = 3600_u64))]
    pub timeout_secs: u64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self { accept_invalid_certs: true, timeout_secs: 30 }
    }
}

impl HooksConfig {
    /// Run field validation, reporting the first failing field.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate().map_err(|errors| {
            let field = errors
                .errors()
                .keys()
                .next()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "config".to_string());
            ConfigError::ValidationError { field, message: errors.to_string() }
        })
    }
}
