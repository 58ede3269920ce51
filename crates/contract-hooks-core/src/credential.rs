//! Bearer credential sources.

use std::fmt;

/// Supplies the token placed after `Bearer ` on each invocation.
///
/// Implementations must not cache: a provider is asked again for every
/// transaction.
pub trait CredentialProvider: Send + Sync + fmt::Debug {
    /// Current credential, or `None` when nothing is configured.
    fn credential(&self) -> Option<String>;

    /// Human-readable origin, used in logs and errors.
    fn source(&self) -> &str;
}

/// Reads an environment variable at call time.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialProvider for EnvCredential {
    fn credential(&self) -> Option<String> {
        // Non-UTF-8 values are passed through lossily rather than dropped.
        std::env::var_os(&self.var).map(|v| v.to_string_lossy().into_owned())
    }

    fn source(&self) -> &str {
        &self.var
    }
}

/// Fixed credential, for embedding and tests.
#[derive(Clone, Default)]
pub struct StaticCredential {
    token: Option<String>,
}

impl StaticCredential {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: Some(token.into()) }
    }

    pub fn absent() -> Self {
        Self { token: None }
    }
}

impl fmt::Debug for StaticCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredential")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl CredentialProvider for StaticCredential {
    fn credential(&self) -> Option<String> {
        self.token.clone()
    }

    fn source(&self) -> &str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_credential_reads_at_call_time() {
        let provider = EnvCredential::new("CONTRACT_HOOKS_TEST_CREDENTIAL");

        std::env::remove_var("CONTRACT_HOOKS_TEST_CREDENTIAL");
        assert_eq!(provider.credential(), None);

        std::env::set_var("CONTRACT_HOOKS_TEST_CREDENTIAL", "first");
        assert_eq!(provider.credential().as_deref(), Some("first"));

        std::env::set_var("CONTRACT_HOOKS_TEST_CREDENTIAL", "second");
        assert_eq!(provider.credential().as_deref(), Some("second"));

        std::env::set_var("CONTRACT_HOOKS_TEST_CREDENTIAL", "");
        assert_eq!(provider.credential().as_deref(), Some(""));

        std::env::remove_var("CONTRACT_HOOKS_TEST_CREDENTIAL");
        assert_eq!(provider.source(), "CONTRACT_HOOKS_TEST_CREDENTIAL");
    }

    #[test]
    fn test_static_credential_redacts_debug() {
        let provider = StaticCredential::new("s3cr3t");
        assert_eq!(provider.credential().as_deref(), Some("s3cr3t"));
        assert!(!format!("{:?}", provider).contains("s3cr3t"));
        assert_eq!(StaticCredential::absent().credential(), None);
    }
}
