//! The `beforeEach` hook that stamps every transaction with a bearer token.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use contract_hooks_types::{CredentialConfig, HookError, MissingCredentialPolicy, Transaction};

use crate::credential::{CredentialProvider, EnvCredential};
use crate::registry::HookRegistry;

pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Token text used when no credential is available under
/// [`MissingCredentialPolicy::Sentinel`].
pub const UNDEFINED_CREDENTIAL: &str = "undefined";

/// Sets `request.headers["Authorization"] = "Bearer <credential>"`.
///
/// The write is an unconditional overwrite of that exact key, so repeated
/// invocations converge on the same value and nothing else in the
/// transaction changes.
#[derive(Debug)]
pub struct RequestAugmenter {
    credential: Arc<dyn CredentialProvider>,
    policy: MissingCredentialPolicy,
    warned_missing: AtomicBool,
}

impl RequestAugmenter {
    pub fn new(credential: impl CredentialProvider + 'static) -> Self {
        Self {
            credential: Arc::new(credential),
            policy: MissingCredentialPolicy::default(),
            warned_missing: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &CredentialConfig) -> Self {
        Self::new(EnvCredential::new(config.env_var.clone())).with_policy(config.missing)
    }

    pub fn with_policy(mut self, policy: MissingCredentialPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> MissingCredentialPolicy {
        self.policy
    }

    /// Header value for the current credential.
    pub fn header_value(&self) -> Result<String, HookError> {
        let token = match self.credential.credential() {
            Some(token) => token,
            None => match self.policy {
                MissingCredentialPolicy::Reject => {
                    return Err(HookError::MissingCredential {
                        var: self.credential.source().to_string(),
                    });
                },
                MissingCredentialPolicy::Sentinel => {
                    if !self.warned_missing.swap(true, Ordering::Relaxed) {
                        tracing::warn!(
                            "Credential {} is not set; sending 'Bearer {}'",
                            self.credential.source(),
                            UNDEFINED_CREDENTIAL
                        );
                    }
                    UNDEFINED_CREDENTIAL.to_string()
                },
            },
        };
        Ok(format!("Bearer {}", token))
    }

    pub fn augment(&self, transaction: &mut Transaction) -> Result<(), HookError> {
        let headers = transaction.headers_mut()?;
        let value = self.header_value()?;
        headers.insert(AUTHORIZATION_HEADER.to_string(), value);
        Ok(())
    }

    /// Install this augmenter as a `beforeEach` hook.
    pub fn register(self, registry: &mut HookRegistry) {
        let augmenter = Arc::new(self);
        registry.before_each(move |transaction| augmenter.augment(transaction));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credential::StaticCredential;
    use contract_hooks_types::Headers;
    use serde_json::json;
    use serial_test::serial;

    fn transaction(value: serde_json::Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sets_bearer_header() {
        let augmenter = RequestAugmenter::new(StaticCredential::new("acme-corp"));
        let mut tx = transaction(json!({
            "request": { "headers": { "Content-Type": "application/json" } }
        }));

        augmenter.augment(&mut tx).unwrap();

        assert_eq!(
            serde_json::to_value(&tx).unwrap(),
            json!({
                "request": {
                    "headers": {
                        "Content-Type": "application/json",
                        "Authorization": "Bearer acme-corp"
                    }
                }
            })
        );
    }

    #[test]
    fn test_overwrites_existing_value_and_is_idempotent() {
        let augmenter = RequestAugmenter::new(StaticCredential::new("tok"));
        let mut headers = Headers::new();
        headers.insert("Authorization".to_string(), "Basic Zm9vOmJhcg==".to_string());
        let mut tx = Transaction::with_headers(headers);

        augmenter.augment(&mut tx).unwrap();
        let once = tx.clone();
        augmenter.augment(&mut tx).unwrap();

        assert_eq!(tx, once);
        assert_eq!(tx.headers().unwrap()["Authorization"], "Bearer tok");
        assert_eq!(tx.headers().unwrap().len(), 1);
    }

    #[test]
    fn test_leaves_other_fields_alone() {
        let augmenter = RequestAugmenter::new(StaticCredential::new("tok"));
        let before = json!({
            "name": "Users > Create",
            "fullPath": "/users",
            "expected": { "statusCode": "201" },
            "request": {
                "method": "POST",
                "body": "{\"name\":\"x\"}",
                "headers": { "authorization": "lowercase stays", "Accept": "*/*" }
            }
        });
        let mut tx = transaction(before.clone());

        augmenter.augment(&mut tx).unwrap();

        let mut expected = before;
        expected["request"]["headers"]["Authorization"] = json!("Bearer tok");
        assert_eq!(serde_json::to_value(&tx).unwrap(), expected);
    }

    #[test]
    fn test_keeps_explicit_nulls() {
        let mut registry = HookRegistry::new();
        RequestAugmenter::new(StaticCredential::new("tok")).register(&mut registry);
        let before = json!({
            "name": null,
            "origin": null,
            "request": { "body": null, "headers": { "Accept": "*/*" } }
        });
        let mut message = contract_hooks_types::HookMessage::new(
            "n-1",
            contract_hooks_types::HookEvent::BeforeEach,
            before.clone(),
        );

        registry.handle(&mut message).unwrap();

        let mut expected = before;
        expected["request"]["headers"]["Authorization"] = json!("Bearer tok");
        assert_eq!(message.data, expected);
    }

    #[test]
    fn test_missing_credential_uses_sentinel() {
        let augmenter = RequestAugmenter::new(StaticCredential::absent());
        let mut tx = Transaction::with_headers(Headers::new());

        augmenter.augment(&mut tx).unwrap();

        assert_eq!(tx.headers().unwrap()["Authorization"], "Bearer undefined");
    }

    #[test]
    fn test_missing_credential_rejected_when_configured() {
        let augmenter = RequestAugmenter::new(StaticCredential::absent())
            .with_policy(MissingCredentialPolicy::Reject);
        let mut tx = Transaction::with_headers(Headers::new());

        let err = augmenter.augment(&mut tx).unwrap_err();
        assert_eq!(err, HookError::MissingCredential { var: "static".to_string() });
        assert!(tx.headers().unwrap().is_empty());
    }

    #[test]
    fn test_missing_headers_fails() {
        let augmenter = RequestAugmenter::new(StaticCredential::new("tok"));
        let mut tx = transaction(json!({ "request": {} }));

        assert_eq!(
            augmenter.augment(&mut tx).unwrap_err(),
            HookError::missing_field("request.headers")
        );
        assert_eq!(serde_json::to_value(&tx).unwrap(), json!({ "request": {} }));
    }

    #[test]
    #[serial]
    fn test_env_variable_is_read_per_invocation() {
        let augmenter = RequestAugmenter::from_config(&CredentialConfig::default());
        let mut tx = Transaction::with_headers(Headers::new());

        std::env::set_var("ORG", "acme-corp");
        augmenter.augment(&mut tx).unwrap();
        assert_eq!(tx.headers().unwrap()["Authorization"], "Bearer acme-corp");

        std::env::set_var("ORG", "globex");
        augmenter.augment(&mut tx).unwrap();
        assert_eq!(tx.headers().unwrap()["Authorization"], "Bearer globex");

        std::env::remove_var("ORG");
        augmenter.augment(&mut tx).unwrap();
        assert_eq!(tx.headers().unwrap()["Authorization"], "Bearer undefined");
    }
}
