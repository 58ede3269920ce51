//! Test transaction model exchanged with the contract-testing engine.
//!
//! The engine owns the full transaction shape; hooks only ever touch
//! `request.headers`. Every other field is carried in `extra` so that a
//! decode/encode cycle leaves the engine's data untouched.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::error::HookError;

/// Header name to header value. Keys are unique, ordering carries no meaning.
pub type Headers = BTreeMap<String, String>;

/// One contract test case as handed to hooks by the engine.
///
/// `request` and `request.headers` distinguish an absent key (`None`) from
/// an explicit `null` (`Some(None)`) so both survive re-encoding.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    /// Outgoing request about to be dispatched
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub request: Option<Option<TransactionRequest>>,
    /// Fields owned by the engine, passed through opaquely (`name` included)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The request half of a transaction.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TransactionRequest {
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub headers: Option<Option<Headers>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn explicit_null<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl Transaction {
    /// Build a transaction whose request carries only the given headers.
    pub fn with_headers(headers: Headers) -> Self {
        Self {
            request: Some(Some(TransactionRequest {
                headers: Some(Some(headers)),
                extra: Map::new(),
            })),
            ..Default::default()
        }
    }

    /// Engine-assigned name, used to address named hooks.
    pub fn name(&self) -> Option<&str> {
        self.extra.get("name").and_then(Value::as_str)
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.extra.insert("name".to_string(), Value::String(name.into()));
    }

    pub fn request(&self) -> Option<&TransactionRequest> {
        self.request.as_ref().and_then(Option::as_ref)
    }

    pub fn headers(&self) -> Option<&Headers> {
        self.request()?.headers.as_ref().and_then(Option::as_ref)
    }

    /// Mutable access to `request.headers`.
    ///
    /// Fails with [`HookError::MissingField`] naming the first absent or
    /// null field.
    pub fn headers_mut(&mut self) -> Result<&mut Headers, HookError> {
        let request = self
            .request
            .as_mut()
            .and_then(Option::as_mut)
            .ok_or_else(|| HookError::missing_field("request"))?;
        request
            .headers
            .as_mut()
            .and_then(Option::as_mut)
            .ok_or_else(|| HookError::missing_field("request.headers"))
    }

    /// HTTP method of the request, if the engine supplied one.
    pub fn method(&self) -> Option<&str> {
        self.request_field("method")
    }

    /// Raw request body, if any.
    pub fn body(&self) -> Option<&str> {
        self.request_field("body")
    }

    /// Absolute URL the engine will dispatch this transaction to.
    ///
    /// Assembled from `protocol`, `host`, `port` and `fullPath`. The engine
    /// reports the protocol with a trailing colon (`https:`); both forms are
    /// accepted. `port` may arrive as a string or a number.
    pub fn target_url(&self) -> Option<String> {
        let host = self.extra.get("host")?.as_str()?;
        let scheme = self
            .extra
            .get("protocol")
            .and_then(Value::as_str)
            .map(|p| p.trim_end_matches(':'))
            .unwrap_or("http");
        let path = self.extra.get("fullPath").and_then(Value::as_str).unwrap_or("/");
        let port = match self.extra.get("port") {
            Some(Value::String(p)) if !p.is_empty() => Some(p.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Some(match port {
            Some(port) => format!("{}://{}:{}{}", scheme, host, port, path),
            None => format!("{}://{}{}", scheme, host, path),
        })
    }

    fn request_field(&self, key: &str) -> Option<&str> {
        self.request()?.extra.get(key)?.as_str()
    }
}
