//! HTTP client used to send transactions to the API under test.
//!
//! Certificate trust is a property of the client built here. Relaxing it
//! affects only requests sent through that client, never other TLS users in
//! the process.


use std::time::Duration;

use contract_hooks_types::{Headers, HookError, Transaction, TransportConfig};
use reqwest::{Client, Method};

use crate::error::{AppError, AppResult};

/// Build a `reqwest::Client` honoring `config`.
pub fn build_http_client(config: &TransportConfig) -> AppResult<Client> {
    let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));

    if config.accept_invalid_certs {
        tracing::warn!("TLS certificate verification is disabled for the dispatch client");
        builder = builder.danger_accept_invalid_certs(true);
    }

    Ok(builder.build()?)
}

/// Response summary for a dispatched transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

/// Sends transactions exactly as hooks left them.
#[derive(Debug, Clone)]
pub struct TransactionDispatcher {
    client: Client,
}

impl TransactionDispatcher {
    pub fn new(config: &TransportConfig) -> AppResult<Self> {
        Ok(Self { client: build_http_client(config)? })
    }

    /// Accepts a pre-built client, e.g. one shared with other components.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn dispatch(&self, transaction: &Transaction) -> AppResult<DispatchOutcome> {
        let target = transaction.target_url().ok_or_else(|| HookError::missing_field("host"))?;
        let url = url::Url::parse(&target)
            .map_err(|e| AppError::InvalidUrl(format!("{}: {}", target, e)))?;
        let method = Method::from_bytes(transaction.method().unwrap_or("GET").as_bytes())
            .map_err(|e| HookError::protocol(format!("Invalid request method: {}", e)))?;

        tracing::debug!("Dispatching {} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(headers) = transaction.headers() {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }
        if let Some(body) = transaction.body().filter(|b| !b.is_empty()) {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(DispatchOutcome { status, headers, body })
    }
}
