use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use contract_hooks_core::{HookRegistry, HookServer, RequestAugmenter, TransactionDispatcher};
use contract_hooks_types::{HookEvent, HookMessage, HooksConfig, MissingCredentialPolicy, Transaction};
use tracing::{info, warn};

use crate::cli::ServeArgs;

/// Fold command-line overrides into the loaded configuration.
pub fn apply_serve_overrides(mut config: HooksConfig, args: ServeArgs) -> Result<HooksConfig> {
    if let Some(host) = args.host {
        config.listen.host = host;
    }
    if let Some(port) = args.port {
        config.listen.port = port;
    }
    if let Some(var) = args.credential_var {
        config.credential.env_var = var;
    }
    if args.reject_missing_credential {
        config.credential.missing = MissingCredentialPolicy::Reject;
    }
    config.check()?;
    Ok(config)
}

/// Registry with the bearer-token augmenter on `beforeEach`.
pub fn build_registry(config: &HooksConfig) -> HookRegistry {
    let mut registry = HookRegistry::new();
    RequestAugmenter::from_config(&config.credential).register(&mut registry);
    registry
}

pub async fn handle_serve(config: HooksConfig, args: ServeArgs) -> Result<()> {
    let config = apply_serve_overrides(config, args)?;
    let registry = Arc::new(build_registry(&config));

    info!("🚀 Contract Hooks v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "🔑 Authorization: Bearer <${}> (missing credential: {})",
        config.credential.env_var, config.credential.missing
    );
    if std::env::var_os(&config.credential.env_var).is_none() {
        warn!("⚠️ {} is not set in this environment", config.credential.env_var);
    }
    if config.transport.accept_invalid_certs {
        warn!("⚠️ Dispatch client accepts invalid TLS certificates");
    }

    let server = HookServer::bind(&config.listen.address(), registry)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen.address()))?;

    server
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Failed to listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    Ok(())
}

pub fn handle_apply(config: &HooksConfig, file: Option<&Path>) -> Result<()> {
    let registry = build_registry(config);
    let transaction = run_before_each(&registry, read_input(file)?)?;
    println!("{}", serde_json::to_string_pretty(&transaction)?);
    Ok(())
}

pub async fn handle_dispatch(
    mut config: HooksConfig,
    file: Option<&Path>,
    verify_certs: bool,
) -> Result<()> {
    if verify_certs {
        config.transport.accept_invalid_certs = false;
    }

    let registry = build_registry(&config);
    let value = run_before_each(&registry, read_input(file)?)?;
    let transaction: Transaction = serde_json::from_value(value)?;

    let dispatcher = TransactionDispatcher::new(&config.transport)?;
    let outcome = dispatcher.dispatch(&transaction).await?;

    let code = outcome.status.to_string();
    let status =
        if (200..400).contains(&outcome.status) { code.as_str().green() } else { code.as_str().red() };
    println!("{} {}", "Status:".cyan().bold(), status);
    if !outcome.body.is_empty() {
        println!("{}", outcome.body);
    }
    Ok(())
}

/// Push a transaction through the same message path the server uses.
fn run_before_each(registry: &HookRegistry, data: serde_json::Value) -> Result<serde_json::Value> {
    let mut message =
        HookMessage::new(uuid::Uuid::new_v4().to_string(), HookEvent::BeforeEach, data);
    registry.handle(&mut message)?;
    Ok(message.data)
}

fn read_input(file: Option<&Path>) -> Result<serde_json::Value> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("Failed to read stdin")?;
            buf
        },
    };
    serde_json::from_str(&raw).context("Input is not valid JSON")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use contract_hooks_types::DEFAULT_PORT;
    use serde_json::json;

    #[test]
    fn test_overrides_replace_config_values() {
        let args = ServeArgs {
            host: Some("0.0.0.0".to_string()),
            port: Some(7000),
            credential_var: Some("API_TOKEN".to_string()),
            reject_missing_credential: true,
        };
        let config = apply_serve_overrides(HooksConfig::default(), args).unwrap();

        assert_eq!(config.listen.address(), "0.0.0.0:7000");
        assert_eq!(config.credential.env_var, "API_TOKEN");
        assert_eq!(config.credential.missing, MissingCredentialPolicy::Reject);
    }

    #[test]
    fn test_no_overrides_keeps_defaults() {
        let config = apply_serve_overrides(HooksConfig::default(), ServeArgs::default()).unwrap();
        assert_eq!(config.listen.port, DEFAULT_PORT);
        assert_eq!(config.credential.missing, MissingCredentialPolicy::Sentinel);
    }

    #[test]
    fn test_overrides_are_validated() {
        let args = ServeArgs { port: Some(0), ..ServeArgs::default() };
        assert!(apply_serve_overrides(HooksConfig::default(), args).is_err());
    }

    #[test]
    fn test_apply_pipeline_writes_header() {
        let mut config = HooksConfig::default();
        config.credential.env_var = "CONTRACT_HOOKS_SERVER_TEST_UNSET".to_string();
        let registry = build_registry(&config);

        let out = run_before_each(
            &registry,
            json!({ "request": { "headers": { "Content-Type": "application/json" } } }),
        )
        .unwrap();

        assert_eq!(
            out,
            json!({
                "request": {
                    "headers": {
                        "Content-Type": "application/json",
                        "Authorization": "Bearer undefined"
                    }
                }
            })
        );
    }
}
