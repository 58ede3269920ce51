use std::path::Path;

use anyhow::Result;
use colored::Colorize;
use contract_hooks_core::config as core_config;
use contract_hooks_types::HooksConfig;

use crate::cli::ConfigCommands;

pub fn handle_config_command(cmd: ConfigCommands, path: Option<&Path>) -> Result<()> {
    match cmd {
        ConfigCommands::Show { json } => show_config(path, json),
        ConfigCommands::Init { force } => init_config(path, force),
        ConfigCommands::Path => {
            let path = match path {
                Some(p) => p.to_path_buf(),
                None => core_config::default_config_path()?,
            };
            println!("{}", path.display());
            Ok(())
        },
    }
}

fn show_config(path: Option<&Path>, json: bool) -> Result<()> {
    let config = core_config::load_config(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", "Hook Handler Configuration:".cyan().bold());
        println!("  Listen: {}", config.listen.address());
        println!("  Credential Variable: {}", config.credential.env_var);
        println!("  Missing Credential: {}", config.credential.missing);
        println!(
            "  Verify TLS Certificates: {}",
            if config.transport.accept_invalid_certs { "no".yellow() } else { "yes".green() }
        );
        println!("  Request Timeout: {}s", config.transport.timeout_secs);
    }
    Ok(())
}

fn init_config(path: Option<&Path>, force: bool) -> Result<()> {
    let target = match path {
        Some(p) => p.to_path_buf(),
        None => core_config::default_config_path()?,
    };
    if target.exists() && !force {
        anyhow::bail!("{} already exists (use --force to overwrite)", target.display());
    }

    let written = core_config::save_config(&HooksConfig::default(), Some(&target))?;
    println!("{} Wrote default config to {}", "✓".green(), written.display());
    Ok(())
}
