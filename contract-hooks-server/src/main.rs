//! Contract Hooks - Hook Handler Daemon
//!
//! Listens for the contract-testing engine's hook protocol and sets a bearer
//! `Authorization` header on every transaction before it is sent.
//!
//! The engine connects to 127.0.0.1:61321 by default.

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config_commands;

use cli::{Cli, Commands};
use contract_hooks_core::{config as core_config, logger};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init_logger(&cli.log_level);

    let config_path = cli.config.clone();
    let config_path = config_path.as_deref();

    match cli.into_command() {
        Commands::Config(cmd) => config_commands::handle_config_command(cmd, config_path),
        Commands::Serve(args) => {
            commands::handle_serve(core_config::load_config(config_path)?, args).await
        },
        Commands::Apply { file } => {
            commands::handle_apply(&core_config::load_config(config_path)?, file.as_deref())
        },
        Commands::Dispatch { file, verify_certs } => {
            let config = core_config::load_config(config_path)?;
            commands::handle_dispatch(config, file.as_deref(), verify_certs).await
        },
    }
}
