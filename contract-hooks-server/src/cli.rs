use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "contract-hooks",
    about = "Contract Hooks - bearer-token hook handler for API contract tests",
    version = env!("CARGO_PKG_VERSION"),
    author,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(short, long, global = true, env = "CONTRACT_HOOKS_CONFIG", help = "Path to config JSON")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(flatten)]
    pub serve: ServeArgs,
}

impl Cli {
    /// The subcommand to run; `serve` with the top-level serve args if none given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Serve(self.serve))
    }
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the hook handler (default if no command specified)")]
    Serve(ServeArgs),

    #[command(about = "Run beforeEach hooks on a transaction and print the result")]
    Apply {
        #[arg(help = "Transaction JSON file (stdin if omitted)")]
        file: Option<PathBuf>,
    },

    #[command(about = "Run beforeEach hooks on a transaction and send it")]
    Dispatch {
        #[arg(help = "Transaction JSON file (stdin if omitted)")]
        file: Option<PathBuf>,

        #[arg(long, help = "Verify TLS certificates even if the config relaxes them")]
        verify_certs: bool,
    },

    #[command(subcommand, about = "View and initialise configuration")]
    Config(ConfigCommands),
}

#[derive(Args, Default)]
pub struct ServeArgs {
    #[arg(long, env = "CONTRACT_HOOKS_HOST")]
    pub host: Option<String>,

    #[arg(short, long, env = "CONTRACT_HOOKS_PORT")]
    pub port: Option<u16>,

    #[arg(long, help = "Environment variable holding the bearer credential")]
    pub credential_var: Option<String>,

    #[arg(long, help = "Fail hooks instead of sending 'Bearer undefined'")]
    pub reject_missing_credential: bool,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Show the effective configuration")]
    Show {
        #[arg(short, long, help = "Output as JSON")]
        json: bool,
    },

    #[command(about = "Write a default configuration file")]
    Init {
        #[arg(long, help = "Overwrite an existing file")]
        force: bool,
    },

    #[command(about = "Print the config file location")]
    Path,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn serve_args(argv: &[&str]) -> ServeArgs {
        match Cli::try_parse_from(argv).unwrap().into_command() {
            Commands::Serve(args) => args,
            _ => panic!("expected serve for {:?}", argv),
        }
    }

    #[test]
    #[serial]
    fn test_implicit_serve_reads_environment() {
        std::env::set_var("CONTRACT_HOOKS_PORT", "7000");
        std::env::set_var("CONTRACT_HOOKS_HOST", "0.0.0.0");

        let implicit = serve_args(&["contract-hooks"]);
        let explicit = serve_args(&["contract-hooks", "serve"]);

        std::env::remove_var("CONTRACT_HOOKS_PORT");
        std::env::remove_var("CONTRACT_HOOKS_HOST");

        assert_eq!(implicit.port, Some(7000));
        assert_eq!(implicit.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(explicit.port, Some(7000));
    }

    #[test]
    #[serial]
    fn test_implicit_serve_accepts_flags() {
        let args = serve_args(&["contract-hooks", "--port", "7100", "--reject-missing-credential"]);
        assert_eq!(args.port, Some(7100));
        assert!(args.reject_missing_credential);

        let args = serve_args(&["contract-hooks", "serve", "-p", "7200"]);
        assert_eq!(args.port, Some(7200));
    }
}
