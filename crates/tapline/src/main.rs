// SPDX-FileCopyrightText: 2026 Tapline Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tapline - a traffic relay.
//!
//! This is the binary entry point for the relay.

mod check;
mod transports;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tapline_config::model::TaplineConfig;

/// Tapline - a traffic relay.
#[derive(Parser, Debug)]
#[command(name = "tapline", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate configuration and assemble every configured transport.
    Check {
        /// Print the report as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the transports this build knows about.
    Transports {
        /// Filter by kind, description, or config section.
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check { json }) => {
            let config = load_config(cli.config.as_deref());
            init_tracing(&config.relay.log_level);
            if let Err(e) = check::run_check(&config, json).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Transports { query }) => {
            transports::run_transports(query.as_deref());
        }
        None => {
            println!("tapline: use --help for available commands");
        }
    }
}

/// Load and validate configuration, exiting with rendered diagnostics on failure.
fn load_config(path: Option<&std::path::Path>) -> TaplineConfig {
    let loaded = match path {
        Some(path) => tapline_config::load_and_validate_path(path),
        None => tapline_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            tapline_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

/// Initialize the tracing subscriber; `RUST_LOG` overrides the configured level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("tapline={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    #[cfg(not(target_env = "msvc"))]
    fn jemalloc_is_active() {
        use tikv_jemalloc_ctl::{epoch, stats};
        epoch::advance().unwrap();
        let allocated = stats::allocated::read().unwrap();
        assert!(allocated > 0, "jemalloc should report non-zero allocation");
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::parse_from(["tapline", "check", "--config", "relay.toml", "--json"]);
        assert_eq!(cli.config, Some(PathBuf::from("relay.toml")));
        assert!(matches!(cli.command, Some(Commands::Check { json: true })));
    }

    #[test]
    fn transports_query_is_optional() {
        let cli = Cli::parse_from(["tapline", "transports"]);
        assert!(matches!(cli.command, Some(Commands::Transports { query: None })));
    }

    #[test]
    fn explicit_config_path_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tapline.toml");
        std::fs::write(&path, "[output]\nnull = true\n").unwrap();

        let config = tapline_config::load_and_validate_path(&path).unwrap();
        assert!(config.output.null);
    }
}
