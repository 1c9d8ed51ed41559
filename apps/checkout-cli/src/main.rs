//! # Bounce Checkout CLI
//!
//! Quotes carts, replays checkout action scripts and stores orders.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        bounce-checkout                                  │
//! │                                                                         │
//! │  args ──► init_tracing ──► AppConfig::load ──► subcommand              │
//! │                                                   │                     │
//! │                    ┌──────────────────────────────┼──────────────┐      │
//! │                    ▼                              ▼              ▼      │
//! │             quote / replay                    submit       orders /    │
//! │             (bounce-core)               (core + bounce-db)  catalog    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```bash
//! bounce-checkout quote cart.json
//! bounce-checkout replay actions.json --strict
//! bounce-checkout submit cart.json --json
//! bounce-checkout orders --date 2024-06-01
//! bounce-checkout catalog --kind extra
//! ```

mod cart;
mod commands;
mod config;
mod error;
mod render;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{debug, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::commands::{
    catalog::CatalogArgs, orders::OrdersArgs, quote::QuoteArgs, replay::ReplayArgs,
    submit::SubmitArgs,
};
use crate::config::AppConfig;
use crate::error::CliResult;

const DEFAULT_LOG_FILTER: &str = "info,bounce=debug,sqlx=warn";

#[derive(Debug, Parser)]
#[command(name = "bounce-checkout", about = "Bounce house rental checkout", long_about = None)]
struct Cli {
    /// Config file (default: platform config dir / checkout.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Price a cart request
    Quote(QuoteArgs),
    /// Replay a JSON array of checkout actions
    Replay(ReplayArgs),
    /// Validate a cart request and store it as an order
    Submit(SubmitArgs),
    /// List stored orders
    Orders(OrdersArgs),
    /// List the stored catalog
    Catalog(CatalogArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    let log_handle = init_tracing(cli.verbose, rust_log.as_deref());

    // an explicit --config must load; the default location may be broken
    let config = match cli.config.clone() {
        Some(path) => AppConfig::load(Some(path))?,
        None => AppConfig::load_or_default(None),
    };
    if let Some(filter) = configured_filter(&config, cli.verbose, rust_log.is_some()) {
        apply_configured_filter(&log_handle, filter);
    }
    debug!(pricing = ?config.pricing, "Configuration loaded");

    match cli.command {
        Commands::Quote(args) => commands::quote::run(args, &config, cli.json),
        Commands::Replay(args) => commands::replay::run(args, &config, cli.json),
        Commands::Submit(args) => commands::submit::run(args, &config, cli.json).await,
        Commands::Orders(args) => commands::orders::run(args, &config, cli.json).await,
        Commands::Catalog(args) => commands::catalog::run(args, &config, cli.json).await,
    }
}

type LogHandle = reload::Handle<EnvFilter, Registry>;

/// Initializes the tracing subscriber for structured logging.
///
/// Runs before the config file is read so load warnings are visible; the
/// file's `logging.filter` is swapped in afterwards through the returned
/// handle.
///
/// ## Filter Precedence
/// - `-v` / `-vv` on the command line
/// - `RUST_LOG`
/// - `logging.filter` from the config file
/// - Default: `info,bounce=debug,sqlx=warn`
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(verbose: u8, rust_log: Option<&str>) -> LogHandle {
    let filter = EnvFilter::try_new(startup_filter(verbose, rust_log))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    handle
}

fn startup_filter(verbose: u8, rust_log: Option<&str>) -> &str {
    match verbose {
        0 => rust_log.unwrap_or(DEFAULT_LOG_FILTER),
        1 => "debug,sqlx=warn",
        _ => "trace",
    }
}

/// The config file's filter, unless `-v` or `RUST_LOG` already decided.
fn configured_filter(config: &AppConfig, verbose: u8, rust_log_set: bool) -> Option<&str> {
    if verbose > 0 || rust_log_set {
        return None;
    }
    config.logging.filter.as_deref()
}

fn apply_configured_filter(handle: &LogHandle, directives: &str) {
    match EnvFilter::try_new(directives) {
        Ok(filter) => {
            if let Err(e) = handle.reload(filter) {
                warn!(error = %e, "Failed to apply logging.filter");
            }
        }
        Err(e) => warn!(filter = directives, error = %e, "Ignoring invalid logging.filter"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["bounce-checkout", "orders", "--date", "2024-06-01", "--json", "-vv"])
            .unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Orders(ref args) if args.date.as_deref() == Some("2024-06-01")));
    }

    #[test]
    fn test_startup_filter_precedence() {
        assert_eq!(startup_filter(0, None), DEFAULT_LOG_FILTER);
        assert_eq!(startup_filter(0, Some("warn")), "warn");
        assert_eq!(startup_filter(1, Some("warn")), "debug,sqlx=warn");
        assert_eq!(startup_filter(3, None), "trace");
    }

    #[test]
    fn test_config_filter_only_without_overrides() {
        let mut config = AppConfig::default();
        config.logging.filter = Some("error".into());

        assert_eq!(configured_filter(&config, 0, false), Some("error"));
        assert_eq!(configured_filter(&config, 0, true), None);
        assert_eq!(configured_filter(&config, 1, false), None);
    }
}
