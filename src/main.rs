//! Binary entry point for voxpop.
//!
//! This binary wires the configuration, logging, and `SQLite` store together
//! and hands control to the interactive shell.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow option_if_let_else for environment variable fallback chains
#![allow(clippy::option_if_let_else)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use voxpop::config::VoxpopConfig;
use voxpop::observability::{self, LogFormat};
use voxpop::shell::Shell;
use voxpop::{FeedbackLedger, SqliteStore};

/// Voxpop - an interactive customer feedback aggregator.
#[derive(Parser)]
#[command(name = "voxpop")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Path to the `SQLite` database file.
    #[arg(short, long)]
    db: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,

    /// Log output format: text or json.
    #[arg(long)]
    log_format: Option<String>,
}

/// Main entry point.
fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => apply_overrides(config, &cli),
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        },
    }
}

/// Opens the store, loads the ledger, and runs the interactive session.
fn run(config: &VoxpopConfig) -> voxpop::Result<()> {
    config.ensure_data_dir()?;

    let store = SqliteStore::open(&config.db_path)?;
    let mut ledger = FeedbackLedger::open(store)?;
    info!(
        records = ledger.len(),
        db_path = %config.db_path.display(),
        "feedback ledger ready"
    );

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut shell = Shell::new(stdin.lock(), stdout.lock());
    shell.run(&mut ledger)
}

/// Loads configuration.
fn load_config(path: Option<&str>) -> voxpop::Result<VoxpopConfig> {
    // If a path is provided, load from that file
    if let Some(config_path) = path {
        return VoxpopConfig::load_from_file(Path::new(config_path));
    }

    // Environment override for config path
    if let Ok(config_path) = std::env::var("VOXPOP_CONFIG_PATH") {
        if !config_path.trim().is_empty() {
            return VoxpopConfig::load_from_file(Path::new(&config_path));
        }
    }

    // Otherwise, load from default location
    Ok(VoxpopConfig::load_default())
}

/// Applies command line and environment overrides to the loaded configuration.
fn apply_overrides(mut config: VoxpopConfig, cli: &Cli) -> VoxpopConfig {
    if let Some(db_path) = resolve_db_override(cli) {
        config = config.with_db_path(db_path);
    }
    if let Some(ref format) = cli.log_format {
        config.logging.format = LogFormat::parse(format);
    }
    if cli.verbose {
        config.logging.verbose = true;
    }
    config
}

/// Resolves the database path override from the command line or environment.
fn resolve_db_override(cli: &Cli) -> Option<PathBuf> {
    if let Some(ref db_path) = cli.db {
        return Some(db_path.clone());
    }

    match std::env::var("VOXPOP_DB_PATH") {
        Ok(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
        _ => None,
    }
}
