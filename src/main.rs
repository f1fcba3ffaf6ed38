//! hive-complete command-line tool
//!
//! Runs one completion request against an XML file and prints the
//! candidates, or manages the tool's configuration.
//!
//! # Usage
//!
//! ```bash
//! # Completions at line 12, column 20
//! hive-complete complete scenario.xml --line 12 --column 20
//!
//! # Point the tool at HiveAPIQuery
//! hive-complete config --set-query-binary /opt/hive/bin/HiveAPIQuery
//! ```

use clap::CommandFactory;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use hive_complete::cli::{CliArgs, CliInterface};
use hive_complete::error::Result;

/// Application entry point
fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Main application logic
///
/// 1. Parse command-line arguments
/// 2. Load configuration
/// 3. Initialize logging
/// 4. Handle the subcommand
fn run() -> Result<()> {
    let cli = CliInterface::new()?;

    initialize_logging(&cli);

    if !cli.handle_command()? {
        CliArgs::command().print_help()?;
    }
    Ok(())
}

/// Initialize logging to stderr
///
/// The configured level (already adjusted for `-v`, `--vv` and `-q`) is the
/// default; `RUST_LOG` refines it.
fn initialize_logging(cli: &CliInterface) {
    let level = cli.config().logging.level.to_tracing_level();
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    if cli.config().logging.timestamps {
        subscriber.init();
    } else {
        subscriber.without_time().init();
    }
}
