//! dbcheck
//!
//! Checks zone data stored in a directory for loading errors and dangling
//! CNAME references across all managed zones.
//!
//! # Usage
//! ```bash
//! dbcheck --config-file config.yml
//!
//! # Debug logging, JSON formatted
//! dbcheck --config-file config.yml --verbose --json
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{error, info};

use dbcheck::telemetry::{self, LogFormat};
use dbcheck::{check, Config, RecordDatabase};

#[derive(Parser, Debug)]
#[command(name = "dbcheck")]
#[command(about = "Check zone data for dangling CNAME references", long_about = None)]
#[command(version)]
struct Cli {
    /// DNS tools configuration file
    #[arg(long, default_value = "config.yml", env = "DBCHECK_CONFIG_FILE")]
    config_file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let format = if cli.json { LogFormat::Json } else { LogFormat::Text };
    telemetry::init(cli.verbose, format).map_err(|e| anyhow!("init logging: {}", e))?;

    let config = Config::from_file(&cli.config_file).context("get configuration")?;

    info!(
        config_file = %cli.config_file.display(),
        zone_data_directory = %config.zone_data_directory.display(),
        managed_zones = config.managed_zones.len(),
        zone_match = %config.zone_match,
        "Checking zone data"
    );

    let db = RecordDatabase::from_directory(&config.zone_data_directory)
        .context("load zone data")?;

    let report = check::run(&config, &db);

    if report.is_ok() {
        info!(
            records = report.records_indexed,
            collisions = report.collisions,
            "Looks good!"
        );
        Ok(ExitCode::SUCCESS)
    } else {
        error!(
            zone_failures = report.zone_failures.len(),
            invalid_cnames = report.cnames.as_ref().err().map_or(0, |e| e.violations().len()),
            "Errors found!"
        );
        Ok(ExitCode::FAILURE)
    }
}
