//! Command-line interface components.

use crate::config::{LoaderConfig, load_env_file};
use crate::models::RunOutcome;
use crate::pipeline;
use crate::report::Reporter;
use crate::store::{MemoryStore, PgShelterStore};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, info};

#[derive(Parser, Debug, Clone)]
#[command(name = "shelter-loader")]
#[command(about = "Load evacuation-shelter CSV data into a PostgreSQL table")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// CSV file to load (defaults to 172014_evacuation_space.csv)
    #[arg(value_name = "CSV_PATH")]
    pub csv_path: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Dotenv file with DB_HOST, DB_PORT, DB_USER, DB_PASSWORD and DB_NAME
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,

    /// Destination table
    #[arg(short, long)]
    pub table: Option<String>,

    /// Per-insert timeout in seconds (0 waits indefinitely)
    #[arg(long, value_name = "SECS")]
    pub insert_timeout: Option<u64>,

    /// Validate and number rows without connecting to the database
    #[arg(long)]
    pub dry_run: bool,

    /// Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print the final summary
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }

    /// Apply command-line overrides on top of the layered configuration
    pub fn apply_overrides(&self, mut config: LoaderConfig) -> LoaderConfig {
        if let Some(path) = &self.csv_path {
            config = config.with_input_path(path);
        }
        if let Some(table) = &self.table {
            config = config.with_table(table);
        }
        if let Some(secs) = self.insert_timeout {
            config = config.with_insert_timeout_secs(secs);
        }
        if self.dry_run {
            config = config.with_dry_run();
        }
        config
    }
}

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("shelter_loader={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
}

/// Resolve configuration, connect, and load the CSV document
pub async fn run(args: Args) -> Result<RunOutcome> {
    debug!("Command line arguments: {:?}", args);

    if let Some(path) = load_env_file(args.env_file.as_deref())? {
        info!("Loaded environment from {}", path.display());
    }

    let config = args.apply_overrides(
        LoaderConfig::load(args.config.as_deref()).context("Failed to load configuration")?,
    );
    config.validate().context("Invalid configuration")?;

    let mut reporter = Reporter::new(args.quiet);

    let outcome = if config.dry_run {
        info!("Dry run: rows are validated and numbered but not written");
        let (store, outcome) = pipeline::run(&config, MemoryStore::new(), &mut reporter).await?;
        info!("Dry run numbered {} rows; nothing was written", store.rows().len());
        outcome
    } else {
        let store = PgShelterStore::connect(
            &config.database,
            &config.table,
            config.insert_timeout_secs,
        )
        .await
        .context("Failed to connect to the database")?;
        reporter.note("Connected to the database");

        let (store, outcome) = pipeline::run(&config, store, &mut reporter).await?;
        store.close().await;
        outcome
    };

    Ok(outcome)
}
