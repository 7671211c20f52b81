//! Demographic Analyzer - census dataset statistics
//!
//! A CLI tool that loads a census-style dataset and reports a fixed set
//! of descriptive statistics: race counts, the mean age of men, education
//! and income shares, minimum work hours and income by country.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Error (configuration, unreadable or malformed dataset, empty group)

mod analysis;
mod cli;
mod config;
mod error;
mod loader;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Args;
use config::{Config, CONFIG_FILE};
use models::ReportMetadata;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Demographic Analyzer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_analysis(args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .demographic.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize the dataset path, delimiter and report format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so stdout carries only the report.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dataset, compute the statistics and print the report.
fn run_analysis(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;
    debug!("Effective config: {:?}", config);

    let loader = loader::DatasetLoader::new(
        config.dataset.path.clone(),
        loader::LoadOptions::from(&config.dataset),
    );
    let dataset = loader
        .load()
        .with_context(|| format!("Failed to load dataset {}", loader.path().display()))?;
    if dataset.is_empty() {
        warn!("Dataset {} has no records", loader.path().display());
    }

    let demographics = analysis::calculate_demographic_data(&dataset, false)
        .context("Failed to compute demographic statistics")?;
    debug_assert_eq!(demographics.race_count.total(), dataset.len());

    let metadata = ReportMetadata {
        source: loader.path().display().to_string(),
        analysis_date: Utc::now(),
        records: dataset.len(),
        duration_seconds: start_time.elapsed().as_secs_f64(),
    };

    if config.report.print_data {
        let output = report::render_report(config.report.format, &demographics, &metadata)?;
        println!("{}", output.trim_end());
    }

    info!(
        "Analyzed {} records in {:.3}s",
        metadata.records, metadata.duration_seconds
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
