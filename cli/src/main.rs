//! hostprint CLI - predict host operating systems from handshake captures.
//!
//! ```text
//! hostprint input.jsonl output.json
//!     -> load records -> dedup + features -> train forest -> classify -> write JSON
//! ```
//!
//! stdout carries exactly two lines (`Accuracy: ...` and `Results saved to ...`);
//! logs go to stderr, or to `--log-file`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hostprint_config::{HostprintConfig, Overrides};
use hostprint_core::{RunRequest, run};

#[derive(Debug, Parser)]
#[command(name = "hostprint", version)]
#[command(about = "Train a random forest on handshake features and predict each host's OS")]
struct Cli {
    /// JSON-lines file, one handshake record per line
    input: PathBuf,
    /// Destination for the JSON array of predictions
    output: PathBuf,
    /// Config file (default: ~/.hostprint/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Number of trees in the forest
    #[arg(long, value_name = "N")]
    trees: Option<usize>,
    /// Fraction of rows held out to measure accuracy
    #[arg(long, value_name = "FRACTION")]
    test_size: Option<f64>,
    /// Seed for the split and the forest
    #[arg(long)]
    seed: Option<u64>,
    /// Skip input lines that are not JSON objects
    #[arg(long)]
    skip_malformed: bool,
    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Only log warnings and errors (ignored when RUST_LOG is set)
    #[arg(short, long)]
    quiet: bool,
}

fn init_tracing(log_file: Option<&Path>, quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let Some(path) = log_file else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr))
            .with(env_filter)
            .init();
        return;
    };

    match open_log_file(path) {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .with(env_filter)
                .init();
            tracing::info!(path = %path.display(), "Logging initialized");
        }
        Err(e) => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(env_filter)
                .init();
            tracing::warn!("Failed to open log file {}: {e}", path.display());
        }
    }
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn load_config(explicit: Option<&Path>) -> Result<HostprintConfig> {
    match explicit {
        Some(path) => HostprintConfig::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(HostprintConfig::load()
            .context("failed to load config")?
            .unwrap_or_default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref(), cli.quiet);

    let config = load_config(cli.config.as_deref())?;
    let overrides = Overrides {
        trees: cli.trees,
        test_size: cli.test_size,
        seed: cli.seed,
        skip_malformed: cli.skip_malformed,
    };
    let resolved = config
        .resolve(&overrides)
        .context("invalid configuration")?;

    let request = RunRequest::new(cli.input, cli.output, &resolved);
    let summary = run(&request)
        .with_context(|| format!("failed to classify hosts from {}", request.input.display()))?;

    println!("Accuracy: {:?}", summary.accuracy);
    println!("Results saved to {}", summary.output.display());
    Ok(())
}
