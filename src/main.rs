//! apilog - colorized request logs
//!
//! CLI entry point: reads request reports as JSON Lines and prints one
//! formatted log entry per report.

// Allow multiple crate versions from dependencies (can't easily control)
#![allow(clippy::multiple_crate_versions)]

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use apilog::config::{ColorMode, FormatterConfig};
use apilog::emit::{TracingReporter, WriterSink};
use apilog::lifecycle::{ConsoleHook, Dispatcher};

/// Colorized terminal request logs
///
/// Each input line is one JSON request report, as emitted by the host
/// framework after a response completes.
#[derive(Parser, Debug)]
#[command(name = "apilog", version, about)]
struct Cli {
    /// File of JSON Lines reports (`-` for stdin)
    #[arg(long, default_value = "-")]
    input: PathBuf,

    /// Path to the apilog.toml configuration file
    #[arg(long, default_value = "apilog.toml")]
    config: PathBuf,

    /// Override the configured color mode
    #[arg(long, value_enum)]
    color: Option<ColorMode>,

    /// Log level for apilog's own diagnostics (RUST_LOG takes precedence)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_tracing(log_level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Open the report source, treating `-` as stdin.
fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = FormatterConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from '{}'", cli.config.display()))?;
    cli.color.unwrap_or(config.color).apply();
    tracing::debug!(config = ?config, "configuration loaded");

    let input = open_input(&cli.input)?;
    let hook = ConsoleHook::new(&config, WriterSink::stdout(), TracingReporter);
    let mut dispatcher = Dispatcher::new(config, hook, TracingReporter);

    for (line_num, line) in input.lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read input line {}", line_num + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        dispatcher.on_response_json(&line);
    }

    Ok(())
}
