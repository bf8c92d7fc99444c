//! CLI entry point for the archive downloader.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use papertrail_archives_core::{ArchiveSync, SyncConfig};
use tracing::{debug, error};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    // Single-dash long flags (`-token`) are accepted alongside `--token`.
    let args = Args::parse_from(cli::normalize_single_dash_flags(std::env::args_os()));

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info).
    // Quiet keeps warnings so skipped and failed archives stay visible.
    let default_level = if args.quiet {
        "warn"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(args.into_config()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("** ERROR: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SyncConfig) -> Result<()> {
    let sync = ArchiveSync::new(config)?;
    let stats = sync.run().await?;
    debug!(
        downloaded = stats.downloaded(),
        failed = stats.failed(),
        existing = stats.existing(),
        skipped = stats.skipped(),
        "sync finished"
    );
    Ok(())
}
