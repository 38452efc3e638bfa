//! dupewalk - Concurrent Duplicate File Finder
//!
//! Discovers sets of files with identical content under a directory tree.
//! The tree is explored by a dynamically growing set of parallel tasks, one
//! per subdirectory and per file, bounded by a global concurrency budget and
//! joined through an outstanding-work tracker; results funnel into a single
//! collector that owns the final grouping.

use std::io;

use anyhow::Result;

pub mod cli;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod signal;

use cli::Cli;
use error::ExitCode;
use output::OutputFormat;
use scanner::ScanConfig;

/// Run the application: scan, render the report, pick the exit code.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    let handler = signal::install_handler()?;

    let mut config = ScanConfig::default()
        .with_ignore_patterns(cli.ignore_patterns)
        .with_shutdown_flag(handler.flag());
    if let Some(jobs) = cli.jobs {
        config = config.with_concurrency(jobs);
    }

    let report = duplicates::scan(&cli.path, &config)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match cli.output {
        OutputFormat::Text => output::text::write_report(&mut out, &report)?,
        OutputFormat::Json => output::json::write_report(&mut out, &report)?,
    }

    for err in &report.errors {
        log::warn!("Skipped: {}", err);
    }

    if handler.is_shutdown_requested() {
        Ok(ExitCode::Interrupted)
    } else if report.is_partial() {
        Ok(ExitCode::PartialSuccess)
    } else {
        Ok(ExitCode::Success)
    }
}
