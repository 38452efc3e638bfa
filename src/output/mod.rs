//! Report rendering.
//!
//! Thin wrappers around the scan core's output: a human-readable text report
//! and a machine-readable JSON document.

pub mod json;
pub mod text;

use clap::ValueEnum;

/// Output format selection for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report (default)
    Text,
    /// JSON document for scripting
    Json,
}
