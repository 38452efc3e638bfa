//! Command-line interface definitions.
//!
//! All CLI arguments are defined with the clap derive API.
//!
//! # Example
//!
//! ```bash
//! # Scan a directory and print the groups
//! dupewalk ~/Downloads
//!
//! # Bound the concurrency budget and ignore build artifacts
//! dupewalk -j 4 --ignore 'target/' --ignore '*.tmp' ~/src
//!
//! # JSON output for scripting
//! dupewalk --output json ~/Downloads
//! ```

use clap::Parser;
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Concurrent duplicate file finder.
///
/// dupewalk walks a directory tree with dynamically spawned parallel tasks,
/// hashes every regular non-empty file with BLAKE3 and groups paths whose
/// content is identical.
#[derive(Debug, Parser)]
#[command(name = "dupewalk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to scan for duplicate files
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Concurrency budget: maximum traversal/hash operations at once
    /// (default: twice the available hardware parallelism)
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Glob patterns to ignore (gitignore-style, can be repeated)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    pub ignore_patterns: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Increase verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all diagnostics except errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long)]
    pub json_errors: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_requires_path() {
        assert!(Cli::try_parse_from(["dupewalk"]).is_err());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["dupewalk", "/tmp"]).unwrap();

        assert_eq!(cli.path, PathBuf::from("/tmp"));
        assert!(cli.jobs.is_none());
        assert!(cli.ignore_patterns.is_empty());
        assert_eq!(cli.output, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
        assert!(!cli.json_errors);
    }

    #[test]
    fn test_cli_full_invocation() {
        let cli = Cli::try_parse_from([
            "dupewalk",
            "-j",
            "4",
            "--ignore",
            "*.tmp",
            "--ignore",
            "target/",
            "--output",
            "json",
            "-vv",
            "/data",
        ])
        .unwrap();

        assert_eq!(cli.jobs, Some(4));
        assert_eq!(cli.ignore_patterns, vec!["*.tmp", "target/"]);
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["dupewalk", "-q", "-v", "/tmp"]).is_err());
    }
}
