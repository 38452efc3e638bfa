//! JSON scan report for scripting.

use std::io::{self, Write};

use serde::Serialize;

use crate::duplicates::ScanReport;
use crate::scanner::digest_to_hex;

/// Serializable view of one digest group.
#[derive(Debug, Serialize)]
struct JsonGroup {
    digest: String,
    size: u64,
    paths: Vec<String>,
}

/// Serializable view of the scan counters.
#[derive(Debug, Serialize)]
struct JsonStats {
    files_hashed: usize,
    bytes_hashed: u64,
    failed_paths: usize,
    elapsed_ms: u128,
}

/// Top-level JSON document.
#[derive(Debug, Serialize)]
struct JsonReport {
    groups: Vec<JsonGroup>,
    errors: Vec<String>,
    stats: JsonStats,
}

impl JsonReport {
    fn from_report(report: &ScanReport) -> Self {
        let mut groups: Vec<JsonGroup> = report
            .groups
            .iter()
            .map(|(digest, group)| JsonGroup {
                digest: digest_to_hex(digest),
                size: group.size,
                paths: group
                    .paths
                    .iter()
                    .map(|p| p.to_string_lossy().into_owned())
                    .collect(),
            })
            .collect();
        // HashMap iteration order is arbitrary; sort for a stable document
        groups.sort_by(|a, b| a.digest.cmp(&b.digest));

        Self {
            groups,
            errors: report.errors.iter().map(ToString::to_string).collect(),
            stats: JsonStats {
                files_hashed: report.stats.files_hashed,
                bytes_hashed: report.stats.bytes_hashed,
                failed_paths: report.stats.failed_paths,
                elapsed_ms: report.stats.elapsed.as_millis(),
            },
        }
    }
}

/// Write the report as pretty-printed JSON.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    let json = JsonReport::from_report(report);
    serde_json::to_writer_pretty(&mut *out, &json)?;
    writeln!(out)
}
