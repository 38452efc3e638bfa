//! Human-readable scan report.
//!
//! One block per digest group: a line with the digest's last 7 hex
//! characters and the member count, then one indented line per path. A
//! summary and the elapsed wall-clock time follow.

use std::io::{self, Write};

use bytesize::ByteSize;

use crate::duplicates::ScanReport;
use crate::scanner::digest_to_hex;

/// Number of digest characters shown per group, like git's short hashes.
const SHORT_DIGEST_LEN: usize = 7;

/// Write the report for every group with at least one path.
pub fn write_report<W: Write>(out: &mut W, report: &ScanReport) -> io::Result<()> {
    for (digest, group) in report.groups.iter() {
        let hex = digest_to_hex(digest);
        writeln!(out, "{} {}", &hex[hex.len() - SHORT_DIGEST_LEN..], group.paths.len())?;
        for path in &group.paths {
            writeln!(out, "    {}", path.display())?;
        }
    }

    let stats = &report.stats;
    writeln!(
        out,
        "{} files hashed ({}), {} groups, {} duplicate groups, {} wasted",
        stats.files_hashed,
        ByteSize(stats.bytes_hashed),
        report.groups.len(),
        report.groups.duplicate_group_count(),
        ByteSize(report.groups.wasted_bytes()),
    )?;
    if stats.failed_paths > 0 {
        writeln!(out, "{} paths skipped due to errors", stats.failed_paths)?;
    }
    writeln!(out, "elapsed: {:.2?}", stats.elapsed)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::HashPair;
    use std::path::PathBuf;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::default();
        for path in ["/a/f1.txt", "/a/f2.txt"] {
            report.groups.insert(HashPair {
                digest: [0xAB; 32],
                path: PathBuf::from(path),
                size: 5,
            });
        }
        report.stats.files_hashed = 2;
        report.stats.bytes_hashed = 10;
        report
    }

    #[test]
    fn test_report_block_format() {
        let report = sample_report();
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        let hex = digest_to_hex(&[0xAB; 32]);
        let short = &hex[hex.len() - SHORT_DIGEST_LEN..];
        assert!(text.contains(&format!("{short} 2")));
        assert!(text.contains("    /a/f1.txt"));
        assert!(text.contains("    /a/f2.txt"));
        assert!(text.contains("elapsed:"));
    }

    #[test]
    fn test_empty_report_still_prints_summary() {
        let report = ScanReport::default();
        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("0 files hashed"));
        assert!(text.contains("elapsed:"));
        assert!(!text.contains("skipped"));
    }
}
