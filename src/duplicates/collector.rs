//! Result collection and scan orchestration.
//!
//! # Overview
//!
//! All walk and hash tasks funnel their results into a single collector
//! thread, the only writer of the [`DigestGroups`] mapping and the error
//! list. Routing every mutation through one exclusive owner turns a
//! concurrent write problem into a sequential one; the mapping itself needs
//! no lock.
//!
//! [`scan`] wires the pipeline together. The ordering is load-bearing:
//!
//! 1. start the collector;
//! 2. register the root walk with the tracker, then spawn it;
//! 3. drop the orchestrator's own sender and wait for the tracker to hit
//!    zero — every task has finished and no further pairs can be produced;
//! 4. the last task drops the last sender, the channel disconnects, and the
//!    collector finalizes;
//! 5. join the collector and return its report.
//!
//! Disconnecting earlier would finalize with missing pairs; never
//! disconnecting would hang the collector forever.

use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use crate::scanner::sync::{Limiter, TaskTracker};
use crate::scanner::walker::{walk_dir, WalkContext};
use crate::scanner::{ScanConfig, ScanError, ScanMessage};

use super::groups::{DigestGroups, ScanStats};

/// Finalized result of one scan: the grouping, the per-path failures and the
/// accumulated counters.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Digest-keyed grouping of every successfully hashed file
    pub groups: DigestGroups,
    /// Paths that could not be traversed or hashed; the rest of the tree
    /// was still scanned
    pub errors: Vec<ScanError>,
    /// Scan counters
    pub stats: ScanStats,
}

impl ScanReport {
    /// Whether any per-path failures were recorded.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Receive messages until every sender is gone, building the grouping.
///
/// Runs on its own thread; sole writer of the report it returns.
fn collect(rx: Receiver<ScanMessage>) -> ScanReport {
    let mut report = ScanReport::default();

    while let Ok(message) = rx.recv() {
        match message {
            ScanMessage::Hashed(pair) => {
                report.stats.files_hashed += 1;
                report.stats.bytes_hashed += pair.size;
                report.groups.insert(pair);
            }
            ScanMessage::Failed(err) => {
                report.stats.failed_paths += 1;
                report.errors.push(err);
            }
        }
    }

    log::debug!(
        "Collector finalized: {} files in {} groups, {} failures",
        report.stats.files_hashed,
        report.groups.len(),
        report.stats.failed_paths
    );
    report
}

/// Scan a directory tree for files with identical content.
///
/// Spawns a dynamically growing set of walk and hash tasks over a rayon
/// pool, bounded by the configured concurrency budget, and joins them
/// through the task tracker. Per-path failures are collected in the report;
/// only a root that cannot be scanned at all is a hard error.
///
/// # Example
///
/// ```no_run
/// use dupewalk::duplicates::scan;
/// use dupewalk::scanner::ScanConfig;
/// use std::path::Path;
///
/// let report = scan(Path::new("/home/user/Downloads"), &ScanConfig::default())?;
/// for (_, group) in report.groups.duplicates() {
///     println!("{} copies of {} bytes", group.paths.len(), group.size);
/// }
/// # Ok::<(), dupewalk::scanner::ScanError>(())
/// ```
pub fn scan(root: &Path, config: &ScanConfig) -> Result<ScanReport, ScanError> {
    let started = Instant::now();

    let metadata = std::fs::metadata(root).map_err(|e| ScanError::from_io(root, e))?;
    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }

    let budget = config.concurrency.max(1);
    log::info!(
        "Scanning {} with a concurrency budget of {}",
        root.display(),
        budget
    );

    // Pool threads and limiter slots share the budget: the pool bounds how
    // many tasks execute, the limiter bounds how many of those sit in a
    // blocking filesystem call. Unlimited tasks may be logically pending in
    // the pool's queue.
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(budget)
        .thread_name(|i| format!("dupewalk-{i}"))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("Failed to build scan thread pool ({e}), using global pool size");
            rayon::ThreadPoolBuilder::new().build().unwrap()
        });

    let limiter = Limiter::new(budget);
    let tracker = TaskTracker::new();
    let (tx, rx) = mpsc::channel();

    let collector = thread::Builder::new()
        .name("dupewalk-collector".into())
        .spawn(move || collect(rx))
        .map_err(|e| ScanError::Io {
            path: root.to_path_buf(),
            source: e,
        })?;

    let ctx = Arc::new(WalkContext::new(
        root,
        config,
        limiter,
        tracker.clone(),
        tx,
    ));

    // The root walk counts as one unit of work, registered before the task
    // starts so wait_until_zero cannot return prematurely.
    let root_guard = tracker.register();
    let root_path = root.to_path_buf();
    pool.spawn(move || {
        let _task = root_guard;
        walk_dir(root_path, ctx);
    });

    tracker.wait_until_zero();
    // Zero outstanding tasks: the last context clone (and with it the last
    // sender) is gone or about to go, which disconnects the channel and lets
    // the collector finalize.

    let mut report = match collector.join() {
        Ok(report) => report,
        Err(_) => {
            log::error!("Collector thread panicked, returning empty report");
            ScanReport::default()
        }
    };
    report.stats.elapsed = started.elapsed();

    log::info!(
        "Scan finished in {:.2?}: {} files, {} groups, {} duplicate groups, {} failures",
        report.stats.elapsed,
        report.stats.files_hashed,
        report.groups.len(),
        report.groups.duplicate_group_count(),
        report.stats.failed_paths
    );

    Ok(report)
}
