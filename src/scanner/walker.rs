//! Recursive directory walker built on dynamic task fan-out.
//!
//! # Overview
//!
//! Unlike a walker that drains a precomputed work list, the tree is explored
//! by a growing set of independent tasks: each [`walk_dir`] invocation
//! enumerates exactly one directory level with [`std::fs::read_dir`] and
//! spawns a fresh walk task per subdirectory and a hash task per eligible
//! file. `read_dir` never recurses and never yields the directory itself, so
//! descent happens only inside the spawned task and no subtree is visited
//! twice.
//!
//! Every spawn registers with the shared [`TaskTracker`] *before* the task
//! starts; otherwise a waiter could observe zero outstanding work while
//! entries are still being handed off. The registration is cleared by the
//! task itself when its guard drops, on success, failure or panic.
//!
//! Walk and hash tasks draw from the same [`Limiter`] budget: both hold OS
//! handles while blocked in the kernel, so they contend for one pool of
//! slots rather than two.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;

use ignore::gitignore::{Gitignore, GitignoreBuilder};

use super::sync::{Limiter, TaskTracker};
use super::{hasher, ScanConfig, ScanError, ScanMessage};

/// Shared state for all tasks of one scan.
///
/// Each task holds an `Arc` clone; when the last task finishes, the embedded
/// [`Sender`] drops and the collector's channel disconnects.
pub(crate) struct WalkContext {
    root: PathBuf,
    limiter: Limiter,
    tracker: TaskTracker,
    tx: Sender<ScanMessage>,
    shutdown_flag: Option<Arc<AtomicBool>>,
    gitignore: Option<Gitignore>,
}

impl WalkContext {
    pub(crate) fn new(
        root: &Path,
        config: &ScanConfig,
        limiter: Limiter,
        tracker: TaskTracker,
        tx: Sender<ScanMessage>,
    ) -> Self {
        Self {
            root: root.to_path_buf(),
            limiter,
            tracker,
            tx,
            shutdown_flag: config.shutdown_flag.clone(),
            gitignore: build_gitignore(root, &config.ignore_patterns),
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    fn send(&self, message: ScanMessage) {
        // The collector outlives every task, but a send after a panic in the
        // collector must not take the walker down with it.
        if self.tx.send(message).is_err() {
            log::error!("Collector hung up, dropping scan message");
        }
    }

    /// Check a path against the configured ignore patterns.
    fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        let Some(ref gitignore) = self.gitignore else {
            return false;
        };

        // Gitignore matching expects paths relative to the root and forward
        // slashes even on Windows.
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();
        let normalized = if cfg!(windows) {
            path_str.replace('\\', "/")
        } else {
            path_str.into_owned()
        };

        gitignore.matched(normalized, is_dir).is_ignore()
    }
}

/// Build a gitignore matcher from the configured patterns.
fn build_gitignore(root: &Path, patterns: &[String]) -> Option<Gitignore> {
    if patterns.is_empty() {
        return None;
    }

    let mut builder = GitignoreBuilder::new(root);
    for pattern in patterns {
        if let Err(e) = builder.add_line(None, pattern) {
            log::warn!("Invalid ignore pattern '{}': {}", pattern, e);
        }
    }

    match builder.build() {
        Ok(gitignore) if !gitignore.is_empty() => Some(gitignore),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Failed to build ignore patterns: {}", e);
            None
        }
    }
}

/// Enumerate one directory level, spawning a walk task per subdirectory and
/// a hash task per regular non-empty file.
///
/// Must run on a rayon pool thread so that `rayon::spawn` targets the same
/// pool. Enumeration failures are reported to the collector and the rest of
/// the tree continues; nothing here aborts the scan.
pub(crate) fn walk_dir(dir: PathBuf, ctx: Arc<WalkContext>) {
    let _slot = ctx.limiter.acquire();

    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            let err = ScanError::from_io(&dir, e);
            log::warn!("{}", err);
            ctx.send(ScanMessage::Failed(err));
            return;
        }
    };

    log::trace!("Walking {}", dir.display());

    for entry in entries {
        if ctx.is_shutdown_requested() {
            log::debug!("Walker: shutdown requested, not spawning new work");
            break;
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let err = ScanError::from_io(&dir, e);
                log::warn!("{}", err);
                ctx.send(ScanMessage::Failed(err));
                continue;
            }
        };
        let path = entry.path();

        // DirEntry::file_type does not follow symlinks, so a symlinked
        // directory shows up as a symlink here and is skipped below.
        let file_type = match entry.file_type() {
            Ok(ft) => ft,
            Err(e) => {
                let err = ScanError::from_io(&path, e);
                log::warn!("{}", err);
                ctx.send(ScanMessage::Failed(err));
                continue;
            }
        };

        if file_type.is_dir() {
            if ctx.should_ignore(&path, true) {
                log::trace!("Ignoring directory: {}", path.display());
                continue;
            }
            spawn_walk(path, &ctx);
        } else if file_type.is_file() {
            if ctx.should_ignore(&path, false) {
                log::trace!("Ignoring file: {}", path.display());
                continue;
            }

            let size = match entry.metadata() {
                Ok(metadata) => metadata.len(),
                Err(e) => {
                    let err = ScanError::from_io(&path, e);
                    log::warn!("{}", err);
                    ctx.send(ScanMessage::Failed(err));
                    continue;
                }
            };
            if size == 0 {
                log::debug!("Skipping empty file: {}", path.display());
                continue;
            }
            spawn_hash(path, &ctx);
        } else {
            // Symlinks, devices, sockets and the like contribute nothing.
            log::trace!("Skipping non-regular entry: {}", path.display());
        }
    }
}

/// Spawn an independent walk task for a subdirectory.
fn spawn_walk(path: PathBuf, ctx: &Arc<WalkContext>) {
    let guard = ctx.tracker.register();
    let ctx = Arc::clone(ctx);
    rayon::spawn(move || {
        let _task = guard;
        walk_dir(path, ctx);
    });
}

/// Spawn an independent hash task for a file.
fn spawn_hash(path: PathBuf, ctx: &Arc<WalkContext>) {
    let guard = ctx.tracker.register();
    let ctx = Arc::clone(ctx);
    rayon::spawn(move || {
        let _task = guard;
        hash_one(&path, &ctx);
    });
}

/// Body of a hash task: acquire a budget slot, digest the file, report the
/// pair or the failure.
fn hash_one(path: &Path, ctx: &WalkContext) {
    if ctx.is_shutdown_requested() {
        log::debug!("Hasher: shutdown requested, skipping {}", path.display());
        return;
    }

    let _slot = ctx.limiter.acquire();
    match hasher::hash_file(path) {
        Ok(pair) => ctx.send(ScanMessage::Hashed(pair)),
        Err(e) => {
            log::warn!("Failed to hash {}: {}", path.display(), e);
            ctx.send(ScanMessage::Failed(e.into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn context_with_patterns(root: &Path, patterns: &[&str]) -> WalkContext {
        let config = ScanConfig::default()
            .with_ignore_patterns(patterns.iter().map(|s| (*s).to_string()).collect());
        let (tx, _rx) = mpsc::channel();
        WalkContext::new(root, &config, Limiter::new(1), TaskTracker::new(), tx)
    }

    #[test]
    fn test_should_ignore_matches_patterns() {
        let root = Path::new("/scan");
        let ctx = context_with_patterns(root, &["*.tmp", "target/"]);

        assert!(ctx.should_ignore(Path::new("/scan/a/b.tmp"), false));
        assert!(ctx.should_ignore(Path::new("/scan/target"), true));
        assert!(!ctx.should_ignore(Path::new("/scan/a/b.txt"), false));
    }

    #[test]
    fn test_no_patterns_ignores_nothing() {
        let root = Path::new("/scan");
        let ctx = context_with_patterns(root, &[]);

        assert!(ctx.gitignore.is_none());
        assert!(!ctx.should_ignore(Path::new("/scan/anything"), false));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        // An unparsable pattern must not disable the remaining ones.
        let root = Path::new("/scan");
        let ctx = context_with_patterns(root, &["a/**b**/c/**", "*.log"]);

        assert!(ctx.should_ignore(Path::new("/scan/x.log"), false));
    }
}
