//! Scanner module for concurrent directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking via dynamic task fan-out
//! - Content hashing with BLAKE3
//! - A shared concurrency budget across traversal and hashing
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: single-level directory enumeration that spawns an
//!   independent task per subdirectory and per eligible file
//! - [`hasher`]: streaming BLAKE3 file hashing
//! - [`sync`]: the [`Limiter`](sync::Limiter) semaphore and
//!   [`TaskTracker`](sync::TaskTracker) wait group the tasks share
//!
//! The number of tasks is determined by the tree shape, not known up front.
//! Every spawn registers with the tracker before the task starts; the
//! limiter caps how many blocking filesystem operations execute at once.

pub mod hasher;
pub mod sync;
pub mod walker;

use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::thread;

// Re-export main types
pub use hasher::{digest_to_hex, hash_file, Digest};

/// A successfully hashed file: the digest of its full content, its path and
/// its size in bytes.
///
/// Produced once per eligible file and consumed exactly once by the
/// collector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashPair {
    /// Content digest (BLAKE3, 32 bytes)
    pub digest: Digest,
    /// Path of the hashed file
    pub path: PathBuf,
    /// File size in bytes (equal to the number of bytes hashed)
    pub size: u64,
}

/// Message type flowing from the walk/hash tasks to the collector.
///
/// Failures travel the same channel as results, so one bad path never aborts
/// an otherwise-healthy scan.
#[derive(Debug)]
pub enum ScanMessage {
    /// A file was hashed successfully.
    Hashed(HashPair),
    /// A path could not be traversed or hashed.
    Failed(ScanError),
}

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Concurrency budget: how many traversal/hash operations may block at
    /// once. Also sizes the worker thread pool.
    pub concurrency: usize,

    /// Glob patterns to ignore (gitignore-style). Matching files are not
    /// hashed; matching directories are not descended into.
    pub ignore_patterns: Vec<String>,

    /// Optional shutdown flag. Once set, no new work is spawned and
    /// in-flight tasks drain.
    pub shutdown_flag: Option<Arc<AtomicBool>>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            ignore_patterns: Vec::new(),
            shutdown_flag: None,
        }
    }
}

impl ScanConfig {
    /// Set the concurrency budget. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set gitignore-style ignore patterns.
    #[must_use]
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set the shutdown flag for graceful cancellation.
    #[must_use]
    pub fn with_shutdown_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.shutdown_flag = Some(flag);
        self
    }
}

/// Default concurrency budget: twice the available hardware parallelism.
///
/// Both directory listings and file reads spend most of their time blocked
/// in the kernel, so oversubscribing the cores keeps the disk busy.
#[must_use]
pub fn default_concurrency() -> usize {
    thread::available_parallelism().map_or(8, |n| n.get() * 2)
}

/// Errors that can occur during directory traversal.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The specified path was not found.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The specified path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while accessing a path.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error for a path.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Path the error relates to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::NotADirectory(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}

/// Errors that can occur while hashing a file.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (it may have vanished mid-scan).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error for a file being hashed.
    pub(crate) fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

impl From<HashError> for ScanError {
    fn from(err: HashError) -> Self {
        match err {
            HashError::NotFound(p) => Self::NotFound(p),
            HashError::PermissionDenied(p) => Self::PermissionDenied(p),
            HashError::Io { path, source } => Self::Io { path, source },
        }
    }
}
