//! Digest-keyed grouping of file paths.
//!
//! # Overview
//!
//! [`DigestGroups`] is the result mapping of a scan: every file whose content
//! hashed to the same digest lands in the same group. The mapping has exactly
//! one writer, the collector thread, so it needs no locking; after the
//! collector finalizes it is handed to the caller and never mutated again.
//!
//! Within a group, paths are kept in the order their pairs were received,
//! which depends on task scheduling and may differ between runs. The *set*
//! of groups is stable for a given tree.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::scanner::{Digest, HashPair};

/// Files sharing one content digest.
///
/// All members have identical content and therefore identical size.
#[derive(Debug, Clone, Default)]
pub struct DigestGroup {
    /// Size of each member in bytes
    pub size: u64,
    /// Member paths, in the order their pairs arrived
    pub paths: Vec<PathBuf>,
}

impl DigestGroup {
    /// Whether this group holds more than one path.
    #[must_use]
    pub fn is_duplicate(&self) -> bool {
        self.paths.len() >= 2
    }

    /// Bytes that would be freed by keeping a single member.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        (self.paths.len() as u64).saturating_sub(1) * self.size
    }
}

/// Mapping from content digest to the group of paths sharing it.
#[derive(Debug, Clone, Default)]
pub struct DigestGroups {
    groups: HashMap<Digest, DigestGroup>,
}

impl DigestGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair's path to the group keyed by its digest, creating the
    /// group on first sight.
    pub fn insert(&mut self, pair: HashPair) {
        let group = self.groups.entry(pair.digest).or_default();
        group.size = pair.size;
        group.paths.push(pair.path);
    }

    /// Number of distinct digests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of paths across all groups.
    #[must_use]
    pub fn total_files(&self) -> usize {
        self.groups.values().map(|g| g.paths.len()).sum()
    }

    /// Iterate over all groups.
    pub fn iter(&self) -> impl Iterator<Item = (&Digest, &DigestGroup)> {
        self.groups.iter()
    }

    /// Iterate over groups with two or more members.
    pub fn duplicates(&self) -> impl Iterator<Item = (&Digest, &DigestGroup)> {
        self.groups.iter().filter(|(_, g)| g.is_duplicate())
    }

    /// Number of groups with two or more members.
    #[must_use]
    pub fn duplicate_group_count(&self) -> usize {
        self.duplicates().count()
    }

    /// Bytes that would be freed by keeping one member per duplicate group.
    #[must_use]
    pub fn wasted_bytes(&self) -> u64 {
        self.duplicates().map(|(_, g)| g.wasted_bytes()).sum()
    }

    /// Look up the group for a digest.
    #[must_use]
    pub fn get(&self, digest: &Digest) -> Option<&DigestGroup> {
        self.groups.get(digest)
    }
}

/// Counters accumulated over one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Files hashed successfully
    pub files_hashed: usize,
    /// Total bytes streamed through the hasher
    pub bytes_hashed: u64,
    /// Paths that failed to traverse or hash
    pub failed_paths: usize,
    /// Wall-clock duration of the whole scan
    pub elapsed: Duration,
}
