//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Sequential collection of hash pairs into digest groups
//! - Scan orchestration (task fan-out, completion join, finalization)
//! - Duplicate group queries and wasted-space accounting

pub mod collector;
pub mod groups;

pub use collector::{scan, ScanReport};
pub use groups::{DigestGroup, DigestGroups, ScanStats};
