//! Filesystem discovery entry points.
//!
//! # Responsibility
//! - Find project roots under user-selected base directories.
//! - Read README and build-manifest files from project directories.
//!
//! # Invariants
//! - Scans are synchronous and never write to the filesystem.

pub mod fs_scan;
