//! Catalog domain model.
//!
//! # Responsibility
//! - Define the project record shared by storage, services and front ends.
//!
//! # Invariants
//! - Every persisted project is identified by a storage-assigned `ProjectId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod project;
