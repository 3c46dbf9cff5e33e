//! External editor integration.
//!
//! # Responsibility
//! - Spawn the configured editor against a project directory.
//! - Record last-opened timestamps through the catalog service.
//!
//! # Invariants
//! - Spawned editor processes are never awaited.

pub mod editor;
