//! Project domain model.
//!
//! # Responsibility
//! - Define the catalog record persisted for every registered directory.
//! - Own the comma-joined tag encoding used by storage.
//!
//! # Invariants
//! - `id` is assigned by storage on insert and never changes afterwards.
//! - `path` is absolute and unique across the catalog.
//! - Tags must not contain `,`; such tags do not survive a storage round-trip.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

/// Storage-assigned row identifier. `0` marks a record that was never saved.
pub type ProjectId = i64;

const TAG_SEPARATOR: char = ',';

/// Validation errors for project write paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectValidationError {
    EmptyName,
    EmptyPath,
    RelativePath(String),
}

impl Display for ProjectValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "project name cannot be empty"),
            Self::EmptyPath => write!(f, "project path cannot be empty"),
            Self::RelativePath(path) => {
                write!(f, "project path must be absolute, got `{path}`")
            }
        }
    }
}

impl Error for ProjectValidationError {}

/// One registered source-code directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// Display name shown in listings.
    pub name: String,
    /// Absolute directory path, unique across the catalog.
    pub path: String,
    /// Free text; empty when not provided.
    pub description: String,
    /// Associated README file. Empty means no README is loaded.
    pub readme_path: String,
    /// Unix epoch milliseconds of the last successful editor launch.
    pub last_opened: Option<i64>,
    pub tags: Vec<String>,
    /// Opaque icon identifier, stored but not interpreted.
    pub icon: String,
}

impl Project {
    /// Creates an unsaved project with empty optional fields.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            path: path.into(),
            description: String::new(),
            readme_path: String::new(),
            last_opened: None,
            tags: Vec::new(),
            icon: String::new(),
        }
    }

    /// Checks write-path invariants.
    ///
    /// Tags are deliberately not checked for separators.
    pub fn validate(&self) -> Result<(), ProjectValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProjectValidationError::EmptyName);
        }
        if self.path.trim().is_empty() {
            return Err(ProjectValidationError::EmptyPath);
        }
        if !Path::new(&self.path).is_absolute() {
            return Err(ProjectValidationError::RelativePath(self.path.clone()));
        }
        Ok(())
    }

    /// Returns whether a README is associated with this project.
    pub fn has_readme(&self) -> bool {
        !self.readme_path.is_empty()
    }

    /// Records a launch at `now_ms` (Unix epoch milliseconds).
    pub fn touch_opened(&mut self, now_ms: i64) {
        self.last_opened = Some(now_ms);
    }
}

/// Joins tags into the single storage column value.
pub fn encode_tags(tags: &[String]) -> String {
    tags.join(&TAG_SEPARATOR.to_string())
}

/// Splits a stored tag column back into a tag list.
///
/// An empty column decodes to no tags rather than one empty tag.
pub fn decode_tags(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(TAG_SEPARATOR).map(str::to_string).collect()
}

/// Current wall-clock time as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_millis() as i64)
}
