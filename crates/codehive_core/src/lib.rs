//! Core catalog logic for CodeHive.
//! This crate is the single source of truth for catalog invariants; front
//! ends only call into it.

pub mod config;
pub mod db;
pub mod launcher;
pub mod logging;
pub mod model;
pub mod repo;
pub mod scan;
pub mod service;

pub use config::{default_config_dir, AppConfig, ConfigError, ConfigResult};
pub use launcher::editor::{
    find_editor_path, is_editor_installed, EditorCommand, EditorLauncher, LaunchError,
    LaunchResult, OpenOutcome,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::project::{decode_tags, encode_tags, Project, ProjectId, ProjectValidationError};
pub use repo::project_repo::{ProjectRepository, RepoError, RepoResult, SqliteProjectRepository};
pub use scan::fs_scan::{
    derive_language_tags, find_project_roots, get_project_name, load_readme, read_readme_file,
    scan_project_metadata, try_read_readme, validate_project_path, ReadmeFile, ScanError,
    ScanResult,
};
pub use service::intake_service::{
    read_project_readme, ImportFailure, ImportReport, IntakeError, IntakeResult,
    NewProjectRequest, ProjectIntake,
};
pub use service::project_service::ProjectService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
