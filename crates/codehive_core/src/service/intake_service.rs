//! Project intake use-cases.
//!
//! # Responsibility
//! - Register a single directory as a new catalog project.
//! - Batch-import detected project roots with aggregated failure reporting.
//! - Attach and read README files for existing projects.
//!
//! # Invariants
//! - README pre-reads are best-effort; a failure leaves `readme_path` empty.
//! - Authored README content is written to `<path>/README.md`, replacing any
//!   file of that exact name.
//! - Batch import never stops on the first failing root.

use crate::model::project::{now_epoch_ms, Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoError};
use crate::scan::fs_scan::{
    derive_language_tags, find_project_roots, get_project_name, scan_project_metadata,
    try_read_readme, validate_project_path, ScanError,
};
use crate::service::project_service::ProjectService;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const AUTHORED_README_NAME: &str = "README.md";

pub type IntakeResult<T> = Result<T, IntakeError>;

/// Service error for intake use-cases.
#[derive(Debug)]
pub enum IntakeError {
    /// Required request input is missing.
    Validation(String),
    Scan(ScanError),
    Repo(RepoError),
    /// Authored README could not be written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for IntakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Scan(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for IntakeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(_) => None,
            Self::Scan(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ScanError> for IntakeError {
    fn from(value: ScanError) -> Self {
        Self::Scan(value)
    }
}

impl From<RepoError> for IntakeError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Request model for the "New Project" flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProjectRequest {
    pub path: String,
    pub name: String,
    pub description: Option<String>,
    /// README content authored by the user, written to `<path>/README.md`.
    pub readme: Option<String>,
}

/// One root that could not be imported.
#[derive(Debug)]
pub struct ImportFailure {
    pub path: PathBuf,
    pub error: IntakeError,
}

/// Outcome of a batch import.
#[derive(Debug, Default)]
pub struct ImportReport {
    pub imported: Vec<Project>,
    pub failures: Vec<ImportFailure>,
}

impl ImportReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Multi-line failure summary for display, or `None` when all succeeded.
    pub fn summary(&self) -> Option<String> {
        if self.failures.is_empty() {
            return None;
        }
        let mut message = String::from("Some projects failed to import:\n");
        for failure in &self.failures {
            message.push_str(&format!(
                "failed to import {}: {}\n",
                failure.path.display(),
                failure.error
            ));
        }
        Some(message)
    }
}

/// Intake orchestration over the catalog service and filesystem scanner.
pub struct ProjectIntake<'svc, R: ProjectRepository> {
    service: &'svc ProjectService<R>,
}

impl<'svc, R: ProjectRepository> ProjectIntake<'svc, R> {
    pub fn new(service: &'svc ProjectService<R>) -> Self {
        Self { service }
    }

    /// Registers one directory as a new project.
    ///
    /// # Contract
    /// - `path` and `name` must be non-blank.
    /// - The directory must exist, be a directory and be non-empty.
    /// - The path must not already be registered; this is checked before any
    ///   authored README is written so a rejected create leaves disk unchanged.
    /// - New projects start without tags; only batch import derives them.
    pub fn create_from_directory(&self, request: &NewProjectRequest) -> IntakeResult<Project> {
        if request.path.trim().is_empty() || request.name.trim().is_empty() {
            return Err(IntakeError::Validation(
                "project path and name are required".to_string(),
            ));
        }

        validate_project_path(&request.path)?;

        let mut project = Project::new(request.name.trim(), request.path.as_str());
        project.description = request.description.clone().unwrap_or_default();
        self.ensure_registrable(&project)?;

        project.readme_path = match request.readme.as_deref() {
            Some(content) => write_authored_readme(Path::new(&request.path), content)?,
            None => existing_readme_path(Path::new(&request.path)),
        };
        project.last_opened = Some(now_epoch_ms());

        self.service.create_project(&mut project)?;
        info!(
            "event=project_intake module=intake status=ok project_id={} tags={}",
            project.id,
            project.tags.len()
        );
        Ok(project)
    }

    /// Detects project roots under `base_paths` and registers each one.
    ///
    /// # Errors
    /// - Returns `Err` only when the directory walk itself fails; per-root
    ///   failures are collected in the report.
    pub fn import_from<P: AsRef<Path>>(&self, base_paths: &[P]) -> IntakeResult<ImportReport> {
        let roots = find_project_roots(base_paths)?;
        let mut report = ImportReport::default();

        for root in roots {
            match self.import_root(&root) {
                Ok(project) => report.imported.push(project),
                Err(error) => {
                    warn!(
                        "event=project_import module=intake status=error path={} error={}",
                        root.display(),
                        error
                    );
                    report.failures.push(ImportFailure { path: root, error });
                }
            }
        }

        info!(
            "event=project_import module=intake status=ok imported={} failed={}",
            report.imported.len(),
            report.failures.len()
        );
        Ok(report)
    }

    /// Associates an existing README file with a project.
    pub fn attach_readme(&self, id: ProjectId, readme_path: &str) -> IntakeResult<Project> {
        if !Path::new(readme_path).is_file() {
            return Err(ScanError::ReadmeNotFound(PathBuf::from(readme_path)).into());
        }

        let mut project = self.service.get_project(id)?;
        project.readme_path = readme_path.to_string();
        self.service.update_project(&project)?;
        Ok(project)
    }

    fn import_root(&self, root: &Path) -> IntakeResult<Project> {
        let path = root.to_string_lossy().into_owned();
        let mut project = Project::new(get_project_name(&path), path);
        project.readme_path = existing_readme_path(root);
        self.ensure_registrable(&project)?;
        project.tags = derive_language_tags(&scan_project_metadata(root));
        project.last_opened = Some(now_epoch_ms());

        self.service.create_project(&mut project)?;
        Ok(project)
    }

    /// Rejects invalid or already-registered projects before any side effect.
    fn ensure_registrable(&self, project: &Project) -> IntakeResult<()> {
        project.validate().map_err(RepoError::from)?;
        if self.service.find_by_path(&project.path)?.is_some() {
            return Err(RepoError::DuplicatePath(project.path.clone()).into());
        }
        Ok(())
    }
}

/// Reads the README recorded on `project`.
///
/// # Errors
/// - `ScanError::ReadmeNotFound` when no README is associated.
/// - `ScanError::Io` when the recorded file cannot be read.
pub fn read_project_readme(project: &Project) -> Result<String, ScanError> {
    if !project.has_readme() {
        return Err(ScanError::ReadmeNotFound(PathBuf::from(&project.path)));
    }
    std::fs::read_to_string(&project.readme_path).map_err(|source| ScanError::Io {
        path: PathBuf::from(&project.readme_path),
        source,
    })
}

fn existing_readme_path(project_path: &Path) -> String {
    try_read_readme(project_path)
        .map(|readme| readme.path.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn write_authored_readme(project_path: &Path, content: &str) -> IntakeResult<String> {
    let target = project_path.join(AUTHORED_README_NAME);
    std::fs::write(&target, content).map_err(|source| IntakeError::Io {
        path: target.clone(),
        source,
    })?;
    Ok(target.to_string_lossy().into_owned())
}
