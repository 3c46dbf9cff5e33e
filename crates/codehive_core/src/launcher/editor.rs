//! Editor launcher for catalog projects.
//!
//! # Responsibility
//! - Build the platform launch command for the external editor.
//! - Open a project and persist its last-opened time best-effort.
//! - Check whether the editor executable is available.
//!
//! # Invariants
//! - A project whose directory is gone is never stamped or launched.
//! - A failed timestamp write never blocks the launch.

use crate::model::project::{now_epoch_ms, Project};
use crate::repo::project_repo::ProjectRepository;
use crate::service::project_service::ProjectService;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// Executable name looked up on the search path.
pub const EDITOR_EXECUTABLE: &str = "code";

pub type LaunchResult<T> = Result<T, LaunchError>;

/// Launcher error for missing targets and spawn failures.
#[derive(Debug)]
pub enum LaunchError {
    /// Project directory no longer exists on disk.
    PathNotFound(PathBuf),
    /// No editor installation was found at any known install location.
    EditorNotFound,
    Spawn {
        program: String,
        source: std::io::Error,
    },
}

impl Display for LaunchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => {
                write!(f, "project path does not exist: {}", path.display())
            }
            Self::EditorNotFound => write!(f, "editor installation not found"),
            Self::Spawn { program, source } => {
                write!(f, "failed to launch editor `{program}`: {source}")
            }
        }
    }
}

impl Error for LaunchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Spawn { source, .. } => Some(source),
            Self::PathNotFound(_) | Self::EditorNotFound => None,
        }
    }
}

/// Program plus leading arguments; the project path is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl EditorCommand {
    /// Launch command conventional for the current platform.
    ///
    /// - Windows: `cmd /c code <path>`
    /// - macOS: `open -a "Visual Studio Code" <path>`
    /// - other: `code <path>`
    pub fn platform_default() -> Self {
        if cfg!(target_os = "windows") {
            Self {
                program: "cmd".to_string(),
                args: vec!["/c".to_string(), EDITOR_EXECUTABLE.to_string()],
            }
        } else if cfg!(target_os = "macos") {
            Self {
                program: "open".to_string(),
                args: vec!["-a".to_string(), "Visual Studio Code".to_string()],
            }
        } else {
            Self::with_executable(EDITOR_EXECUTABLE)
        }
    }

    /// Launches a specific editor executable directly.
    pub fn with_executable(path: impl Into<String>) -> Self {
        Self {
            program: path.into(),
            args: Vec::new(),
        }
    }

    /// Uses `configured` when non-blank, otherwise the platform default.
    pub fn from_config(configured: &str) -> Self {
        let configured = configured.trim();
        if configured.is_empty() {
            Self::platform_default()
        } else {
            Self::with_executable(configured)
        }
    }

    fn to_command(&self, project_path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(project_path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        command
    }
}

/// Result of a successful launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenOutcome {
    /// Whether the new last-opened time was persisted.
    pub last_opened_recorded: bool,
}

/// Opens catalog projects in the external editor.
pub struct EditorLauncher<'svc, R: ProjectRepository> {
    service: &'svc ProjectService<R>,
    command: EditorCommand,
}

impl<'svc, R: ProjectRepository> EditorLauncher<'svc, R> {
    pub fn new(service: &'svc ProjectService<R>, command: EditorCommand) -> Self {
        Self { service, command }
    }

    pub fn command(&self) -> &EditorCommand {
        &self.command
    }

    /// Stamps `project` as opened now and spawns the editor on its path.
    ///
    /// # Errors
    /// - `LaunchError::PathNotFound` when the directory is gone; `project`
    ///   is left untouched.
    /// - `LaunchError::Spawn` when the process cannot be created.
    pub fn open_project(&self, project: &mut Project) -> LaunchResult<OpenOutcome> {
        let project_path = PathBuf::from(&project.path);
        if !project_path.exists() {
            return Err(LaunchError::PathNotFound(project_path));
        }

        project.touch_opened(now_epoch_ms());
        let last_opened_recorded = self.record_last_opened(project);

        self.command
            .to_command(&project_path)
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                program: self.command.program.clone(),
                source,
            })?;

        info!(
            "event=editor_open module=launcher status=ok project_id={} program={}",
            project.id, self.command.program
        );
        Ok(OpenOutcome {
            last_opened_recorded,
        })
    }

    /// Best-effort persistence of `project.last_opened`.
    ///
    /// Returns `false` and logs when the write fails.
    pub fn record_last_opened(&self, project: &Project) -> bool {
        match self.service.update_project(project) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    "event=last_opened_update module=launcher status=warn project_id={} error={}",
                    project.id, err
                );
                false
            }
        }
    }
}

/// Returns whether the editor executable resolves on the search path.
pub fn is_editor_installed() -> bool {
    which::which(EDITOR_EXECUTABLE).is_ok()
}

/// Returns the first conventional editor install location that exists.
///
/// # Errors
/// - `LaunchError::EditorNotFound` when none of the locations exist.
pub fn find_editor_path() -> LaunchResult<PathBuf> {
    find_existing(&editor_install_candidates())
}

fn find_existing(candidates: &[PathBuf]) -> LaunchResult<PathBuf> {
    candidates
        .iter()
        .find(|candidate| candidate.exists())
        .cloned()
        .ok_or(LaunchError::EditorNotFound)
}

fn editor_install_candidates() -> Vec<PathBuf> {
    if cfg!(target_os = "windows") {
        let program_dir = |key: &str, tail: &[&str]| {
            let base = PathBuf::from(std::env::var_os(key)?);
            Some(tail.iter().fold(base, |dir, part| dir.join(part)))
        };
        [
            program_dir("LOCALAPPDATA", &["Programs", "Microsoft VS Code", "Code.exe"]),
            program_dir("ProgramFiles", &["Microsoft VS Code", "Code.exe"]),
            program_dir("ProgramFiles(x86)", &["Microsoft VS Code", "Code.exe"]),
        ]
        .into_iter()
        .flatten()
        .collect()
    } else if cfg!(target_os = "macos") {
        vec![
            PathBuf::from("/Applications/Visual Studio Code.app/Contents/MacOS/Electron"),
            PathBuf::from("/Applications/VSCode.app/Contents/MacOS/Electron"),
        ]
    } else {
        unix_install_candidates(dirs::home_dir())
    }
}

/// System locations plus the per-user one; the latter only with a known home.
fn unix_install_candidates(home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from("/usr/bin/code"),
        PathBuf::from("/usr/local/bin/code"),
    ];
    if let Some(home) = home.filter(|home| home.is_absolute()) {
        candidates.push(home.join(".local").join("bin").join(EDITOR_EXECUTABLE));
    }
    candidates
}
