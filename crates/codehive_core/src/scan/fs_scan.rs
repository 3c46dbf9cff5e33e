//! Directory walks and lightweight project file reads.
//!
//! # Responsibility
//! - Detect project roots by marker files.
//! - Resolve README files from a fixed list of name variants.
//! - Collect build manifests and derive coarse language tags.
//!
//! # Invariants
//! - A detected root is never descended into.
//! - README names are matched exactly, never case-insensitively.
//! - Walk order is by file name within each directory.

use log::{info, warn};
use std::collections::{BTreeMap, HashSet};
use std::error::Error;
use std::ffi::{OsStr, OsString};
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::WalkDir;

/// Files or directories whose presence marks a project root.
pub const PROJECT_MARKERS: &[&str] = &[
    ".git",
    "go.mod",
    "package.json",
    "requirements.txt",
    "pom.xml",
    "build.gradle",
];

/// README file names tried in order.
pub const README_NAMES: &[&str] = &[
    "README.md",
    "readme.md",
    "Readme.md",
    "README.txt",
    "readme.txt",
    "README",
    "readme",
];

/// Manifest files captured by [`scan_project_metadata`].
pub const METADATA_FILES: &[&str] = &["go.mod", "package.json", "pyproject.toml", "pom.xml"];

// Entries that make a directory look like a project without being a root marker.
const SOFT_INDICATORS: &[&str] = &[
    ".git",
    "go.mod",
    "package.json",
    "src",
    "pkg",
    "README.md",
    "readme.md",
];

pub type ScanResult<T> = Result<T, ScanError>;

/// Scanner error carrying the offending path.
#[derive(Debug)]
pub enum ScanError {
    PathNotFound(PathBuf),
    NotADirectory(PathBuf),
    EmptyDirectory(PathBuf),
    /// None of the [`README_NAMES`] exist in the directory.
    ReadmeNotFound(PathBuf),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathNotFound(path) => write!(f, "path does not exist: {}", path.display()),
            Self::NotADirectory(path) => {
                write!(f, "path is not a directory: {}", path.display())
            }
            Self::EmptyDirectory(path) => write!(f, "directory is empty: {}", path.display()),
            Self::ReadmeNotFound(path) => {
                write!(f, "no README file found in {}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to read `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ScanError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Walks every base path depth-first and returns detected project roots.
///
/// A directory qualifies when it directly contains one of
/// [`PROJECT_MARKERS`]; its subtree is then skipped.
///
/// # Errors
/// - `ScanError::Io` for the first unreadable entry, including a missing base.
pub fn find_project_roots<P: AsRef<Path>>(base_paths: &[P]) -> ScanResult<Vec<PathBuf>> {
    let mut roots = Vec::new();

    for base in base_paths {
        let base = base.as_ref();
        let started_at = Instant::now();
        let found_before = roots.len();

        let mut walker = WalkDir::new(base)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry.map_err(|err| walk_error(base, err))?;
            if !entry.file_type().is_dir() {
                continue;
            }

            if has_any_entry(entry.path(), PROJECT_MARKERS) {
                roots.push(entry.path().to_path_buf());
                walker.skip_current_dir();
            }
        }

        info!(
            "event=scan_roots module=scan status=ok base={} found={} duration_ms={}",
            base.display(),
            roots.len() - found_before,
            started_at.elapsed().as_millis()
        );
    }

    Ok(roots)
}

/// Returns the first existing README file in `project_path`, if any.
///
/// Names are compared against directory entries byte-for-byte so that
/// case-insensitive filesystems do not widen the match.
pub fn locate_readme(project_path: impl AsRef<Path>) -> Option<PathBuf> {
    let project_path = project_path.as_ref();
    let entries = std::fs::read_dir(project_path).ok()?;
    let names: HashSet<OsString> = entries
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().map(|kind| !kind.is_dir()).unwrap_or(false))
        .map(|entry| entry.file_name())
        .collect();

    README_NAMES
        .iter()
        .find(|name| names.contains(OsStr::new(name)))
        .map(|name| project_path.join(name))
}

/// README file resolved from a project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadmeFile {
    pub path: PathBuf,
    pub content: String,
}

/// Reads the first README found in `project_path`.
///
/// # Errors
/// - `ScanError::ReadmeNotFound` when no listed name exists.
/// - `ScanError::Io` when the file exists but cannot be read.
pub fn read_readme_file(project_path: impl AsRef<Path>) -> ScanResult<String> {
    load_readme(project_path).map(|readme| readme.content)
}

/// Like [`read_readme_file`], also returning which file was read.
pub fn load_readme(project_path: impl AsRef<Path>) -> ScanResult<ReadmeFile> {
    let project_path = project_path.as_ref();
    let path = locate_readme(project_path)
        .ok_or_else(|| ScanError::ReadmeNotFound(project_path.to_path_buf()))?;
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(ReadmeFile { path, content }),
        Err(source) => Err(ScanError::Io { path, source }),
    }
}

/// Best-effort README read used by intake flows.
///
/// Returns `None` on any failure; unreadable files are logged, not surfaced.
pub fn try_read_readme(project_path: impl AsRef<Path>) -> Option<ReadmeFile> {
    let project_path = project_path.as_ref();
    match load_readme(project_path) {
        Ok(readme) => Some(readme),
        Err(ScanError::ReadmeNotFound(_)) => None,
        Err(err) => {
            warn!(
                "event=readme_read module=scan status=warn path={} error={}",
                project_path.display(),
                err
            );
            None
        }
    }
}

/// Checks that `path` is an existing, non-empty directory.
///
/// Directories without any recognizable project entry pass with a warning.
pub fn validate_project_path(path: impl AsRef<Path>) -> ScanResult<()> {
    let path = path.as_ref();
    let metadata = std::fs::metadata(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScanError::PathNotFound(path.to_path_buf())
        } else {
            ScanError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(path.to_path_buf()));
    }

    let mut entries = std::fs::read_dir(path).map_err(|source| ScanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if entries.next().is_none() {
        return Err(ScanError::EmptyDirectory(path.to_path_buf()));
    }

    if !has_any_entry(path, SOFT_INDICATORS) {
        warn!(
            "event=validate_path module=scan status=warn path={} reason=no_project_indicators",
            path.display()
        );
    }

    Ok(())
}

/// Derives a display name from the last path segment.
///
/// Trailing `/` and `\` separators are ignored. A path made only of
/// separators names itself by a single separator; an empty path is `.`.
pub fn get_project_name(path: &str) -> String {
    let trimmed = path.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return path.get(..1).unwrap_or(".").to_string();
    }
    let last_segment = trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed);
    last_segment.to_string()
}

/// Reads the raw content of every [`METADATA_FILES`] entry present at `path`.
///
/// Unreadable files are skipped.
pub fn scan_project_metadata(path: impl AsRef<Path>) -> BTreeMap<String, String> {
    let path = path.as_ref();
    let mut metadata = BTreeMap::new();
    for filename in METADATA_FILES {
        if let Ok(content) = std::fs::read_to_string(path.join(filename)) {
            metadata.insert((*filename).to_string(), content);
        }
    }
    metadata
}

/// Maps manifest presence to coarse language tags.
pub fn derive_language_tags(metadata: &BTreeMap<String, String>) -> Vec<String> {
    const LANGUAGE_TAGS: &[(&str, &[&str])] = &[
        ("go.mod", &["Go"]),
        ("package.json", &["JavaScript", "Node.js"]),
        ("pyproject.toml", &["Python"]),
        ("pom.xml", &["Java", "Maven"]),
    ];

    LANGUAGE_TAGS
        .iter()
        .filter(|(file, _)| metadata.contains_key(*file))
        .flat_map(|(_, tags)| tags.iter().map(|tag| (*tag).to_string()))
        .collect()
}

fn has_any_entry(dir: &Path, names: &[&str]) -> bool {
    names.iter().any(|name| dir.join(name).exists())
}

fn walk_error(base: &Path, err: walkdir::Error) -> ScanError {
    let path = err
        .path()
        .map_or_else(|| base.to_path_buf(), Path::to_path_buf);
    let source = err
        .into_io_error()
        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
    ScanError::Io { path, source }
}
