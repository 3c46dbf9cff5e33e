//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over the `projects` table.
//! - Own tag column encoding and storage error classification.
//!
//! # Invariants
//! - Write paths must call `Project::validate()` before SQL mutations.
//! - Duplicate `path` inserts surface as `RepoError::DuplicatePath`.
//! - `update` never rewrites `path`; it is fixed at registration.

use crate::db::migrations::apply_migrations;
use crate::db::DbError;
use crate::model::project::{
    decode_tags, encode_tags, Project, ProjectId, ProjectValidationError,
};
use log::debug;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    name,
    path,
    description,
    readme_path,
    last_opened,
    tags,
    icon
FROM projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ProjectValidationError),
    /// Another project is already registered at this path.
    DuplicatePath(String),
    NotFound(ProjectId),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicatePath(path) => {
                write!(f, "a project is already registered at `{path}`")
            }
            Self::NotFound(id) => write!(f, "project not found: {id}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted project data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::DuplicatePath(_) | Self::NotFound(_) | Self::InvalidData(_) => None,
        }
    }
}

impl From<ProjectValidationError> for RepoError {
    fn from(value: ProjectValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for project CRUD operations.
pub trait ProjectRepository {
    /// Inserts `project` and writes the assigned id back into it.
    fn create(&self, project: &mut Project) -> RepoResult<ProjectId>;
    /// Overwrites every mutable field of the row matching `project.id`.
    fn update(&self, project: &Project) -> RepoResult<()>;
    /// Removes the row. Missing ids are not an error.
    fn delete(&self, id: ProjectId) -> RepoResult<()>;
    fn get_by_id(&self, id: ProjectId) -> RepoResult<Project>;
    fn get_by_path(&self, path: &str) -> RepoResult<Option<Project>>;
    /// Returns every project in storage order.
    fn list_all(&self) -> RepoResult<Vec<Project>>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Wraps `conn`, creating the `projects` table if it is missing.
    ///
    /// # Errors
    /// - `RepoError::Db` when the connection carries a newer schema version.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        apply_migrations(conn)?;
        Ok(Self { conn })
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create(&self, project: &mut Project) -> RepoResult<ProjectId> {
        project.validate()?;

        let inserted = self.conn.execute(
            "INSERT INTO projects (
                name,
                path,
                description,
                readme_path,
                last_opened,
                tags,
                icon
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                project.name.as_str(),
                project.path.as_str(),
                project.description.as_str(),
                project.readme_path.as_str(),
                project.last_opened,
                encode_tags(&project.tags),
                project.icon.as_str(),
            ],
        );

        if let Err(err) = inserted {
            return Err(map_insert_error(err, &project.path));
        }

        project.id = self.conn.last_insert_rowid();
        debug!(
            "event=project_create module=repo status=ok project_id={}",
            project.id
        );
        Ok(project.id)
    }

    fn update(&self, project: &Project) -> RepoResult<()> {
        project.validate()?;

        let changed = self.conn.execute(
            "UPDATE projects
             SET
                name = ?1,
                description = ?2,
                readme_path = ?3,
                last_opened = ?4,
                tags = ?5,
                icon = ?6
             WHERE id = ?7;",
            params![
                project.name.as_str(),
                project.description.as_str(),
                project.readme_path.as_str(),
                project.last_opened,
                encode_tags(&project.tags),
                project.icon.as_str(),
                project.id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(project.id));
        }

        Ok(())
    }

    fn delete(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", [id])?;
        debug!(
            "event=project_delete module=repo status=ok project_id={} rows={}",
            id, changed
        );
        Ok(())
    }

    fn get_by_id(&self, id: ProjectId) -> RepoResult<Project> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => parse_project_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn get_by_path(&self, path: &str) -> RepoResult<Option<Project>> {
        let id: Option<ProjectId> = self
            .conn
            .query_row("SELECT id FROM projects WHERE path = ?1;", [path], |row| {
                row.get(0)
            })
            .optional()?;

        match id {
            Some(id) => Ok(Some(self.get_by_id(id)?)),
            None => Ok(None),
        }
    }

    fn list_all(&self) -> RepoResult<Vec<Project>> {
        let mut stmt = self.conn.prepare(PROJECT_SELECT_SQL)?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let id: ProjectId = row.get("id")?;
    let path: String = row.get("path")?;
    if path.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty path for project {id} in projects.path"
        )));
    }

    // Nullable text columns decode to empty strings.
    let tags = row.get::<_, Option<String>>("tags")?.unwrap_or_default();

    Ok(Project {
        id,
        name: row.get("name")?,
        path,
        description: row
            .get::<_, Option<String>>("description")?
            .unwrap_or_default(),
        readme_path: row
            .get::<_, Option<String>>("readme_path")?
            .unwrap_or_default(),
        last_opened: row.get("last_opened")?,
        tags: decode_tags(&tags),
        icon: row.get::<_, Option<String>>("icon")?.unwrap_or_default(),
    })
}

fn map_insert_error(err: rusqlite::Error, path: &str) -> RepoError {
    if is_unique_violation(&err) {
        return RepoError::DuplicatePath(path.to_string());
    }
    RepoError::Db(DbError::Sqlite(err))
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
