//! Project catalog service.
//!
//! # Responsibility
//! - Provide CRUD entry points for front ends over a `ProjectRepository`.
//! - Own the catalog search filter.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Search preserves `list_all` ordering and never paginates or ranks.

use crate::model::project::{Project, ProjectId};
use crate::repo::project_repo::{ProjectRepository, RepoResult};

/// Use-case service wrapper for project catalog operations.
pub struct ProjectService<R: ProjectRepository> {
    repo: R,
}

impl<R: ProjectRepository> ProjectService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new project and stores the assigned id into it.
    pub fn create_project(&self, project: &mut Project) -> RepoResult<ProjectId> {
        self.repo.create(project)
    }

    /// Updates an existing project by id.
    ///
    /// Returns repository-level not-found or validation errors unchanged.
    pub fn update_project(&self, project: &Project) -> RepoResult<()> {
        self.repo.update(project)
    }

    pub fn delete_project(&self, id: ProjectId) -> RepoResult<()> {
        self.repo.delete(id)
    }

    pub fn get_project(&self, id: ProjectId) -> RepoResult<Project> {
        self.repo.get_by_id(id)
    }

    /// Looks up the project registered at an exact path.
    pub fn find_by_path(&self, path: &str) -> RepoResult<Option<Project>> {
        self.repo.get_by_path(path)
    }

    pub fn list_projects(&self) -> RepoResult<Vec<Project>> {
        self.repo.list_all()
    }

    /// Returns projects whose name or description contains `query`,
    /// ignoring case.
    ///
    /// An empty query matches every project.
    pub fn search_projects(&self, query: &str) -> RepoResult<Vec<Project>> {
        let projects = self.repo.list_all()?;
        let needle = query.to_lowercase();
        Ok(projects
            .into_iter()
            .filter(|project| matches_query(project, &needle))
            .collect())
    }
}

fn matches_query(project: &Project, lowered_query: &str) -> bool {
    project.name.to_lowercase().contains(lowered_query)
        || project.description.to_lowercase().contains(lowered_query)
}
