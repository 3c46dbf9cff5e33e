use codehive_core::db::open_db_in_memory;
use codehive_core::{
    read_project_readme, IntakeError, NewProjectRequest, ProjectIntake, ProjectService, RepoError,
    ScanError, SqliteProjectRepository,
};
use std::fs;
use std::path::Path;

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn new_project_without_description_has_empty_fields() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.c"), "int main(void) { return 0; }").unwrap();

    let created = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(dir.path()),
            name: "Demo".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap();

    let listed = service.list_projects().unwrap();
    assert_eq!(listed, vec![created]);
    assert_eq!(listed[0].name, "Demo");
    assert!(listed[0].tags.is_empty());
    assert_eq!(listed[0].description, "");
    assert_eq!(listed[0].readme_path, "");
    assert!(listed[0].last_opened.is_some());
}

#[test]
fn new_project_requires_name_and_path() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let err = intake
        .create_from_directory(&NewProjectRequest {
            path: "/srv/somewhere".to_string(),
            name: "  ".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, IntakeError::Validation(_)));
    assert!(service.list_projects().unwrap().is_empty());
}

#[test]
fn new_project_rejects_empty_directory() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);
    let dir = tempfile::tempdir().unwrap();

    let err = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(dir.path()),
            name: "empty".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, IntakeError::Scan(ScanError::EmptyDirectory(_))));
}

#[test]
fn new_project_records_existing_readme_without_tags() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.txt"), "hello").unwrap();
    fs::write(dir.path().join("pyproject.toml"), "[project]").unwrap();

    let created = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(dir.path()),
            name: "py".to_string(),
            description: Some("scripts".to_string()),
            readme: None,
        })
        .unwrap();

    assert_eq!(created.readme_path, path_string(&dir.path().join("readme.txt")));
    assert!(created.tags.is_empty());
    assert_eq!(created.description, "scripts");
    assert_eq!(read_project_readme(&created).unwrap(), "hello");
    assert!(!dir.path().join("README.md").exists());
}

#[test]
fn authored_readme_overwrites_readme_md() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.md"), "old").unwrap();

    let created = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(dir.path()),
            name: "doc".to_string(),
            description: None,
            readme: Some("# Fresh".to_string()),
        })
        .unwrap();

    let readme = dir.path().join("README.md");
    assert_eq!(fs::read_to_string(&readme).unwrap(), "# Fresh");
    assert_eq!(created.readme_path, path_string(&readme));
}

#[test]
fn duplicate_create_leaves_existing_readme_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module demo").unwrap();
    fs::write(dir.path().join("README.md"), "original").unwrap();
    let request = NewProjectRequest {
        path: path_string(dir.path()),
        name: "Demo".to_string(),
        ..NewProjectRequest::default()
    };
    let first = intake.create_from_directory(&request).unwrap();
    assert!(first.tags.is_empty());

    let err = intake
        .create_from_directory(&NewProjectRequest {
            readme: Some("clobbered".to_string()),
            ..request
        })
        .unwrap_err();

    assert!(matches!(err, IntakeError::Repo(RepoError::DuplicatePath(_))));
    assert_eq!(
        fs::read_to_string(dir.path().join("README.md")).unwrap(),
        "original"
    );
    assert_eq!(service.list_projects().unwrap().len(), 1);
}

#[test]
fn relative_path_create_writes_no_readme() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let cwd = std::env::current_dir().unwrap();
    let dir = tempfile::tempdir_in(&cwd).unwrap();
    fs::write(dir.path().join("main.c"), "int main(void) { return 0; }").unwrap();
    let relative = dir.path().strip_prefix(&cwd).unwrap();

    let err = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(relative),
            name: "rel".to_string(),
            description: None,
            readme: Some("# Notes".to_string()),
        })
        .unwrap_err();

    assert!(matches!(err, IntakeError::Repo(RepoError::Validation(_))));
    assert!(!dir.path().join("README.md").exists());
    assert!(service.list_projects().unwrap().is_empty());
}

#[test]
fn import_registers_every_root_with_tags() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let base = tempfile::tempdir().unwrap();
    let api = base.path().join("api");
    let web = base.path().join("web");
    fs::create_dir_all(&api).unwrap();
    fs::create_dir_all(&web).unwrap();
    fs::write(api.join("go.mod"), "module api").unwrap();
    fs::write(api.join("README.md"), "# api").unwrap();
    fs::write(web.join("package.json"), "{}").unwrap();

    let report = intake.import_from(&[base.path()]).unwrap();

    assert!(!report.has_failures());
    assert_eq!(report.summary(), None);
    let imported: Vec<_> = report
        .imported
        .iter()
        .map(|project| (project.name.as_str(), project.tags.clone()))
        .collect();
    assert_eq!(
        imported,
        vec![
            ("api", vec!["Go".to_string()]),
            (
                "web",
                vec!["JavaScript".to_string(), "Node.js".to_string()]
            ),
        ]
    );
    assert_eq!(report.imported[0].readme_path, path_string(&api.join("README.md")));
    assert_eq!(report.imported[1].readme_path, "");
    assert_eq!(service.list_projects().unwrap().len(), 2);
}

#[test]
fn import_collects_failures_without_aborting() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let base = tempfile::tempdir().unwrap();
    for name in ["one", "two"] {
        let root = base.path().join(name);
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("requirements.txt"), "").unwrap();
    }

    intake.import_from(&[base.path()]).unwrap();
    fs::create_dir_all(base.path().join("three")).unwrap();
    fs::write(base.path().join("three").join("pom.xml"), "<project/>").unwrap();

    let report = intake.import_from(&[base.path()]).unwrap();
    assert_eq!(report.imported.len(), 1);
    assert_eq!(report.imported[0].name, "three");
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(
        report.failures[0].error,
        IntakeError::Repo(RepoError::DuplicatePath(_))
    ));

    let summary = report.summary().unwrap();
    assert!(summary.starts_with("Some projects failed to import:\n"));
    assert_eq!(summary.lines().count(), 3);
    assert!(summary.contains(&path_string(&base.path().join("one"))));
}

#[test]
fn attach_readme_updates_project() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let intake = ProjectIntake::new(&service);

    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    let created = intake
        .create_from_directory(&NewProjectRequest {
            path: path_string(dir.path()),
            name: "attach".to_string(),
            ..NewProjectRequest::default()
        })
        .unwrap();

    let docs = tempfile::tempdir().unwrap();
    let notes = docs.path().join("NOTES.md");
    fs::write(&notes, "external notes").unwrap();

    let updated = intake
        .attach_readme(created.id, &path_string(&notes))
        .unwrap();
    assert_eq!(service.get_project(created.id).unwrap(), updated);
    assert_eq!(read_project_readme(&updated).unwrap(), "external notes");

    let missing = docs.path().join("missing.md");
    let err = intake
        .attach_readme(created.id, &path_string(&missing))
        .unwrap_err();
    assert!(matches!(err, IntakeError::Scan(ScanError::ReadmeNotFound(_))));
}
