use codehive_core::db::open_db_in_memory;
use codehive_core::{
    EditorCommand, EditorLauncher, LaunchError, Project, ProjectService, SqliteProjectRepository,
};
use std::fs;

#[test]
fn open_missing_path_fails_and_leaves_timestamp_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let launcher = EditorLauncher::new(&service, EditorCommand::with_executable("true"));

    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("vanished");
    fs::create_dir(&target).unwrap();
    let mut project = Project::new("vanished", target.to_string_lossy());
    project.last_opened = Some(5);
    service.create_project(&mut project).unwrap();
    fs::remove_dir(&target).unwrap();

    let err = launcher.open_project(&mut project).unwrap_err();
    assert!(matches!(err, LaunchError::PathNotFound(ref path) if *path == target));
    assert_eq!(project.last_opened, Some(5));
    assert_eq!(
        service.get_project(project.id).unwrap().last_opened,
        Some(5)
    );
}

#[cfg(unix)]
#[test]
fn open_records_last_opened_and_spawns_editor() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let launcher = EditorLauncher::new(&service, EditorCommand::with_executable("true"));

    let dir = tempfile::tempdir().unwrap();
    let mut project = Project::new("live", dir.path().to_string_lossy());
    service.create_project(&mut project).unwrap();

    let outcome = launcher.open_project(&mut project).unwrap();
    assert!(outcome.last_opened_recorded);
    assert!(project.last_opened.is_some());
    assert_eq!(
        service.get_project(project.id).unwrap().last_opened,
        project.last_opened
    );
}

#[cfg(unix)]
#[test]
fn failed_timestamp_write_does_not_block_launch() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let launcher = EditorLauncher::new(&service, EditorCommand::with_executable("true"));

    let dir = tempfile::tempdir().unwrap();
    let mut unsaved = Project::new("unsaved", dir.path().to_string_lossy());
    unsaved.id = 404;

    let outcome = launcher.open_project(&mut unsaved).unwrap();
    assert!(!outcome.last_opened_recorded);
    assert!(unsaved.last_opened.is_some());
}

#[test]
fn spawn_failure_is_reported_as_launch_error() {
    let conn = open_db_in_memory().unwrap();
    let service = ProjectService::new(SqliteProjectRepository::try_new(&conn).unwrap());
    let launcher = EditorLauncher::new(
        &service,
        EditorCommand::with_executable("/nonexistent/codehive-editor-binary"),
    );

    let dir = tempfile::tempdir().unwrap();
    let mut project = Project::new("broken", dir.path().to_string_lossy());
    service.create_project(&mut project).unwrap();

    let err = launcher.open_project(&mut project).unwrap_err();
    assert!(matches!(err, LaunchError::Spawn { ref program, .. }
        if program == "/nonexistent/codehive-editor-binary"));
}

#[test]
fn platform_default_is_bare_code_on_linux() {
    let command = EditorCommand::platform_default();
    if cfg!(target_os = "linux") {
        assert_eq!(command, EditorCommand::with_executable("code"));
    } else {
        assert!(!command.args.is_empty());
    }
}
