use codehive_core::{
    derive_language_tags, find_project_roots, get_project_name, load_readme, read_readme_file,
    scan_project_metadata, try_read_readme, validate_project_path, ScanError,
};
use std::fs;
use std::path::Path;

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

#[test]
fn find_project_roots_stops_descending_at_first_marker() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("a").join(".git")).unwrap();
    touch(&dir.path().join("a").join("b").join("go.mod"));

    let roots = find_project_roots(&[dir.path()]).unwrap();
    assert_eq!(roots, vec![dir.path().join("a")]);
}

#[test]
fn find_project_roots_collects_sibling_roots_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("zeta").join("package.json"));
    touch(&dir.path().join("alpha").join("requirements.txt"));
    touch(&dir.path().join("group").join("inner").join("pom.xml"));
    touch(&dir.path().join("plain").join("notes.txt"));

    let roots = find_project_roots(&[dir.path()]).unwrap();
    assert_eq!(
        roots,
        vec![
            dir.path().join("alpha"),
            dir.path().join("group").join("inner"),
            dir.path().join("zeta"),
        ]
    );
}

#[test]
fn find_project_roots_includes_base_when_it_is_a_root() {
    let dir = tempfile::tempdir().unwrap();
    touch(&dir.path().join("build.gradle"));
    touch(&dir.path().join("sub").join("go.mod"));

    let roots = find_project_roots(&[dir.path()]).unwrap();
    assert_eq!(roots, vec![dir.path().to_path_buf()]);
}

#[test]
fn find_project_roots_spans_multiple_bases() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    touch(&first.path().join("one").join("go.mod"));
    touch(&second.path().join("two").join("go.mod"));

    let roots = find_project_roots(&[first.path(), second.path()]).unwrap();
    assert_eq!(
        roots,
        vec![first.path().join("one"), second.path().join("two")]
    );
}

#[test]
fn find_project_roots_fails_for_missing_base() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing");

    let err = find_project_roots(&[missing.as_path()]).unwrap_err();
    assert!(matches!(err, ScanError::Io { .. }));
}

#[test]
fn read_readme_prefers_listed_order() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("README.txt"), "plain text").unwrap();
    fs::write(dir.path().join("README.md"), "# markdown").unwrap();

    assert_eq!(read_readme_file(dir.path()).unwrap(), "# markdown");
    let loaded = load_readme(dir.path()).unwrap();
    assert_eq!(loaded.path, dir.path().join("README.md"));
}

#[test]
fn read_readme_falls_back_to_extensionless_name() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme"), "lowercase").unwrap();

    assert_eq!(read_readme_file(dir.path()).unwrap(), "lowercase");
}

#[test]
fn read_readme_does_not_match_unlisted_case_variants() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("readme.TXT"), "wrong case").unwrap();

    let err = read_readme_file(dir.path()).unwrap_err();
    assert!(matches!(err, ScanError::ReadmeNotFound(_)));
    assert!(try_read_readme(dir.path()).is_none());
}

#[test]
fn validate_project_path_rejects_missing_file_and_empty_dir() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("nope");
    assert!(matches!(
        validate_project_path(&missing),
        Err(ScanError::PathNotFound(_))
    ));

    let file = dir.path().join("file.txt");
    fs::write(&file, "x").unwrap();
    assert!(matches!(
        validate_project_path(&file),
        Err(ScanError::NotADirectory(_))
    ));

    let empty = dir.path().join("empty");
    fs::create_dir(&empty).unwrap();
    assert!(matches!(
        validate_project_path(&empty),
        Err(ScanError::EmptyDirectory(_))
    ));
}

#[test]
fn validate_project_path_accepts_non_project_directories() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("photo.jpg"), "x").unwrap();

    validate_project_path(dir.path()).unwrap();
}

#[test]
fn get_project_name_uses_last_segment() {
    assert_eq!(get_project_name("/home/dev/Projects/hive"), "hive");
    assert_eq!(get_project_name("/home/dev/Projects/hive///"), "hive");
}

#[test]
fn scan_project_metadata_reads_known_manifests_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("go.mod"), "module example.com/hive").unwrap();
    fs::write(dir.path().join("package.json"), "{}").unwrap();
    fs::write(dir.path().join("Cargo.toml"), "[package]").unwrap();

    let metadata = scan_project_metadata(dir.path());
    assert_eq!(metadata.len(), 2);
    assert_eq!(metadata["go.mod"], "module example.com/hive");
    assert_eq!(
        derive_language_tags(&metadata),
        vec!["Go", "JavaScript", "Node.js"]
    );
}
