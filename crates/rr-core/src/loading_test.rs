use super::*;
use crate::fixture::{Expectation, StatementKind};
use crate::value::Value;
use tempfile::TempDir;

fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn project(files: &[(&str, &str)]) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "regrun.yml", "name: loading_test\n");
    for (rel, content) in files {
        write(dir.path(), rel, content);
    }
    let config = Config::load_from_dir(dir.path()).unwrap();
    (dir, config)
}

#[test]
fn test_discover_is_recursive_and_sorted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "b.yml", "");
    write(dir.path(), "nested/a.yaml", "");
    write(dir.path(), "a.yml", "");
    write(dir.path(), "notes.txt", "");

    let files = discover_fixture_files(dir.path()).unwrap();
    let rel: Vec<_> = files
        .iter()
        .map(|f| f.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();
    assert_eq!(
        rel,
        vec![
            PathBuf::from("a.yml"),
            PathBuf::from("b.yml"),
            PathBuf::from("nested/a.yaml")
        ]
    );
}

#[test]
fn test_discover_missing_dir_is_empty() {
    let dir = TempDir::new().unwrap();
    let files = discover_fixture_files(&dir.path().join("absent")).unwrap();
    assert!(files.is_empty());
}

#[test]
fn test_load_fixture_file_parses_all_statement_forms() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "int2.yml",
        r#"
name: int2
depends_on: [test_setup]
statements:
  - sql: CREATE TABLE int2_tbl(f1 smallint);
  - sql: "INSERT INTO int2_tbl(f1) VALUES ('34.5');"
    error: 'Could not convert'
  - sql: SELECT f1, NULL FROM int2_tbl;
    rows: [[0, null], [1234, []]]
  - sql: '\d+ int2_tbl'
  - sql: SELECT 1;
    skip: true
"#,
    );

    let def = load_fixture_file(&dir.path().join("int2.yml")).unwrap();
    assert_eq!(def.name, "int2");
    assert_eq!(def.depends_on, vec!["test_setup"]);
    assert_eq!(def.statements.len(), 5);
    assert_eq!(def.statements[0].expectation, Expectation::Success);
    assert_eq!(
        def.statements[1].expectation,
        Expectation::Error("Could not convert".into())
    );
    match &def.statements[2].expectation {
        Expectation::Rows(rows) => {
            assert_eq!(rows[0], vec![Value::Int(0), Value::Null]);
            assert!(matches!(rows[1][1], Value::Empty));
        }
        other => panic!("expected rows, got {:?}", other),
    }
    assert_eq!(def.statements[3].kind, StatementKind::MetaCommand);
    assert!(def.statements[4].skip);
    assert_eq!(def.executable_count(), 3);
}

#[test]
fn test_load_fixture_file_reports_path_on_parse_error() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "bad.yml",
        "name: bad\nstatements:\n  - sql: SELECT 1\n    rows: [[1]]\n    error: boom\n",
    );
    match load_fixture_file(&dir.path().join("bad.yml")) {
        Err(CoreError::FixtureParseError { path, .. }) => assert!(path.ends_with("bad.yml")),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_load_registry_validates_graph() {
    let (dir, config) = project(&[
        ("fixtures/setup.yml", "name: test_setup\nstatements:\n  - sql: SELECT 1\n"),
        ("fixtures/sub/int2.yml", "name: int2\ndepends_on: [test_setup]\n"),
    ]);

    let registry = load_registry(dir.path(), &config).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(registry.contains("int2"));
    assert!(registry.contains("test_setup"));
}

#[test]
fn test_load_registry_rejects_unknown_dependency() {
    let (dir, config) = project(&[("fixtures/int2.yml", "name: int2\ndepends_on: [ghost]\n")]);
    let err = load_registry(dir.path(), &config).unwrap_err();
    assert!(err.is_configuration_error());
    assert!(matches!(err, CoreError::UnknownDependency { .. }));
}

#[test]
fn test_load_registry_rejects_duplicate_names() {
    let (dir, config) = project(&[
        ("fixtures/a.yml", "name: same\n"),
        ("fixtures/b.yml", "name: same\n"),
    ]);
    let err = load_registry(dir.path(), &config).unwrap_err();
    assert!(matches!(err, CoreError::DuplicateFixture { .. }));
}

#[test]
fn test_load_registry_rejects_cycle() {
    let (dir, config) = project(&[
        ("fixtures/a.yml", "name: a\ndepends_on: [b]\n"),
        ("fixtures/b.yml", "name: b\ndepends_on: [a]\n"),
    ]);
    let err = load_registry(dir.path(), &config).unwrap_err();
    assert!(matches!(err, CoreError::CircularDependency { .. }));
}
