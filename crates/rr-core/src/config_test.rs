use super::*;
use tempfile::TempDir;

#[test]
fn test_parse_minimal_config() {
    let config = Config::parse("name: pg_regress").unwrap();
    assert_eq!(config.name, "pg_regress");
    assert_eq!(config.fixture_paths, vec!["fixtures"]);
    assert_eq!(config.database.path, ":memory:");
    assert_eq!(config.deadline(), None);
    assert_eq!(config.report_path, "target/regrun_report.json");
}

#[test]
fn test_parse_full_config() {
    let yaml = r#"
name: pg_regress
fixture_paths: [regression, extra]
database:
  path: target/conformance.duckdb
deadline_secs: 90
report_path: out/report.json
"#;
    let config = Config::parse(yaml).unwrap();
    assert_eq!(config.fixture_paths, vec!["regression", "extra"]);
    assert_eq!(config.database.path, "target/conformance.duckdb");
    assert_eq!(config.deadline(), Some(Duration::from_secs(90)));
    assert_eq!(config.report_path, "out/report.json");
}

#[test]
fn test_unknown_field_is_rejected() {
    let result = Config::parse("name: x\nthreads: 4\n");
    assert!(matches!(result, Err(CoreError::ConfigParseError { .. })));
}

#[test]
fn test_empty_name_is_rejected() {
    let result = Config::parse("name: ''");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_empty_fixture_paths_is_rejected() {
    let result = Config::parse("name: x\nfixture_paths: []\n");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_zero_deadline_is_rejected() {
    let result = Config::parse("name: x\ndeadline_secs: 0\n");
    assert!(matches!(result, Err(CoreError::ConfigInvalid { .. })));
}

#[test]
fn test_load_from_dir() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("regrun.yaml"), "name: from_dir\n").unwrap();

    let config = Config::load_from_dir(dir.path()).unwrap();
    assert_eq!(config.name, "from_dir");
    assert_eq!(
        config.fixture_paths_absolute(dir.path()),
        vec![dir.path().join("fixtures")]
    );
}

#[test]
fn test_load_from_dir_missing() {
    let dir = TempDir::new().unwrap();
    let result = Config::load_from_dir(dir.path());
    assert!(matches!(result, Err(CoreError::ConfigNotFound { .. })));
}
