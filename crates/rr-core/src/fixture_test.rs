use super::*;
use crate::row;

#[test]
fn test_statement_constructors() {
    let ok = StatementCase::ok("CREATE TABLE t (a INT)");
    assert_eq!(ok.expectation, Expectation::Success);
    assert!(ok.is_executable());

    let rows = StatementCase::rows("SELECT 1", vec![row![1]]);
    assert_eq!(rows.expectation, Expectation::Rows(vec![row![1]]));

    let err = StatementCase::error("SELECT 1/0", "division by zero");
    assert_eq!(
        err.expectation,
        Expectation::Error("division by zero".to_string())
    );
    assert!(!err.expectation.aborts_on_error());
    assert!(ok.expectation.aborts_on_error());
}

#[test]
fn test_meta_command_classification() {
    assert_eq!(classify("\\d+ int2_tbl"), StatementKind::MetaCommand);
    assert_eq!(classify("   \\dt"), StatementKind::MetaCommand);
    assert_eq!(classify("SELECT '\\d'"), StatementKind::Sql);

    let case = StatementCase::ok("\\d tbl");
    assert_eq!(case.kind, StatementKind::MetaCommand);
    assert!(!case.is_executable());
}

#[test]
fn test_skipped_statement_is_not_executable() {
    let case = StatementCase::ok("SELECT 1").skipped();
    assert!(case.skip);
    assert!(!case.is_executable());
}

#[test]
fn test_definition_rejects_self_dependency() {
    let result = FixtureDefinition::new("a", &["a"], vec![]);
    assert!(matches!(result, Err(CoreError::SelfDependency { .. })));
}

#[test]
fn test_definition_rejects_duplicate_dependency() {
    let result = FixtureDefinition::new("a", &["b", "b"], vec![]);
    assert!(matches!(
        result,
        Err(CoreError::DuplicateDependency { .. })
    ));
}

#[test]
fn test_definition_rejects_empty_error_substring() {
    let result = FixtureDefinition::new("a", &[], vec![StatementCase::error("SELECT", "")]);
    assert!(matches!(
        result,
        Err(CoreError::InvalidStatement { index: 0, .. })
    ));
}

#[test]
fn test_definition_rejects_empty_name() {
    let result = FixtureDefinition::new("", &[], vec![]);
    assert!(matches!(result, Err(CoreError::EmptyName { .. })));
}

#[test]
fn test_executable_count() {
    let def = FixtureDefinition::new(
        "a",
        &[],
        vec![
            StatementCase::ok("SELECT 1"),
            StatementCase::ok("SELECT 2").skipped(),
            StatementCase::ok("\\d t"),
        ],
    )
    .unwrap();
    assert_eq!(def.executable_count(), 1);
}

#[test]
fn test_deserialize_fixture_yaml() {
    let yaml = r#"
name: int2
depends_on: [test_setup]
statements:
  - sql: "INSERT INTO int2_tbl(f1) VALUES ('34.5');"
    error: 'invalid input syntax for type smallint: "34.5"'
  - sql: SELECT * FROM int2_tbl;
    rows: [[0], [1234], [-1234], [32767], [-32767]]
  - sql: '\d+ int2_tbl'
  - sql: SELECT 1;
    skip: true
  - sql: SELECT 2;
    kind: meta_command
"#;
    let def: FixtureDefinition = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(def.name, "int2");
    assert_eq!(def.depends_on, vec![FixtureName::new("test_setup")]);
    assert_eq!(def.statements.len(), 5);
    assert!(matches!(def.statements[0].expectation, Expectation::Error(_)));
    assert_eq!(
        def.statements[1].expectation,
        Expectation::Rows(vec![row![0], row![1234], row![-1234], row![32767], row![-32767]])
    );
    assert_eq!(def.statements[2].kind, StatementKind::MetaCommand);
    assert!(def.statements[3].skip);
    assert_eq!(def.statements[4].kind, StatementKind::MetaCommand);
}

#[test]
fn test_deserialize_rejects_rows_and_error_together() {
    let yaml = r#"
name: bad
statements:
  - sql: SELECT 1;
    rows: [[1]]
    error: boom
"#;
    let result = serde_yaml::from_str::<FixtureDefinition>(yaml);
    assert!(result.is_err());
}

#[test]
fn test_deserialize_normalize_flag() {
    let yaml = r#"
name: numeric
statements:
  - sql: SELECT 1.0::DECIMAL(4,1);
    rows: [[1.0]]
    normalize: false
  - sql: SELECT 1;
    rows: [[1]]
"#;
    let def: FixtureDefinition = serde_yaml::from_str(yaml).unwrap();
    assert!(!def.statements[0].normalize);
    assert!(def.statements[1].normalize);
    assert!(StatementCase::ok("SELECT 1").normalize);
    assert!(!StatementCase::rows("SELECT 1", vec![row![1]]).strict().normalize);
}
