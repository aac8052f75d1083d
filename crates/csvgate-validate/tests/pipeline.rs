//! End-to-end tests of the validation pipeline over files on disk.

use std::fs;
use std::path::{Path, PathBuf};

use csvgate_model::{IssueSuite, Line, Schema};
use csvgate_rules::RuleRegistry;
use csvgate_schema::{DocumentFormat, parse_schema};
use csvgate_validate::{ValidateError, Validator};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).expect("write csv");
    path
}

fn schema(yaml: &str) -> Schema {
    parse_schema(yaml, DocumentFormat::Yaml, Path::new(".")).expect("schema")
}

fn run(schema: &Schema, path: &Path, quick: bool) -> IssueSuite {
    let registry = RuleRegistry::builtin();
    Validator::new(schema, &registry)
        .quick(quick)
        .validate_file(path)
        .expect("validate")
}

fn codes(suite: &IssueSuite) -> Vec<&str> {
    suite.iter().map(|issue| issue.code.as_str()).collect()
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn filename_mismatch_stops_quick_run() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "demo-3.csv", "name\n\n");
    let schema = schema(
        r#"
filename_pattern: /demo-[12]\.csv$/i
columns:
  - name: name
    rules:
      not_empty: true
"#,
    );

    let quick = run(&schema, &path, true);
    assert_eq!(quick.len(), 1);
    let issue = &quick.issues()[0];
    assert_eq!(issue.code, "filename_pattern");
    assert_eq!(issue.line, Line::Undefined);
}

#[test]
fn birthday_min_date() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "people.csv", "Name,Birthday\nAnn,1955-05-15\nBob,1955-05-14\n");
    let schema = schema(
        r#"
columns:
  - name: Name
  - name: Birthday
    rules:
      min_date: "1955-05-15"
"#,
    );

    let suite = run(&schema, &path, false);
    assert_eq!(suite.len(), 1);
    let issue = &suite.issues()[0];
    assert_eq!(issue.code, "date_min");
    assert_eq!(issue.column, "1:Birthday");
    assert_eq!(issue.line, Line::Number(3));
    assert!(issue.message.contains("\"1955-05-14\""));
    assert!(issue.message.contains("1955-05-15T00:00:00+00:00"));
}

#[test]
fn aggregate_sum_max() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "n.csv", "n\n1\n2\n3\n4.5\n");
    let schema = schema("columns:\n  - name: n\n    aggregate_rules:\n      sum_max: 6\n");

    let suite = run(&schema, &path, false);
    assert_eq!(codes(&suite), ["ag:sum_max"]);
    assert_eq!(
        suite.issues()[0].to_string(),
        "\"ag:sum_max\" at line undefined, column \"0:n\". \
         The sum of numbers in the column is \"10.5\", which is greater than the expected \"6\"."
    );
}

// =========================================================================
// Structural stages
// =========================================================================

#[test]
fn presence_stage_reports_missing_extra_and_order() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "u.csv", "email,id,extra\nx@y.z,1,?\n");
    let schema = schema(
        r#"
columns:
  - name: id
  - name: email
  - name: login
  - name: nickname
    required: false
"#,
    );

    let suite = run(&schema, &path, false);
    assert_eq!(codes(&suite), ["required", "allow_extra_columns", "strict_column_order"]);
    assert_eq!(suite.issues()[0].column, "2:login");
    assert_eq!(suite.issues()[1].column, "2:extra");
    assert!(suite.issues()[2].message.contains("Expected: [\"id\", \"email\"]. Actual: [\"email\", \"id\"]"));
}

#[test]
fn structural_rules_can_be_relaxed() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "u.csv", "email,id,extra\nann@example.com,1,?\n");
    let schema = schema(
        r#"
structural_rules:
  strict_column_order: false
  allow_extra_columns: true
columns:
  - name: id
    rules: { is_int: true }
  - name: email
    rules: { is_email: true }
"#,
    );
    assert!(run(&schema, &path, false).is_empty());
}

#[test]
fn unnamed_column_with_header() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "u.csv", "id\n1\n");
    let schema = schema("columns:\n  - name: id\n  - description: no name\n");
    let suite = run(&schema, &path, false);
    assert_eq!(codes(&suite), ["csv.header"]);
    assert_eq!(suite.issues()[0].column, "1");
}

#[test]
fn headerless_column_count() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "plain.csv", "1,2\n3,4\n");
    let schema = schema(
        r#"
csv:
  header: false
columns:
  - rules: { is_int: true }
  - rules: { is_int: true }
  - rules: { not_empty: true }
"#,
    );
    let suite = run(&schema, &path, true);
    assert_eq!(codes(&suite), ["csv.column_count"]);
    assert_eq!(suite.issues()[0].line, Line::Number(1));
}

#[test]
fn headerless_rows_are_bound_by_position() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "plain.csv", "1,a\nx,b\n");
    let schema = schema("csv:\n  header: false\ncolumns:\n  - rules: { is_int: true }\n  - {}\n");
    let suite = run(&schema, &path, false);
    assert_eq!(codes(&suite), ["is_int"]);
    assert_eq!(suite.issues()[0].column, "0");
    assert_eq!(suite.issues()[0].line, Line::Number(2));
}

// =========================================================================
// Quick stop and errors
// =========================================================================

#[test]
fn quick_result_is_a_prefix_of_full_result() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "demo.csv", "id,extra\n,1\nx,2\n");
    let schema = schema(
        r#"
filename_pattern: /users\.csv$/
columns:
  - name: id
    rules: { not_empty: true, is_int: true }
    aggregate_rules: { is_unique: true, count_max: 1 }
"#,
    );

    let full = run(&schema, &path, false);
    let quick = run(&schema, &path, true);
    assert!(full.len() >= 4, "{full:?}");
    assert!(!quick.is_empty());
    assert!(quick.len() < full.len());
    assert_eq!(quick.issues(), &full.issues()[..quick.len()]);
}

#[test]
fn bad_cell_rule_aborts_the_file() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "a.csv", "id\n1\n");
    let schema = schema("columns:\n  - name: id\n    rules: { length_max: many }\n");
    let registry = RuleRegistry::builtin();
    let err = Validator::new(&schema, &registry).validate_file(&path).expect_err("authoring error");
    assert!(matches!(err, ValidateError::Rule(_)));
}

#[test]
fn bad_aggregate_option_is_reported_in_band() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "a.csv", "id\n1\n");
    let schema = schema("columns:\n  - name: id\n    aggregate_rules: { nth: 3 }\n");
    let suite = run(&schema, &path, false);
    assert_eq!(codes(&suite), ["ag:nth"]);
    assert!(suite.issues()[0].message.starts_with("Unexpected error: "));
}

#[test]
fn columns_without_rules_skip_row_reading() {
    let dir = TempDir::new().expect("temp dir");
    let path = write(dir.path(), "a.csv", "id\n\"unterminated\n");
    let schema = schema("columns:\n  - name: id\n");
    assert!(run(&schema, &path, false).is_empty());
}
