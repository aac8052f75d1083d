//! Output checks for every report format.

use csvgate_model::{Issue, IssueSuite, Line};
use csvgate_report::{ReportFormat, render, render_all};

fn sample_suite() -> IssueSuite {
    let mut suite = IssueSuite::with_source("data/people.csv");
    suite.push(Issue::new(
        "filename_pattern",
        "Filename \"people.csv\" does not match pattern",
        "",
        Line::Undefined,
    ));
    suite.push(Issue::new("not_empty", "Value is empty", "0:id", Line::Number(3)));
    suite
}

// ============================================================================
// Line-oriented formats
// ============================================================================

#[test]
fn text_lists_source_then_issues() {
    let output = render(&sample_suite(), ReportFormat::Text).unwrap();
    insta::assert_snapshot!(output.trim_end(), @r#"
    data/people.csv
    "filename_pattern" at line undefined, column "". Filename "people.csv" does not match pattern.
    "not_empty" at line 3, column "0:id". Value is empty.
    "#);
}

#[test]
fn github_emits_workflow_commands() {
    let output = render(&sample_suite(), ReportFormat::Github).unwrap();
    insta::assert_snapshot!(output.trim_end(), @r#"
    ::error file=data/people.csv::filename_pattern at column : Filename "people.csv" does not match pattern
    ::error file=data/people.csv,line=3::not_empty at column 0:id: Value is empty
    "#);
}

#[test]
fn teamcity_wraps_each_issue_in_a_failed_test() {
    let mut suite = IssueSuite::with_source("people.csv");
    suite.push(Issue::new("ag:sum_max", "Sum is [10.5]", "1:amount", Line::Undefined));
    let output = render(&suite, ReportFormat::Teamcity).unwrap();
    insta::assert_snapshot!(output.trim_end(), @r#"
    ##teamcity[testSuiteStarted name='people.csv']
    ##teamcity[testStarted name='ag:sum_max at line undefined, column 1:amount']
    ##teamcity[testFailed name='ag:sum_max at line undefined, column 1:amount' message='Sum is |[10.5|]' details='"ag:sum_max" at line undefined, column "1:amount". Sum is |[10.5|].']
    ##teamcity[testFinished name='ag:sum_max at line undefined, column 1:amount']
    ##teamcity[testSuiteFinished name='people.csv']
    "#);
}

#[test]
fn table_shows_title_and_every_issue() {
    let output = render(&sample_suite(), ReportFormat::Table).unwrap();
    assert!(output.starts_with("data/people.csv: 2 issue(s)\n"));
    for needle in ["Line", "id:Column", "Rule", "Message", "not_empty", "0:id", "undefined"] {
        assert!(output.contains(needle), "missing {needle} in\n{output}");
    }
}

#[test]
fn empty_suite_renders_only_headers() {
    let suite = IssueSuite::with_source("clean.csv");
    assert_eq!(render(&suite, ReportFormat::Text).unwrap(), "clean.csv\n");
    assert_eq!(render(&suite, ReportFormat::Github).unwrap(), "");
    assert_eq!(
        render(&suite, ReportFormat::Table).unwrap(),
        "clean.csv: 0 issue(s)\n"
    );
}

// ============================================================================
// Document formats
// ============================================================================

#[test]
fn gitlab_code_quality_entries() {
    let output = render(&sample_suite(), ReportFormat::Gitlab).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&output).unwrap();
    let entries = entries.as_array().unwrap();
    assert_eq!(entries.len(), 2);

    let second = &entries[1];
    assert_eq!(second["check_name"], "not_empty");
    assert_eq!(second["severity"], "major");
    assert_eq!(second["location"]["path"], "data/people.csv");
    assert_eq!(second["location"]["lines"]["begin"], 3);
    assert_eq!(entries[0]["location"]["lines"]["begin"], 1);
    assert_eq!(second["fingerprint"].as_str().unwrap().len(), 64);
    assert_ne!(entries[0]["fingerprint"], second["fingerprint"]);
}

#[test]
fn junit_has_one_testsuite_per_source() {
    let mut other = IssueSuite::with_source("orders.csv");
    other.push(Issue::new("is_int", "Value is not an integer", "2:qty", Line::Number(7)));
    let output = render_all(&[sample_suite(), other], ReportFormat::Junit).unwrap();

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuites name=\"csvgate\" tests=\"3\" failures=\"3\">"));
    assert_eq!(output.matches("<testsuite ").count(), 2);
    assert_eq!(output.matches("<testcase ").count(), 3);
    assert_eq!(output.matches("<failure ").count(), 3);
    assert!(output.contains("name=\"orders.csv\""));
    assert!(output.contains("type=\"is_int\""));
    assert!(output.trim_end().ends_with("</testsuites>"));
}

#[test]
fn streaming_formats() {
    assert!(ReportFormat::Text.is_streaming());
    assert!(ReportFormat::Teamcity.is_streaming());
    assert!(!ReportFormat::Gitlab.is_streaming());
    assert!(!ReportFormat::Junit.is_streaming());
}
