//! Renderers consumed by CI systems.

use std::fmt::Write as _;

use csvgate_model::{Issue, IssueSuite, Line};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::error::Result;

// ============================================================================
// GitHub Actions
// ============================================================================

pub(crate) fn render_github(suite: &IssueSuite) -> String {
    let file = suite.source().unwrap_or_default();
    let mut out = String::new();
    for issue in suite {
        let mut properties = format!("file={}", escape_github_property(file));
        if let Line::Number(line) = issue.line {
            let _ = write!(properties, ",line={line}");
        }
        let message = format!(
            "{} at column {}: {}",
            issue.code,
            issue.column,
            issue.message.trim_end_matches('.')
        );
        let _ = writeln!(out, "::error {properties}::{}", escape_github_data(&message));
    }
    out
}

fn escape_github_data(value: &str) -> String {
    value
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

fn escape_github_property(value: &str) -> String {
    escape_github_data(value)
        .replace(':', "%3A")
        .replace(',', "%2C")
}

// ============================================================================
// GitLab Code Quality
// ============================================================================

#[derive(Serialize)]
struct CodeQualityEntry<'a> {
    description: String,
    check_name: &'a str,
    fingerprint: String,
    severity: &'static str,
    location: CodeQualityLocation<'a>,
}

#[derive(Serialize)]
struct CodeQualityLocation<'a> {
    path: &'a str,
    lines: CodeQualityLines,
}

#[derive(Serialize)]
struct CodeQualityLines {
    begin: u64,
}

pub(crate) fn render_gitlab(suites: &[IssueSuite]) -> Result<String> {
    let mut entries = Vec::new();
    for suite in suites {
        let path = suite.source().unwrap_or_default();
        for issue in suite {
            entries.push(CodeQualityEntry {
                description: issue.to_string(),
                check_name: &issue.code,
                fingerprint: fingerprint(path, issue),
                severity: "major",
                location: CodeQualityLocation {
                    path,
                    lines: CodeQualityLines {
                        begin: issue.line.number().unwrap_or(1),
                    },
                },
            });
        }
    }
    let mut json = serde_json::to_string_pretty(&entries)?;
    json.push('\n');
    Ok(json)
}

fn fingerprint(path: &str, issue: &Issue) -> String {
    let mut hasher = Sha256::new();
    hasher.update(path.as_bytes());
    hasher.update([0]);
    hasher.update(issue.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

// ============================================================================
// TeamCity service messages
// ============================================================================

pub(crate) fn render_teamcity(suite: &IssueSuite) -> String {
    let suite_name = escape_teamcity(suite.source().unwrap_or("csvgate"));
    let mut out = String::new();
    let _ = writeln!(out, "##teamcity[testSuiteStarted name='{suite_name}']");
    for issue in suite {
        let name = escape_teamcity(&format!(
            "{} at line {}, column {}",
            issue.code, issue.line, issue.column
        ));
        let message = escape_teamcity(&issue.message);
        let details = escape_teamcity(&issue.to_string());
        let _ = writeln!(out, "##teamcity[testStarted name='{name}']");
        let _ = writeln!(
            out,
            "##teamcity[testFailed name='{name}' message='{message}' details='{details}']"
        );
        let _ = writeln!(out, "##teamcity[testFinished name='{name}']");
    }
    let _ = writeln!(out, "##teamcity[testSuiteFinished name='{suite_name}']");
    out
}

fn escape_teamcity(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '|' => out.push_str("||"),
            '\'' => out.push_str("|'"),
            '\n' => out.push_str("|n"),
            '\r' => out.push_str("|r"),
            '[' => out.push_str("|["),
            ']' => out.push_str("|]"),
            _ => out.push(ch),
        }
    }
    out
}
