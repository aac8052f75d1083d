//! Violation records and the ordered suite that collects them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical line an issue refers to.
///
/// File- and schema-level issues carry [`Line::Undefined`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<u64>", into = "Option<u64>")]
pub enum Line {
    Undefined,
    Number(u64),
}

impl Line {
    pub fn number(&self) -> Option<u64> {
        match self {
            Line::Undefined => None,
            Line::Number(n) => Some(*n),
        }
    }
}

impl From<Option<u64>> for Line {
    fn from(value: Option<u64>) -> Self {
        value.map_or(Line::Undefined, Line::Number)
    }
}

impl From<Line> for Option<u64> {
    fn from(value: Line) -> Self {
        value.number()
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Line::Undefined => f.write_str("undefined"),
            Line::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A single violation: which rule, where, and what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Rule code (e.g. `not_empty`, `ag:sum_max`, `filename_pattern`).
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Rendered column identifier, empty for file-level issues.
    pub column: String,
    pub line: Line,
}

impl Issue {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        column: impl Into<String>,
        line: Line,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            column: column.into(),
            line,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message.trim_end_matches('.');
        write!(
            f,
            "\"{}\" at line {}, column \"{}\". {}.",
            self.code, self.line, self.column, message
        )
    }
}

/// Ordered, append-only collection of issues with an optional source label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSuite {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default)]
    issues: Vec<Issue>,
}

impl IssueSuite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: Some(source.into()),
            issues: Vec::new(),
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn push(&mut self, issue: Issue) {
        self.issues.push(issue);
    }

    /// Append every issue of `other`, keeping its order.
    pub fn merge(&mut self, other: IssueSuite) {
        self.issues.extend(other.issues);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }
}

impl Extend<Issue> for IssueSuite {
    fn extend<T: IntoIterator<Item = Issue>>(&mut self, iter: T) {
        self.issues.extend(iter);
    }
}

impl FromIterator<Issue> for IssueSuite {
    fn from_iter<T: IntoIterator<Item = Issue>>(iter: T) -> Self {
        Self {
            source: None,
            issues: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a IssueSuite {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_text_form() {
        let issue = Issue::new(
            "filename_pattern",
            "Filename \"demo-3.csv\" does not match pattern",
            "",
            Line::Undefined,
        );
        assert_eq!(
            issue.to_string(),
            "\"filename_pattern\" at line undefined, column \"\". Filename \"demo-3.csv\" does not match pattern."
        );
    }

    #[test]
    fn merge_keeps_order() {
        let mut first = IssueSuite::with_source("a.csv");
        first.push(Issue::new("a", "one", "0:A", Line::Number(2)));
        let mut second = IssueSuite::new();
        second.push(Issue::new("b", "two", "1:B", Line::Number(3)));
        first.merge(second);
        let codes: Vec<&str> = first.iter().map(|issue| issue.code.as_str()).collect();
        assert_eq!(codes, ["a", "b"]);
        assert_eq!(first.source(), Some("a.csv"));
    }

    #[test]
    fn undefined_line_serializes_as_null() {
        let issue = Issue::new("x", "y", "", Line::Undefined);
        let json = serde_json::to_value(&issue).unwrap();
        assert!(json["line"].is_null());
        let round: Issue = serde_json::from_value(json).unwrap();
        assert_eq!(round.line, Line::Undefined);
    }
}
