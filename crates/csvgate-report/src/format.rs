use std::fmt;
use std::str::FromStr;

use csvgate_model::IssueSuite;

use crate::error::{ReportError, Result};
use crate::{ci, junit, text};

/// Output flavour of a rendered report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReportFormat {
    Text,
    #[default]
    Table,
    Github,
    Gitlab,
    Teamcity,
    Junit,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 6] = [
        ReportFormat::Text,
        ReportFormat::Table,
        ReportFormat::Github,
        ReportFormat::Gitlab,
        ReportFormat::Teamcity,
        ReportFormat::Junit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Table => "table",
            ReportFormat::Github => "github",
            ReportFormat::Gitlab => "gitlab",
            ReportFormat::Teamcity => "teamcity",
            ReportFormat::Junit => "junit",
        }
    }

    /// Whether per-suite output can be printed as soon as each suite is ready.
    ///
    /// GitLab and JUnit reports are single documents and must be rendered
    /// once over every suite.
    pub fn is_streaming(self) -> bool {
        !matches!(self, ReportFormat::Gitlab | ReportFormat::Junit)
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ReportError;

    fn from_str(raw: &str) -> Result<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| ReportError::UnknownFormat(raw.to_string()))
    }
}

/// Render one suite.
pub fn render(suite: &IssueSuite, format: ReportFormat) -> Result<String> {
    render_all(std::slice::from_ref(suite), format)
}

/// Render several suites as one report.
pub fn render_all(suites: &[IssueSuite], format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(suites.iter().map(text::render_text).collect()),
        ReportFormat::Table => Ok(suites.iter().map(text::render_table).collect()),
        ReportFormat::Github => Ok(suites.iter().map(ci::render_github).collect()),
        ReportFormat::Teamcity => Ok(suites.iter().map(ci::render_teamcity).collect()),
        ReportFormat::Gitlab => ci::render_gitlab(suites),
        ReportFormat::Junit => junit::render_junit(suites),
    }
}
