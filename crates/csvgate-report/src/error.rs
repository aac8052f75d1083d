use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write XML report: {0}")]
    Xml(#[from] std::io::Error),

    #[error("failed to serialize JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("report output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unknown report format \"{0}\"; expected one of: text, table, github, gitlab, teamcity, junit")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;
