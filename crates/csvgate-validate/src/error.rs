//! Errors that stop a file from being validated at all.

use thiserror::Error;

use csvgate_ingest::IngestError;
use csvgate_rules::RuleError;

/// Data violations are never errors; they are collected as issues. These are
/// the failures that leave nothing to collect.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The schema declares a cell rule or pattern that cannot be built.
    #[error(transparent)]
    Rule(#[from] RuleError),

    /// The CSV file could not be opened or parsed.
    #[error(transparent)]
    Ingest(#[from] IngestError),
}

pub type Result<T> = std::result::Result<T, ValidateError>;
