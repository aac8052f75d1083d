use thiserror::Error;

use crate::registry::RuleKind;

/// Schema-authoring failures raised while instantiating rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error(
        "unknown {kind} rule \"{name}\": no implementation is registered as \"{expected}\""
    )]
    UnknownRule {
        name: String,
        kind: RuleKind,
        expected: String,
    },

    #[error("rule \"{name}\" is {actual} rule and cannot be used as {expected} rule")]
    WrongKind {
        name: String,
        expected: RuleKind,
        actual: RuleKind,
    },

    #[error("invalid option for rule \"{rule}\": expected {expected}, got {actual}")]
    InvalidOption {
        rule: String,
        expected: String,
        actual: String,
    },

    #[error("invalid pattern \"{pattern}\": {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl RuleError {
    pub(crate) fn option(
        rule: &str,
        expected: impl Into<String>,
        actual: &serde_json::Value,
    ) -> Self {
        Self::InvalidOption {
            rule: rule.to_string(),
            expected: expected.into(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
