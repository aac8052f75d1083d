//! Comparison modes shared by every combo rule family.
//!
//! A combo family only knows how to compute an actual value; the comparison,
//! the rule-name suffixes and the violation message all live here.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combo {
    Eq,
    Not,
    Min,
    Greater,
    Max,
    Less,
}

impl Combo {
    pub const ALL: [Combo; 6] = [
        Combo::Eq,
        Combo::Not,
        Combo::Min,
        Combo::Greater,
        Combo::Max,
        Combo::Less,
    ];

    /// Rule-name suffix for this mode (`""` for EQ).
    pub fn suffix(&self) -> &'static str {
        match self {
            Combo::Eq => "",
            Combo::Not => "_not",
            Combo::Min => "_min",
            Combo::Greater => "_greater",
            Combo::Max => "_max",
            Combo::Less => "_less",
        }
    }

    /// Full rule name for a family base name.
    pub fn rule_name(&self, base: &str) -> String {
        format!("{base}{}", self.suffix())
    }

    /// True when `actual` satisfies this mode against `expected`.
    pub fn compare(&self, actual: f64, expected: f64) -> bool {
        match self {
            Combo::Eq => actual == expected,
            Combo::Not => actual != expected,
            Combo::Min => actual >= expected,
            Combo::Greater => actual > expected,
            Combo::Max => actual <= expected,
            Combo::Less => actual < expected,
        }
    }

    /// Verb describing a failed comparison.
    pub fn verb(&self) -> &'static str {
        match self {
            Combo::Eq => "not equal",
            Combo::Not => "equal",
            Combo::Min => "less",
            Combo::Greater => "less and not equal",
            Combo::Max => "greater",
            Combo::Less => "greater and not equal",
        }
    }

    /// Shared violation message:
    /// `The <subject> is "<actual>", which is <verb> than the [not ]expected "<expected>"`.
    pub fn message(&self, subject: &str, actual: &str, expected: &str) -> String {
        let not = if *self == Combo::Not { "not " } else { "" };
        format!(
            "The {subject} is \"{actual}\", which is {} than the {not}expected \"{expected}\"",
            self.verb()
        )
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Combo::Eq => "eq",
            Combo::Not => "not",
            Combo::Min => "min",
            Combo::Greater => "greater",
            Combo::Max => "max",
            Combo::Less => "less",
        };
        f.write_str(label)
    }
}
