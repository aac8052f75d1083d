//! Per-column rule sets built from resolved rule maps.

use csvgate_model::{ColumnId, Issue, IssueSuite, Line, RuleMap};
use tracing::debug;

use crate::aggregate::AggregateRule;
use crate::cell::CellRule;
use crate::error::{Result, RuleError};
use crate::registry::RuleRegistry;

/// Prefix for aggregate rule codes.
pub const AGGREGATE_PREFIX: &str = "ag:";

/// Cell rules of one column, in declaration order.
pub struct CellRuleset {
    column: String,
    rules: Vec<(String, Box<dyn CellRule>)>,
}

impl CellRuleset {
    /// Instantiate every rule. The first unknown rule or malformed option aborts.
    pub fn build(registry: &RuleRegistry, column: &ColumnId, rules: &RuleMap) -> Result<Self> {
        let rules = rules
            .iter()
            .map(|(name, options)| {
                let rule = registry.cell_rule(name, options)?;
                Ok((RuleRegistry::canonical_name(name), rule))
            })
            .collect::<Result<Vec<_>>>()?;
        debug!(column = %column, rules = rules.len(), "cell ruleset ready");
        Ok(Self {
            column: column.to_string(),
            rules,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check one cell against every rule.
    pub fn validate_cell(&self, value: &str, line: Line) -> IssueSuite {
        self.rules
            .iter()
            .filter_map(|(code, rule)| {
                rule.validate(value)
                    .map(|message| Issue::new(code.clone(), message, self.column.clone(), line))
            })
            .collect()
    }
}

/// Aggregate rules of one column.
///
/// A rule that failed to build is kept and reported in-band when the column
/// is validated, so one bad option does not hide the column's other results.
pub struct AggregateRuleset {
    column: String,
    rules: Vec<(String, std::result::Result<Box<dyn AggregateRule>, RuleError>)>,
}

impl AggregateRuleset {
    pub fn build(registry: &RuleRegistry, column: &ColumnId, rules: &RuleMap) -> Self {
        let rules: Vec<_> = rules
            .iter()
            .map(|(name, options)| {
                let code = format!("{AGGREGATE_PREFIX}{}", RuleRegistry::canonical_name(name));
                (code, registry.aggregate_rule(name, options))
            })
            .collect();
        debug!(column = %column, rules = rules.len(), "aggregate ruleset ready");
        Self {
            column: column.to_string(),
            rules,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check the collected column values against every rule.
    pub fn validate_column(&self, values: &[String]) -> IssueSuite {
        let mut suite = IssueSuite::new();
        for (code, rule) in &self.rules {
            let message = match rule {
                Ok(rule) => rule.validate(values),
                Err(err) => Some(format!("Unexpected error: {err}")),
            };
            if let Some(message) = message {
                suite.push(Issue::new(code.clone(), message, self.column.clone(), Line::Undefined));
            }
        }
        suite
    }
}
