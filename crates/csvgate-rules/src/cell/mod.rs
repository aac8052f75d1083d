//! Rules evaluated independently for every cell of a column.
//!
//! Convention: an empty cell is never a violation, except for rules that are
//! about emptiness itself (`not_empty`).

mod dates;
mod formats;
mod text;
mod values;

pub use dates::{parse_date, parse_date_expression};

use crate::combo::Combo;
use crate::number::format_number;
use crate::options::RuleArgs;
use crate::registry::RuleRegistry;

/// A constraint checked against one cell value.
pub trait CellRule: Send + Sync {
    /// Returns the violation message, or `None` when the value conforms.
    fn validate(&self, value: &str) -> Option<String>;
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    values::register(registry);
    text::register(registry);
    formats::register(registry);
    dates::register(registry);
}

/// Computes a measure of a single cell, e.g. its length.
pub(crate) type CellMeasure = fn(&str) -> Result<f64, String>;

/// A combo rule over a per-cell measure.
pub(crate) struct MeasureRule {
    combo: Combo,
    subject: &'static str,
    expected: f64,
    measure: CellMeasure,
}

impl MeasureRule {
    pub(crate) fn build(
        combo: Combo,
        args: &RuleArgs,
        subject: &'static str,
        measure: CellMeasure,
    ) -> crate::Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            combo,
            subject,
            expected: args.number()?,
            measure,
        }))
    }
}

impl CellRule for MeasureRule {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let actual = match (self.measure)(value) {
            Ok(actual) => actual,
            Err(reason) => return Some(reason),
        };
        if self.combo.compare(actual, self.expected) {
            return None;
        }
        Some(self.combo.message(
            &format!("{} of the value \"{value}\"", self.subject),
            &format_number(actual),
            &format_number(self.expected),
        ))
    }
}

/// A boolean-toggled check; disabled (`false`) rules never report.
pub(crate) struct FlagRule {
    enabled: bool,
    check: fn(&str) -> bool,
    what: &'static str,
}

impl FlagRule {
    pub(crate) fn build(
        args: &RuleArgs,
        check: fn(&str) -> bool,
        what: &'static str,
    ) -> crate::Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            enabled: args.bool()?,
            check,
            what,
        }))
    }
}

impl CellRule for FlagRule {
    fn validate(&self, value: &str) -> Option<String> {
        if !self.enabled || value.is_empty() || (self.check)(value) {
            return None;
        }
        Some(format!("Value \"{value}\" is not {}", self.what))
    }
}

/// Register a table of boolean format checks.
pub(crate) fn register_flags(
    registry: &mut RuleRegistry,
    flags: &[(&'static str, fn(&str) -> bool, &'static str, &'static str)],
) {
    for &(name, check, what, help) in flags {
        registry.register_cell(name, help, "true", move |args| {
            FlagRule::build(args, check, what)
        });
    }
}
