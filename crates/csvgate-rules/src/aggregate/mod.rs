//! Rules evaluated once over every value collected for a column.

mod counts;
mod statistics;
mod structure;

use crate::combo::Combo;
use crate::number::format_number;
use crate::registry::RuleRegistry;

/// A constraint checked against a whole column.
pub trait AggregateRule: Send + Sync {
    /// Returns the violation message, or `None` when the column conforms.
    fn validate(&self, values: &[String]) -> Option<String>;
}

pub(crate) fn register(registry: &mut RuleRegistry) {
    structure::register(registry);
    counts::register(registry);
    statistics::register(registry);
}

/// Computes the actual value of a combo aggregate.
///
/// `Ok(None)` means there is nothing to compare (no values), `Err` carries the
/// reason the value could not be computed.
pub(crate) type ColumnMeasure =
    Box<dyn Fn(&[String]) -> Result<Option<f64>, String> + Send + Sync>;

/// The one comparison rule behind every numeric aggregate family.
pub(crate) struct ComboAggregate {
    combo: Combo,
    label: String,
    expected: f64,
    measure: ColumnMeasure,
}

impl ComboAggregate {
    pub(crate) fn boxed(
        combo: Combo,
        label: impl Into<String>,
        expected: f64,
        measure: ColumnMeasure,
    ) -> Box<dyn AggregateRule> {
        Box::new(Self {
            combo,
            label: label.into(),
            expected,
            measure,
        })
    }
}

impl AggregateRule for ComboAggregate {
    fn validate(&self, values: &[String]) -> Option<String> {
        let actual = match (self.measure)(values) {
            Ok(Some(actual)) => actual,
            Ok(None) => return None,
            Err(reason) => {
                return Some(format!("Warning: unable to compute the {}: {reason}", self.label));
            }
        };
        if self.combo.compare(actual, self.expected) {
            return None;
        }
        Some(self.combo.message(
            &format!("{} in the column", self.label),
            &format_number(actual),
            &format_number(self.expected),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn column(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    #[test]
    fn sum_max_reports_actual_and_expected() {
        let rule = RuleRegistry::builtin()
            .aggregate_rule("sum_max", &json!(6))
            .unwrap();
        assert_eq!(
            rule.validate(&column(&["1", "2", "3", "4.5"])).as_deref(),
            Some("The sum of numbers in the column is \"10.5\", which is greater than the expected \"6\"")
        );
        assert_eq!(rule.validate(&column(&["1", "2", "3"])), None);
    }

    #[test]
    fn failed_computation_is_a_warning() {
        let rule = RuleRegistry::builtin()
            .aggregate_rule("geometric_mean", &json!(2))
            .unwrap();
        let message = rule.validate(&column(&["4", "-1"])).unwrap();
        assert!(message.starts_with("Warning: unable to compute the geometric mean"), "{message}");
    }
}
