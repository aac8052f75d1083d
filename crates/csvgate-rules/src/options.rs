//! Typed access to rule option values.

use serde_json::Value;

use crate::error::{Result, RuleError};
use crate::number::parse_number;

/// A rule name together with the option value it was declared with.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleArgs {
    pub name: String,
    pub options: Value,
}

impl RuleArgs {
    pub fn new(name: impl Into<String>, options: Value) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn bool(&self) -> Result<bool> {
        match &self.options {
            Value::Bool(flag) => Ok(*flag),
            Value::String(text) => match text.trim().to_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(true),
                "false" | "no" | "0" => Ok(false),
                _ => Err(self.invalid("a boolean")),
            },
            _ => Err(self.invalid("a boolean")),
        }
    }

    pub fn string(&self) -> Result<String> {
        scalar_text(&self.options).ok_or_else(|| self.invalid("a string"))
    }

    pub fn non_empty_string(&self) -> Result<String> {
        match self.string() {
            Ok(text) if !text.is_empty() => Ok(text),
            _ => Err(self.invalid("a non-empty string")),
        }
    }

    pub fn number(&self) -> Result<f64> {
        number_value(&self.options).ok_or_else(|| self.invalid("a number"))
    }

    pub fn string_list(&self) -> Result<Vec<String>> {
        let Value::Array(items) = &self.options else {
            return Err(self.invalid("a non-empty list of strings"));
        };
        if items.is_empty() {
            return Err(self.invalid("a non-empty list of strings"));
        }
        items
            .iter()
            .map(|item| scalar_text(item).ok_or_else(|| self.invalid("a list of strings")))
            .collect()
    }

    /// Positional arguments with an exact arity. `roles` names each slot in messages.
    pub fn positional(&self, roles: &[&str]) -> Result<&[Value]> {
        let expected = format!("a list of {} values [{}]", roles.len(), roles.join(", "));
        match &self.options {
            Value::Array(items) if items.len() == roles.len() => Ok(items.as_slice()),
            _ => Err(self.invalid(expected)),
        }
    }

    pub(crate) fn invalid(&self, expected: impl Into<String>) -> RuleError {
        RuleError::option(&self.name, expected, &self.options)
    }
}

/// Text of a scalar option value; numbers and booleans are stringified.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

/// Numeric option value; numeric strings are accepted.
pub fn number_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_number(text),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn positional_checks_arity() {
        let args = RuleArgs::new("percentile_max", json!([95]));
        let err = args.positional(&["percentile", "expected"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid option for rule \"percentile_max\": expected a list of 2 values [percentile, expected], got [95]"
        );
        let args = RuleArgs::new("percentile_max", json!([95, 10]));
        assert_eq!(args.positional(&["percentile", "expected"]).unwrap().len(), 2);
    }

    #[test]
    fn numbers_from_strings() {
        assert_eq!(RuleArgs::new("sum", json!("6")).number().unwrap(), 6.0);
        assert!(RuleArgs::new("sum", json!("six")).number().is_err());
    }

    #[test]
    fn string_lists_reject_nested_values() {
        assert!(RuleArgs::new("allow_values", json!(["a", 1, true])).string_list().is_ok());
        assert!(RuleArgs::new("allow_values", json!([["a"]])).string_list().is_err());
        assert!(RuleArgs::new("allow_values", json!([])).string_list().is_err());
    }
}
