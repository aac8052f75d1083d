//! Aggregate rules about the shape of a column rather than its numbers.

use std::cmp::Ordering;
use std::collections::HashMap;

use super::AggregateRule;
use super::counts::parse_position;
use crate::error::Result;
use crate::number::coerce_number;
use crate::options::{RuleArgs, scalar_text};
use crate::registry::RuleRegistry;

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_aggregate(
        "is_unique",
        "All values in the column are unique.",
        "true",
        IsUnique::build,
    );
    registry.register_aggregate(
        "sorted",
        "Column values are sorted. Options: [direction asc|desc, method natural|numeric|string].",
        "[\"asc\", \"natural\"]",
        Sorted::build,
    );
    registry.register_aggregate(
        "first",
        "The first value of the column is exactly the given string.",
        "Expected",
        |args| Positional::build(args, Position::First),
    );
    registry.register_aggregate(
        "last",
        "The last value of the column is exactly the given string.",
        "Expected",
        |args| Positional::build(args, Position::Last),
    );
    registry.register_aggregate(
        "nth",
        "The N-th value of the column is exactly the given string. Options: [position, value].",
        "[2, \"Expected\"]",
        Positional::build_nth,
    );
}

struct IsUnique {
    enabled: bool,
}

impl IsUnique {
    fn build(args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
        Ok(Box::new(Self {
            enabled: args.bool()?,
        }))
    }
}

impl AggregateRule for IsUnique {
    fn validate(&self, values: &[String]) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let mut duplicates = Vec::new();
        for value in values.iter().filter(|value| !value.is_empty()) {
            let count = seen.entry(value.as_str()).or_default();
            *count += 1;
            if *count == 2 {
                duplicates.push(format!("\"{value}\""));
            }
        }
        if duplicates.is_empty() {
            return None;
        }
        Some(format!(
            "Column has non-unique values. Unique: {}, total: {}. Duplicates: {}",
            seen.len(),
            seen.values().sum::<usize>(),
            duplicates.join(", ")
        ))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SortMethod {
    Natural,
    Numeric,
    Text,
}

struct Sorted {
    direction: Direction,
    method: SortMethod,
}

impl Sorted {
    fn build(args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
        let options = args.positional(&["direction", "method"])?;
        let text: Vec<String> = options
            .iter()
            .map(|option| scalar_text(option).unwrap_or_default().trim().to_lowercase())
            .collect();
        let direction = match text[0].as_str() {
            "asc" => Direction::Asc,
            "desc" => Direction::Desc,
            _ => return Err(args.invalid("a list of 2 values [direction, method] with direction \"asc\" or \"desc\"")),
        };
        let method = match text[1].as_str() {
            "natural" => SortMethod::Natural,
            "numeric" => SortMethod::Numeric,
            "string" => SortMethod::Text,
            _ => {
                return Err(args.invalid(
                    "a list of 2 values [direction, method] with method \"natural\", \"numeric\" or \"string\"",
                ));
            }
        };
        Ok(Box::new(Self { direction, method }))
    }

    fn compare(&self, left: &str, right: &str) -> Ordering {
        match self.method {
            SortMethod::Natural => natural_cmp(left, right),
            SortMethod::Numeric => coerce_number(left).total_cmp(&coerce_number(right)),
            SortMethod::Text => left.cmp(right),
        }
    }
}

impl AggregateRule for Sorted {
    fn validate(&self, values: &[String]) -> Option<String> {
        let (direction, broken) = match self.direction {
            Direction::Asc => ("ascending", Ordering::Greater),
            Direction::Desc => ("descending", Ordering::Less),
        };
        let method = match self.method {
            SortMethod::Natural => "natural",
            SortMethod::Numeric => "numeric",
            SortMethod::Text => "string",
        };
        let pair = values
            .windows(2)
            .position(|pair| self.compare(&pair[0], &pair[1]) == broken)?;
        Some(format!(
            "The column is not sorted in {direction} order using the {method} method. \
             Value \"{}\" at position {} comes before \"{}\"",
            values[pair],
            pair + 1,
            values[pair + 1]
        ))
    }
}

/// Natural ordering: digit runs compare by numeric value, everything else
/// compares case-insensitively.
fn natural_cmp(left: &str, right: &str) -> Ordering {
    let mut a = left.chars().peekable();
    let mut b = right.chars().peekable();
    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return left.cmp(right),
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) if x.is_ascii_digit() && y.is_ascii_digit() => {
                let x_run = take_digits(&mut a);
                let y_run = take_digits(&mut b);
                let x_trim = x_run.trim_start_matches('0');
                let y_trim = y_run.trim_start_matches('0');
                let ordering = x_trim
                    .len()
                    .cmp(&y_trim.len())
                    .then_with(|| x_trim.cmp(y_trim));
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
            (Some(x), Some(y)) => {
                let ordering = x.to_lowercase().cmp(y.to_lowercase());
                if ordering != Ordering::Equal {
                    return ordering;
                }
                a.next();
                b.next();
            }
        }
    }
}

fn take_digits(chars: &mut std::iter::Peekable<std::str::Chars<'_>>) -> String {
    let mut run = String::new();
    while let Some(c) = chars.next_if(char::is_ascii_digit) {
        run.push(c);
    }
    run
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Last,
    Nth(usize),
}

struct Positional {
    position: Position,
    expected: String,
}

impl Positional {
    fn build(args: &RuleArgs, position: Position) -> Result<Box<dyn AggregateRule>> {
        Ok(Box::new(Self {
            position,
            expected: args.string()?,
        }))
    }

    fn build_nth(args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
        let [position_option, value_option] = args.positional(&["position", "value"])? else {
            return Err(args.invalid("a list of 2 values [position, value]"));
        };
        let position = parse_position(args, position_option)?;
        let expected = scalar_text(value_option)
            .ok_or_else(|| args.invalid("a list of 2 values [position, value] with a scalar value"))?;
        Ok(Box::new(Self {
            position: Position::Nth(position),
            expected,
        }))
    }
}

impl AggregateRule for Positional {
    fn validate(&self, values: &[String]) -> Option<String> {
        if values.is_empty() {
            return None;
        }
        let (label, actual) = match self.position {
            Position::First => ("first value".to_string(), values.first()),
            Position::Last => ("last value".to_string(), values.last()),
            Position::Nth(n) => (format!("value at position {n}"), values.get(n - 1)),
        };
        let Some(actual) = actual else {
            return Some(format!(
                "The column has only {} values, so the {label} does not exist",
                values.len()
            ));
        };
        if *actual == self.expected {
            return None;
        }
        Some(format!(
            "The {label} in the column is \"{actual}\", which is not equal than the expected \"{}\"",
            self.expected
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn column(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn check(name: &str, options: Value, values: &[&str]) -> Option<String> {
        RuleRegistry::builtin()
            .aggregate_rule(name, &options)
            .unwrap()
            .validate(&column(values))
    }

    #[test]
    fn uniqueness_lists_duplicates() {
        assert_eq!(check("is_unique", json!(true), &["a", "b", "", ""]), None);
        assert_eq!(
            check("is_unique", json!(true), &["a", "b", "a", "a"]).as_deref(),
            Some("Column has non-unique values. Unique: 2, total: 4. Duplicates: \"a\"")
        );
        assert_eq!(check("is_unique", json!(false), &["a", "a"]), None);
    }

    #[test]
    fn natural_order_compares_digit_runs() {
        assert_eq!(natural_cmp("file2", "file10"), Ordering::Less);
        assert_eq!(natural_cmp("File10", "file9"), Ordering::Greater);
        assert_eq!(natural_cmp("a", "a"), Ordering::Equal);
    }

    #[test]
    fn sorted_by_method() {
        let values = ["item1", "item2", "item10"];
        assert_eq!(check("sorted", json!(["asc", "natural"]), &values), None);
        let message = check("sorted", json!(["asc", "string"]), &values).unwrap();
        assert!(message.contains("\"item2\" at position 2 comes before \"item10\""), "{message}");
        assert_eq!(check("sorted", json!(["desc", "numeric"]), &["10", "9", "9", "1"]), None);
    }

    #[test]
    fn sorted_rejects_unknown_method() {
        let err = RuleRegistry::builtin()
            .aggregate_rule("sorted", &json!(["asc", "random"]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("[direction, method]"), "{err}");
    }

    #[test]
    fn positional_values() {
        let values = ["a", "b", "c"];
        assert_eq!(check("first", json!("a"), &values), None);
        assert_eq!(check("last", json!("c"), &values), None);
        assert_eq!(check("nth", json!([2, "b"]), &values), None);
        assert_eq!(
            check("first", json!("b"), &values).as_deref(),
            Some("The first value in the column is \"a\", which is not equal than the expected \"b\"")
        );
        assert!(check("nth", json!([4, "d"]), &values).unwrap().contains("only 3 values"));
    }
}
