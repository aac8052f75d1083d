//! Counting families and positional numbers.
//!
//! Counts are defined for an empty column (they are zero). Sign, parity and
//! prime counters skip cells that are not numbers. Positional numbers coerce
//! non-numeric cells to zero.

use std::collections::HashSet;

use serde_json::Value;

use super::{AggregateRule, ComboAggregate};
use crate::combo::Combo;
use crate::error::Result;
use crate::number::{coerce_number, parse_integer, parse_number};
use crate::options::{RuleArgs, number_value};
use crate::registry::RuleRegistry;
use crate::stats::is_prime;

type Counter = fn(&[String]) -> usize;

const COUNTERS: &[(&str, &str, &str, Counter)] = &[
    ("count", "number of rows", "Count of rows in the column, including empty ones.", count),
    ("count_empty", "number of empty values", "Count of empty cells.", count_empty),
    ("count_not_empty", "number of not empty values", "Count of non-empty cells.", count_not_empty),
    ("count_distinct", "number of distinct values", "Count of distinct non-empty values.", count_distinct),
    ("count_positive", "number of positive values", "Count of numbers greater than zero.", count_positive),
    ("count_negative", "number of negative values", "Count of numbers less than zero.", count_negative),
    ("count_zero", "number of zero values", "Count of numbers equal to zero.", count_zero),
    ("count_even", "number of even values", "Count of even integers.", count_even),
    ("count_odd", "number of odd values", "Count of odd integers.", count_odd),
    ("count_prime", "number of prime values", "Count of prime integers.", count_prime),
];

pub(super) fn register(registry: &mut RuleRegistry) {
    for &(base, label, help, counter) in COUNTERS {
        registry.register_aggregate_combo(base, help, "5", move |combo, args| {
            Ok(ComboAggregate::boxed(
                combo,
                label,
                args.number()?,
                Box::new(move |values: &[String]| Ok(Some(counter(values) as f64))),
            ))
        });
    }

    registry.register_aggregate_combo(
        "first_num",
        "The first value of the column as a number.",
        "1",
        |combo, args| {
            Ok(ComboAggregate::boxed(
                combo,
                "first value",
                args.number()?,
                Box::new(|values: &[String]| Ok(values.first().map(|value| coerce_number(value)))),
            ))
        },
    );
    registry.register_aggregate_combo(
        "last_num",
        "The last value of the column as a number.",
        "100",
        |combo, args| {
            Ok(ComboAggregate::boxed(
                combo,
                "last value",
                args.number()?,
                Box::new(|values: &[String]| Ok(values.last().map(|value| coerce_number(value)))),
            ))
        },
    );
    registry.register_aggregate_combo(
        "nth_num",
        "The N-th value of the column as a number. Options: [position, expected].",
        "[2, 42]",
        nth_num,
    );
}

fn numbers(values: &[String]) -> impl Iterator<Item = f64> + '_ {
    values.iter().filter_map(|value| parse_number(value))
}

fn integers(values: &[String]) -> impl Iterator<Item = i64> + '_ {
    values.iter().filter_map(|value| parse_integer(value))
}

fn count(values: &[String]) -> usize {
    values.len()
}

fn count_empty(values: &[String]) -> usize {
    values.iter().filter(|value| value.is_empty()).count()
}

fn count_not_empty(values: &[String]) -> usize {
    values.iter().filter(|value| !value.is_empty()).count()
}

fn count_distinct(values: &[String]) -> usize {
    values
        .iter()
        .filter(|value| !value.is_empty())
        .collect::<HashSet<_>>()
        .len()
}

fn count_positive(values: &[String]) -> usize {
    numbers(values).filter(|n| *n > 0.0).count()
}

fn count_negative(values: &[String]) -> usize {
    numbers(values).filter(|n| *n < 0.0).count()
}

fn count_zero(values: &[String]) -> usize {
    numbers(values).filter(|n| *n == 0.0).count()
}

fn count_even(values: &[String]) -> usize {
    integers(values).filter(|n| n % 2 == 0).count()
}

fn count_odd(values: &[String]) -> usize {
    integers(values).filter(|n| n % 2 != 0).count()
}

fn count_prime(values: &[String]) -> usize {
    integers(values).filter(|n| is_prime(*n)).count()
}

/// 1-based position option shared by `nth` and `nth_num`.
pub(super) fn parse_position(args: &RuleArgs, value: &Value) -> Result<usize> {
    number_value(value)
        .filter(|n| n.fract() == 0.0 && *n >= 1.0)
        .map(|n| n as usize)
        .ok_or_else(|| args.invalid("a list of 2 values [position, expected] with a positive integer position"))
}

fn nth_num(combo: Combo, args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
    let [position_option, expected_option] = args.positional(&["position", "expected"])? else {
        return Err(args.invalid("a list of 2 values [position, expected]"));
    };
    let position = parse_position(args, position_option)?;
    let expected = number_value(expected_option)
        .ok_or_else(|| args.invalid("a list of 2 values [position, expected] with a numeric expected value"))?;
    Ok(ComboAggregate::boxed(
        combo,
        format!("value at position {position}"),
        expected,
        Box::new(move |values: &[String]| {
            if values.is_empty() {
                return Ok(None);
            }
            values
                .get(position - 1)
                .map(|value| Some(coerce_number(value)))
                .ok_or_else(|| format!("the column has only {} values", values.len()))
        }),
    ))
}
