//! Descriptive statistics over a column.
//!
//! Empty cells are dropped and an empty column is never a violation.
//! Remaining non-numeric cells count as zero.

use serde_json::Value;

use super::{AggregateRule, ComboAggregate};
use crate::combo::Combo;
use crate::error::Result;
use crate::number::coerce_number;
use crate::options::{RuleArgs, number_value, scalar_text};
use crate::registry::RuleRegistry;
use crate::stats::{self, QuartileMethod, StatResult};

type Statistic = fn(&[f64]) -> StatResult;

const STATISTICS: &[(&str, &str, &str, Statistic)] = &[
    ("sum", "sum of numbers", "Sum of the numbers in the column.", sum),
    ("average", "average", "Arithmetic mean.", stats::mean),
    ("min", "minimum", "Smallest number.", stats::min),
    ("max", "maximum", "Largest number.", stats::max),
    ("median", "median", "Middle value of the sorted numbers.", stats::median),
    ("mode", "mode", "Most frequent number (smallest one on ties).", stats::mode),
    ("midhinge", "midhinge", "Average of the first and third quartiles.", stats::midhinge),
    ("mean_abs_dev", "mean absolute deviation", "Average distance from the mean.", stats::mean_abs_dev),
    ("median_abs_dev", "median absolute deviation", "Median distance from the median.", stats::median_abs_dev),
    ("population_variance", "population variance", "Variance of the whole population.", stats::population_variance),
    ("sample_variance", "sample variance", "Variance of a sample (needs at least two values).", stats::sample_variance),
    ("stddev", "standard deviation (SD)", "Sample standard deviation.", stats::stddev),
    ("stddev_pop", "population standard deviation (SD)", "Population standard deviation.", stats::stddev_pop),
    ("coef_of_var", "coefficient of variation", "Standard deviation divided by the mean.", stats::coef_of_var),
    ("interquartile_mean", "interquartile mean (IQM)", "Mean of the values between the first and third quartiles.", stats::interquartile_mean),
    ("trimean", "trimean", "Weighted average of the median and the two quartiles.", stats::trimean),
    ("cubic_mean", "cubic mean", "Cube root of the mean of cubes.", stats::cubic_mean),
    ("geometric_mean", "geometric mean", "N-th root of the product (positive numbers only).", stats::geometric_mean),
    ("harmonic_mean", "harmonic mean", "Reciprocal of the mean of reciprocals (positive numbers only).", stats::harmonic_mean),
    ("root_mean_square", "root mean square (quadratic mean)", "Square root of the mean of squares.", stats::root_mean_square),
    ("contraharmonic_mean", "contraharmonic mean", "Sum of squares divided by the sum.", stats::contraharmonic_mean),
];

pub(super) fn register(registry: &mut RuleRegistry) {
    for &(base, label, help, statistic) in STATISTICS {
        registry.register_aggregate_combo(base, help, "42", move |combo, args| {
            Ok(ComboAggregate::boxed(
                combo,
                label,
                args.number()?,
                Box::new(move |values: &[String]| over_numbers(values, statistic)),
            ))
        });
    }
    registry.register_aggregate_combo(
        "percentile",
        "The P-th percentile with linear interpolation. Options: [percentile 0..100, expected].",
        "[95.0, 42]",
        percentile,
    );
    registry.register_aggregate_combo(
        "quartiles",
        "A quartile or the interquartile range. Options: [method exclusive|inclusive, type 0%|Q1|Q2|Q3|100%|IQR, expected].",
        "[\"exclusive\", \"Q3\", 42]",
        quartiles,
    );
}

fn sum(values: &[f64]) -> StatResult {
    Ok(stats::sum(values))
}

/// Column values as numbers, with empty cells dropped.
pub(crate) fn column_numbers(values: &[String]) -> Vec<f64> {
    values
        .iter()
        .filter(|value| !value.is_empty())
        .map(|value| coerce_number(value))
        .collect()
}

fn over_numbers(
    values: &[String],
    statistic: impl Fn(&[f64]) -> StatResult,
) -> std::result::Result<Option<f64>, String> {
    let numbers = column_numbers(values);
    if numbers.is_empty() {
        return Ok(None);
    }
    statistic(&numbers).map(Some)
}

fn expected_number(args: &RuleArgs, value: &Value, shape: &str) -> Result<f64> {
    number_value(value).ok_or_else(|| args.invalid(format!("{shape} with a numeric expected value")))
}

fn percentile(combo: Combo, args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
    const SHAPE: &str = "a list of 2 values [percentile, expected]";
    let [percentile_option, expected_option] = args.positional(&["percentile", "expected"])? else {
        return Err(args.invalid(SHAPE));
    };
    let percentile = number_value(percentile_option)
        .filter(|p| (0.0..=100.0).contains(p))
        .ok_or_else(|| args.invalid(format!("{SHAPE} with a percentile between 0 and 100")))?;
    let expected = expected_number(args, expected_option, SHAPE)?;
    Ok(ComboAggregate::boxed(
        combo,
        format!("{percentile}-th percentile"),
        expected,
        Box::new(move |values: &[String]| {
            over_numbers(values, |numbers| stats::percentile(numbers, percentile))
        }),
    ))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuartileType {
    Min,
    Q1,
    Q2,
    Q3,
    Max,
    Iqr,
}

impl QuartileType {
    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_uppercase().as_str() {
            "0%" => Some(Self::Min),
            "Q1" => Some(Self::Q1),
            "Q2" => Some(Self::Q2),
            "Q3" => Some(Self::Q3),
            "100%" => Some(Self::Max),
            "IQR" => Some(Self::Iqr),
            _ => None,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Min => "0% (smallest value)",
            Self::Q1 => "Q1 (first quartile)",
            Self::Q2 => "Q2 (median)",
            Self::Q3 => "Q3 (third quartile)",
            Self::Max => "100% (largest value)",
            Self::Iqr => "IQR (interquartile range)",
        }
    }
}

fn quartiles(combo: Combo, args: &RuleArgs) -> Result<Box<dyn AggregateRule>> {
    const SHAPE: &str = "a list of 3 values [method, type, expected]";
    let [method_option, type_option, expected_option] =
        args.positional(&["method", "type", "expected"])?
    else {
        return Err(args.invalid(SHAPE));
    };
    let method = match scalar_text(method_option).as_deref().map(str::trim) {
        Some("exclusive") => QuartileMethod::Exclusive,
        Some("inclusive") => QuartileMethod::Inclusive,
        _ => return Err(args.invalid(format!("{SHAPE} with method \"exclusive\" or \"inclusive\""))),
    };
    let kind = scalar_text(type_option)
        .as_deref()
        .and_then(QuartileType::parse)
        .ok_or_else(|| args.invalid(format!("{SHAPE} with type one of 0%, Q1, Q2, Q3, 100%, IQR")))?;
    let expected = expected_number(args, expected_option, SHAPE)?;
    let method_label = match method {
        QuartileMethod::Exclusive => "exclusive",
        QuartileMethod::Inclusive => "inclusive",
    };
    Ok(ComboAggregate::boxed(
        combo,
        format!("quartile {} ({method_label} method)", kind.label()),
        expected,
        Box::new(move |values: &[String]| {
            over_numbers(values, |numbers| {
                let quartiles = stats::quartiles(numbers, method)?;
                Ok(match kind {
                    QuartileType::Min => quartiles.q0,
                    QuartileType::Q1 => quartiles.q1,
                    QuartileType::Q2 => quartiles.q2,
                    QuartileType::Q3 => quartiles.q3,
                    QuartileType::Max => quartiles.q4,
                    QuartileType::Iqr => quartiles.iqr(),
                })
            })
        }),
    ))
}
