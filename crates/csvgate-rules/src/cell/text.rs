use super::{MeasureRule, register_flags};
use crate::number::parse_number;
use crate::registry::RuleRegistry;

pub(super) fn register(registry: &mut RuleRegistry) {
    register_flags(
        registry,
        &[
            (
                "is_trimmed",
                is_trimmed,
                "trimmed (no leading or trailing whitespace)",
                "Only trimmed strings. Example: \"Hello World\" (not \" Hello World \").",
            ),
            (
                "is_lowercase",
                is_lowercase,
                "lowercase",
                "String is only lower-case. Example: \"hello world\".",
            ),
            (
                "is_uppercase",
                is_uppercase,
                "uppercase",
                "String is only upper-case. Example: \"HELLO WORLD\".",
            ),
            (
                "is_capitalize",
                is_capitalize,
                "capitalized (every word starts with an upper-case letter)",
                "String is only capitalized. Example: \"Hello World\".",
            ),
            (
                "is_sentence",
                is_sentence,
                "a sentence (starts with an upper-case letter)",
                "Sentence with at least one space. Example: \"Hello world\".",
            ),
        ],
    );

    registry.register_cell_combo(
        "length",
        "Length of the string in characters.",
        "5",
        |combo, args| MeasureRule::build(combo, args, "length", length),
    );
    registry.register_cell_combo(
        "word_count",
        "Count of whitespace-separated words in the string.",
        "5",
        |combo, args| MeasureRule::build(combo, args, "word count", word_count),
    );
    registry.register_cell_combo(
        "num",
        "The value is a number and is compared with the expected number.",
        "42",
        |combo, args| MeasureRule::build(combo, args, "number", number),
    );
    registry.register_cell_combo(
        "precision",
        "Number of digits after the decimal point (with zeros).",
        "2",
        |combo, args| MeasureRule::build(combo, args, "precision", precision),
    );
}

fn is_trimmed(value: &str) -> bool {
    value.trim() == value
}

fn is_lowercase(value: &str) -> bool {
    value.to_lowercase() == value
}

fn is_uppercase(value: &str) -> bool {
    value.to_uppercase() == value
}

fn is_capitalize(value: &str) -> bool {
    value.split_whitespace().all(|word| {
        word.chars()
            .next()
            .is_none_or(|first| !first.is_alphabetic() || first.is_uppercase())
    })
}

fn is_sentence(value: &str) -> bool {
    value
        .trim_start()
        .chars()
        .next()
        .is_some_and(|first| !first.is_alphabetic() || first.is_uppercase())
}

fn length(value: &str) -> Result<f64, String> {
    Ok(value.chars().count() as f64)
}

fn word_count(value: &str) -> Result<f64, String> {
    Ok(value.split_whitespace().count() as f64)
}

fn number(value: &str) -> Result<f64, String> {
    parse_number(value).ok_or_else(|| format!("Value \"{value}\" is not a valid number"))
}

fn precision(value: &str) -> Result<f64, String> {
    if parse_number(value).is_none() {
        return Err(format!("Value \"{value}\" is not a valid number"));
    }
    let trimmed = value.trim();
    let mantissa = trimmed
        .split(['e', 'E'])
        .next()
        .unwrap_or(trimmed);
    Ok(mantissa
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.chars().count()) as f64)
}
