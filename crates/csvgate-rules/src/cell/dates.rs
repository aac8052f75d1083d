//! Date parsing and date rules.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use super::{CellRule, MeasureRule, register_flags};
use crate::combo::Combo;
use crate::error::Result;
use crate::options::RuleArgs;
use crate::registry::RuleRegistry;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%d.%m.%Y %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y", "%Y%m%d"];

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_cell(
        "date_format",
        "Check strict date format using chrono strftime syntax.",
        "%Y-%m-%d",
        DateFormat::build,
    );
    register_flags(
        registry,
        &[(
            "is_date",
            is_date,
            "a valid date",
            "Accepts RFC3339, \"YYYY-MM-DD\", \"YYYY-MM-DD HH:MM:SS\" and similar forms.",
        )],
    );
    registry.register_cell_combo(
        "date",
        "Compare the date with the expected one. Accepts absolute dates and now, today, yesterday, tomorrow.",
        "2000-01-02",
        DateCombo::build,
    );
    registry.register_cell_combo(
        "date_age",
        "Check the age of the date in full years (birthdays, expiry dates).",
        "18",
        |combo, args| MeasureRule::build(combo, args, "age", date_age),
    );
}

/// Parse a cell value as a date or datetime. Naive values are taken as UTC.
pub fn parse_date(value: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed);
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(parsed.and_utc().fixed_offset());
        }
    }
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(parsed.and_time(NaiveTime::MIN).and_utc().fixed_offset());
        }
    }
    None
}

/// Parse a date option: an absolute date or one of `now`, `today`, `yesterday`, `tomorrow`.
pub fn parse_date_expression(expression: &str, now: DateTime<Utc>) -> Option<DateTime<FixedOffset>> {
    let midnight = now.date_naive().and_time(NaiveTime::MIN).and_utc();
    match expression.trim().to_lowercase().as_str() {
        "now" => Some(now.fixed_offset()),
        "today" => Some(midnight.fixed_offset()),
        "yesterday" => Some((midnight - Duration::days(1)).fixed_offset()),
        "tomorrow" => Some((midnight + Duration::days(1)).fixed_offset()),
        _ => parse_date(expression),
    }
}

fn is_date(value: &str) -> bool {
    parse_date(value).is_some()
}

fn date_age(value: &str) -> std::result::Result<f64, String> {
    let date = parse_date(value)
        .ok_or_else(|| format!("Value \"{value}\" cannot be parsed as a date"))?
        .date_naive();
    let today = Utc::now().date_naive();
    let mut years = today.year() - date.year();
    if (today.month(), today.day()) < (date.month(), date.day()) {
        years -= 1;
    }
    Ok(f64::from(years))
}

struct DateFormat {
    format: String,
}

impl DateFormat {
    fn build(args: &RuleArgs) -> Result<Box<dyn CellRule>> {
        let format = args.non_empty_string()?;
        if StrftimeItems::new(&format).any(|item| matches!(item, Item::Error)) {
            return Err(args.invalid("a valid strftime format"));
        }
        Ok(Box::new(Self { format }))
    }

    fn matches(&self, value: &str) -> bool {
        DateTime::parse_from_str(value, &self.format).is_ok()
            || NaiveDateTime::parse_from_str(value, &self.format).is_ok()
            || NaiveDate::parse_from_str(value, &self.format).is_ok()
            || NaiveTime::parse_from_str(value, &self.format).is_ok()
    }
}

impl CellRule for DateFormat {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() || self.matches(value) {
            return None;
        }
        Some(format!(
            "Date format of value \"{value}\" is not valid. Expected format: \"{}\"",
            self.format
        ))
    }
}

struct DateCombo {
    combo: Combo,
    raw: String,
    expected: DateTime<FixedOffset>,
}

impl DateCombo {
    fn build(combo: Combo, args: &RuleArgs) -> Result<Box<dyn CellRule>> {
        let raw = args.non_empty_string()?;
        let expected = parse_date_expression(&raw, Utc::now())
            .ok_or_else(|| args.invalid("a date (e.g. 2024-01-31, now, today)"))?;
        Ok(Box::new(Self {
            combo,
            raw,
            expected,
        }))
    }
}

impl CellRule for DateCombo {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let Some(actual) = parse_date(value) else {
            return Some(format!("Value \"{value}\" cannot be parsed as a date"));
        };
        if self
            .combo
            .compare(actual.timestamp() as f64, self.expected.timestamp() as f64)
        {
            return None;
        }
        let not = if self.combo == Combo::Not { "not " } else { "" };
        Some(format!(
            "The date of the value \"{value}\" is parsed as \"{}\", which is {} than the {not}expected \"{} ({})\"",
            actual.to_rfc3339(),
            self.combo.verb(),
            self.expected.to_rfc3339(),
            self.raw,
        ))
    }
}
