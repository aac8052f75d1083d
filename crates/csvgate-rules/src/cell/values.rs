use regex::Regex;

use super::CellRule;
use crate::error::Result;
use crate::options::RuleArgs;
use crate::pattern::compile_pattern;
use crate::registry::RuleRegistry;

pub(super) fn register(registry: &mut RuleRegistry) {
    registry.register_cell(
        "not_empty",
        "Value is not an empty string. Actually checks if the string length is not 0.",
        "true",
        NotEmpty::build,
    );
    registry.register_cell(
        "exact_value",
        "Exact value for string in the column.",
        "Some string",
        ExactValue::build,
    );
    registry.register_cell(
        "allow_values",
        "Strict set of values that are allowed.",
        "[y, n, \"\"]",
        |args| AllowValues::build(args, true),
    );
    registry.register_cell(
        "not_allow_values",
        "Strict set of values that are NOT allowed.",
        "[invalid]",
        |args| AllowValues::build(args, false),
    );
    registry.register_cell(
        "regex",
        "Any valid regex pattern, bare or delimited like /^[\\d]{2}$/i.",
        "/^[\\d]{2}$/",
        RegexRule::build,
    );
    registry.register_cell(
        "contains",
        "Value must contain the string.",
        "Hello",
        |args| Affix::build(args, AffixKind::Contains),
    );
    registry.register_cell(
        "starts_with",
        "Value must start with the string.",
        "prefix ",
        |args| Affix::build(args, AffixKind::StartsWith),
    );
    registry.register_cell(
        "ends_with",
        "Value must end with the string.",
        " suffix",
        |args| Affix::build(args, AffixKind::EndsWith),
    );
    registry.register_cell(
        "contains_none",
        "Value must not contain any of the strings.",
        "[a, b]",
        |args| ContainsSet::build(args, ContainsMode::None),
    );
    registry.register_cell(
        "contains_one",
        "Value must contain exactly one of the strings.",
        "[a, b]",
        |args| ContainsSet::build(args, ContainsMode::One),
    );
    registry.register_cell(
        "contains_any",
        "Value must contain at least one of the strings.",
        "[a, b]",
        |args| ContainsSet::build(args, ContainsMode::Any),
    );
    registry.register_cell(
        "contains_all",
        "Value must contain all of the strings.",
        "[a, b]",
        |args| ContainsSet::build(args, ContainsMode::All),
    );
}

struct NotEmpty {
    enabled: bool,
}

impl NotEmpty {
    fn build(args: &RuleArgs) -> Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            enabled: args.bool()?,
        }))
    }
}

impl CellRule for NotEmpty {
    fn validate(&self, value: &str) -> Option<String> {
        if self.enabled && value.is_empty() {
            return Some("Value is empty".to_string());
        }
        None
    }
}

struct ExactValue {
    expected: String,
}

impl ExactValue {
    fn build(args: &RuleArgs) -> Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            expected: args.string()?,
        }))
    }
}

impl CellRule for ExactValue {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() || value == self.expected {
            return None;
        }
        Some(format!(
            "Value \"{value}\" is not strict equal to \"{}\"",
            self.expected
        ))
    }
}

struct AllowValues {
    values: Vec<String>,
    allow: bool,
}

impl AllowValues {
    fn build(args: &RuleArgs, allow: bool) -> Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            values: args.string_list()?,
            allow,
        }))
    }
}

impl CellRule for AllowValues {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let listed = self.values.iter().any(|allowed| allowed == value);
        match (self.allow, listed) {
            (true, false) => Some(format!(
                "Value \"{value}\" is not allowed. Allowed values: [\"{}\"]",
                self.values.join("\", \"")
            )),
            (false, true) => Some(format!(
                "Value \"{value}\" is not allowed. Not allowed values: [\"{}\"]",
                self.values.join("\", \"")
            )),
            _ => None,
        }
    }
}

struct RegexRule {
    source: String,
    regex: Regex,
}

impl RegexRule {
    fn build(args: &RuleArgs) -> Result<Box<dyn CellRule>> {
        let source = args.non_empty_string()?;
        let regex = compile_pattern(&source)?;
        Ok(Box::new(Self { source, regex }))
    }
}

impl CellRule for RegexRule {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() || self.regex.is_match(value) {
            return None;
        }
        Some(format!(
            "Value \"{value}\" does not match the pattern \"{}\"",
            self.source
        ))
    }
}

#[derive(Clone, Copy)]
enum AffixKind {
    Contains,
    StartsWith,
    EndsWith,
}

struct Affix {
    needle: String,
    kind: AffixKind,
}

impl Affix {
    fn build(args: &RuleArgs, kind: AffixKind) -> Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            needle: args.non_empty_string()?,
            kind,
        }))
    }
}

impl CellRule for Affix {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let (ok, verb) = match self.kind {
            AffixKind::Contains => (value.contains(&self.needle), "contain"),
            AffixKind::StartsWith => (value.starts_with(&self.needle), "start with"),
            AffixKind::EndsWith => (value.ends_with(&self.needle), "end with"),
        };
        if ok {
            return None;
        }
        Some(format!("Value \"{value}\" must {verb} \"{}\"", self.needle))
    }
}

#[derive(Clone, Copy)]
enum ContainsMode {
    None,
    One,
    Any,
    All,
}

struct ContainsSet {
    needles: Vec<String>,
    mode: ContainsMode,
}

impl ContainsSet {
    fn build(args: &RuleArgs, mode: ContainsMode) -> Result<Box<dyn CellRule>> {
        Ok(Box::new(Self {
            needles: args.string_list()?,
            mode,
        }))
    }
}

impl CellRule for ContainsSet {
    fn validate(&self, value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let found = self
            .needles
            .iter()
            .filter(|needle| value.contains(needle.as_str()))
            .count();
        let (ok, requirement) = match self.mode {
            ContainsMode::None => (found == 0, "must not contain any of"),
            ContainsMode::One => (found == 1, "must contain exactly one of"),
            ContainsMode::Any => (found > 0, "must contain at least one of"),
            ContainsMode::All => (found == self.needles.len(), "must contain all of"),
        };
        if ok {
            return None;
        }
        Some(format!(
            "Value \"{value}\" {requirement} [\"{}\"]",
            self.needles.join("\", \"")
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::registry::RuleRegistry;

    fn check(name: &str, options: serde_json::Value, value: &str) -> Option<String> {
        RuleRegistry::builtin()
            .cell_rule(name, &options)
            .unwrap()
            .validate(value)
    }

    #[test]
    fn not_empty_reports_empty_cells_only() {
        assert_eq!(check("not_empty", json!(true), "").as_deref(), Some("Value is empty"));
        assert_eq!(check("not_empty", json!(true), " "), None);
        assert_eq!(check("not_empty", json!(false), ""), None);
    }

    #[test]
    fn allow_values() {
        assert_eq!(check("allow_values", json!(["y", "n"]), "y"), None);
        assert_eq!(
            check("allow_values", json!(["y", "n"]), "maybe").as_deref(),
            Some("Value \"maybe\" is not allowed. Allowed values: [\"y\", \"n\"]")
        );
        assert!(check("not_allow_values", json!(["bad"]), "bad").is_some());
        assert_eq!(check("not_allow_values", json!(["bad"]), "good"), None);
    }

    #[test]
    fn regex_accepts_delimited_patterns() {
        assert_eq!(check("regex", json!("/^[a-z]+$/i"), "ABC"), None);
        assert!(check("regex", json!("^[a-z]+$"), "ABC").is_some());
    }

    #[test]
    fn contains_modes() {
        assert_eq!(check("contains_one", json!(["a", "b"]), "xax"), None);
        assert!(check("contains_one", json!(["a", "b"]), "ab").is_some());
        assert!(check("contains_all", json!(["a", "b"]), "a").is_some());
        assert_eq!(check("contains_any", json!(["a", "b"]), "b"), None);
        assert!(check("contains_none", json!(["a", "b"]), "cab").is_some());
        assert!(check("starts_with", json!("ID-"), "X-1").is_some());
        assert_eq!(check("ends_with", json!(".csv"), "a.csv"), None);
    }

    #[test]
    fn invalid_regex_is_an_authoring_error() {
        assert!(RuleRegistry::builtin().cell_rule("regex", &json!("([")).is_err());
    }
}
