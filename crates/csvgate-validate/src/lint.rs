//! Schema lint: authoring problems reported as issues instead of errors, so
//! every problem in a schema shows up in one run.

use std::collections::HashMap;
use std::path::Path;

use csvgate_model::{Issue, IssueSuite, Line, Schema};
use csvgate_rules::{AGGREGATE_PREFIX, RuleRegistry, compile_pattern};
use csvgate_schema::load_schema;
use tracing::debug;

use crate::codes;

/// Load a schema file and lint it. Load failures become a single `schema` issue.
pub fn lint_file(path: &Path, registry: &RuleRegistry) -> (Option<Schema>, IssueSuite) {
    let label = path.display().to_string();
    match load_schema(path) {
        Ok(schema) => {
            let mut suite = IssueSuite::with_source(label);
            suite.merge(lint_schema(&schema, registry));
            (Some(schema), suite)
        }
        Err(err) => {
            let mut suite = IssueSuite::with_source(label);
            suite.push(Issue::new(codes::SCHEMA, err.to_string(), "", Line::Undefined));
            (None, suite)
        }
    }
}

/// Lint a resolved schema.
pub fn lint_schema(schema: &Schema, registry: &RuleRegistry) -> IssueSuite {
    let mut suite = IssueSuite::new();

    if let Err(err) = compile_pattern(&schema.filename_pattern) {
        suite.push(Issue::new(codes::FILENAME_PATTERN, err.to_string(), "", Line::Undefined));
    }

    if schema.csv.header {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for (index, column) in schema.columns.iter().enumerate() {
            let id = schema.column_id(index).to_string();
            let name = column.name.trim();
            if name.is_empty() {
                suite.push(Issue::new(
                    codes::CSV_HEADER,
                    "Property \"name\" is required when the CSV has a header",
                    id,
                    Line::Undefined,
                ));
                continue;
            }
            if let Some(first) = seen.insert(name, index) {
                suite.push(Issue::new(
                    codes::CSV_HEADER,
                    format!("Column name \"{name}\" is already used by column {first}"),
                    id,
                    Line::Undefined,
                ));
            }
        }
    }

    for (index, column) in schema.columns.iter().enumerate() {
        let id = schema.column_id(index).to_string();
        let example = column.example_text();
        for (name, options) in &column.rules {
            let code = RuleRegistry::canonical_name(name);
            match registry.cell_rule(name, options) {
                Ok(rule) => {
                    let message = example.as_deref().and_then(|value| rule.validate(value));
                    if let Some(message) = message {
                        suite.push(Issue::new(code, format!("Example: {message}"), id.clone(), Line::Undefined));
                    }
                }
                Err(err) => suite.push(Issue::new(code, err.to_string(), id.clone(), Line::Undefined)),
            }
        }
        for (name, options) in &column.aggregate_rules {
            if let Err(err) = registry.aggregate_rule(name, options) {
                let code = format!("{AGGREGATE_PREFIX}{}", RuleRegistry::canonical_name(name));
                suite.push(Issue::new(code, err.to_string(), id.clone(), Line::Undefined));
            }
        }
    }
    debug!(schema = %schema.name, issues = suite.len(), "schema linted");
    suite
}

#[cfg(test)]
mod tests {
    use csvgate_model::Column;
    use serde_json::json;

    use super::*;

    fn column(name: &str, rules: serde_json::Value) -> Column {
        Column {
            rules: rules.as_object().cloned().unwrap_or_default(),
            ..Column::named(name)
        }
    }

    #[test]
    fn clean_schema_has_no_issues() {
        let schema = Schema {
            columns: vec![column("id", json!({"is_int": true}))],
            ..Schema::default()
        };
        assert!(lint_schema(&schema, &RuleRegistry::builtin()).is_empty());
    }

    #[test]
    fn duplicate_and_missing_names() {
        let schema = Schema {
            columns: vec![Column::named("id"), Column::named(""), Column::named("id")],
            ..Schema::default()
        };
        let suite = lint_schema(&schema, &RuleRegistry::builtin());
        let columns: Vec<_> = suite.iter().map(|issue| (issue.code.as_str(), issue.column.as_str())).collect();
        assert_eq!(columns, [("csv.header", "1"), ("csv.header", "2:id")]);
    }

    #[test]
    fn unknown_rules_and_bad_options() {
        let mut bad = column("amount", json!({"no_such_rule": true}));
        bad.aggregate_rules = json!({"percentile": 5}).as_object().cloned().unwrap_or_default();
        let schema = Schema {
            columns: vec![bad],
            ..Schema::default()
        };
        let suite = lint_schema(&schema, &RuleRegistry::builtin());
        let codes: Vec<_> = suite.iter().map(|issue| issue.code.as_str()).collect();
        assert_eq!(codes, ["no_such_rule", "ag:percentile"]);
    }

    #[test]
    fn example_is_checked_against_cell_rules() {
        let mut id = column("id", json!({"is_int": true, "num_max": 10}));
        id.example = Some(json!(42));
        let schema = Schema {
            columns: vec![id],
            ..Schema::default()
        };
        let suite = lint_schema(&schema, &RuleRegistry::builtin());
        assert_eq!(suite.len(), 1);
        let issue = &suite.issues()[0];
        assert_eq!(issue.code, "num_max");
        assert!(issue.message.starts_with("Example: "), "{}", issue.message);
    }

    #[test]
    fn invalid_filename_pattern() {
        let schema = Schema {
            filename_pattern: "/[a-/".to_string(),
            ..Schema::default()
        };
        let suite = lint_schema(&schema, &RuleRegistry::builtin());
        assert_eq!(suite.issues()[0].code, "filename_pattern");
    }
}
