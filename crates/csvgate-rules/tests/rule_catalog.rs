//! Scenario tests over the built-in rule catalog.

use csvgate_rules::{AggregateRuleset, CellRuleset, RuleError, RuleKind, RuleRegistry};
use csvgate_model::{ColumnId, Line, RuleMap};
use serde_json::{Value, json};

fn rules(value: Value) -> RuleMap {
    value.as_object().cloned().unwrap_or_default()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

// =========================================================================
// Registry
// =========================================================================

#[test]
fn every_combo_family_has_six_names() {
    let registry = RuleRegistry::builtin();
    for base in ["length", "word_count", "num", "precision", "date", "date_age"] {
        for suffix in ["", "_not", "_min", "_greater", "_max", "_less"] {
            let name = format!("{base}{suffix}");
            assert_eq!(registry.get(&name).map(|spec| spec.factory.kind()), Some(RuleKind::Cell), "{name}");
        }
    }
    for base in ["count", "count_prime", "first_num", "nth_num", "average", "percentile", "quartiles"] {
        for suffix in ["", "_not", "_min", "_greater", "_max", "_less"] {
            let name = format!("{base}{suffix}");
            assert_eq!(
                registry.get(&name).map(|spec| spec.factory.kind()),
                Some(RuleKind::Aggregate),
                "{name}"
            );
        }
    }
}

#[test]
fn every_rule_documents_itself() {
    for spec in RuleRegistry::builtin().iter() {
        assert!(!spec.help.is_empty(), "{} has no help", spec.name);
        assert!(!spec.example.is_empty(), "{} has no example", spec.name);
    }
}

#[test]
fn kebab_case_and_aliases_resolve() {
    let registry = RuleRegistry::builtin();
    assert!(registry.contains("not-empty"));
    assert!(registry.contains("max_date"));
    assert!(registry.contains("date-max"));
}

// =========================================================================
// Scenarios
// =========================================================================

#[test]
fn min_date_scenario() {
    let registry = RuleRegistry::builtin();
    let set = CellRuleset::build(&registry, &ColumnId::new(0, "birthday"), &rules(json!({"min_date": "1955-05-15"})))
        .unwrap();
    let suite = set.validate_cell("1955-05-14", Line::Number(2));
    assert_eq!(suite.len(), 1);
    let issue = &suite.issues()[0];
    assert_eq!(issue.code, "date_min");
    assert_eq!(
        issue.message,
        "The date of the value \"1955-05-14\" is parsed as \"1955-05-14T00:00:00+00:00\", \
         which is less than the expected \"1955-05-15T00:00:00+00:00 (1955-05-15)\""
    );
}

#[test]
fn sum_max_scenario() {
    let registry = RuleRegistry::builtin();
    let set = AggregateRuleset::build(&registry, &ColumnId::new(1, "amount"), &rules(json!({"sum_max": 6})));
    let suite = set.validate_column(&strings(&["1", "2", "3", "4.5"]));
    assert_eq!(suite.len(), 1);
    assert_eq!(
        suite.issues()[0].to_string(),
        "\"ag:sum_max\" at line undefined, column \"1:amount\". \
         The sum of numbers in the column is \"10.5\", which is greater than the expected \"6\"."
    );
}

#[test]
fn cell_rules_run_in_declaration_order() {
    let registry = RuleRegistry::builtin();
    let set = CellRuleset::build(
        &registry,
        &ColumnId::new(0, "code"),
        &rules(json!({"is_uppercase": true, "length": 2, "allow_values": ["AA", "BB"]})),
    )
    .unwrap();
    let codes: Vec<_> = set
        .validate_cell("abc", Line::Number(4))
        .iter()
        .map(|issue| issue.code.clone())
        .collect();
    assert_eq!(codes, ["is_uppercase", "length", "allow_values"]);
}

#[test]
fn bad_cell_option_is_an_authoring_error() {
    let registry = RuleRegistry::builtin();
    let result = CellRuleset::build(&registry, &ColumnId::new(0, "x"), &rules(json!({"length_max": "many"})));
    let Err(RuleError::InvalidOption { rule, .. }) = result else {
        panic!("expected an option error");
    };
    assert_eq!(rule, "length_max");
}

#[test]
fn aggregate_used_as_cell_rule_is_rejected() {
    let registry = RuleRegistry::builtin();
    let result = CellRuleset::build(&registry, &ColumnId::new(0, "x"), &rules(json!({"is_unique": true})));
    assert!(matches!(result, Err(RuleError::WrongKind { .. })));
}
