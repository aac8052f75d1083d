//! Property tests for the comparison modes and the empty-cell convention.

use csvgate_rules::{Combo, RuleKind, RuleRegistry};
use proptest::prelude::*;
use serde_json::json;

fn combo_strategy() -> impl Strategy<Value = Combo> {
    prop::sample::select(Combo::ALL.to_vec())
}

proptest! {
    #[test]
    fn eq_and_not_are_complements(actual in -1e6f64..1e6, expected in -1e6f64..1e6) {
        prop_assert_ne!(
            Combo::Eq.compare(actual, expected),
            Combo::Not.compare(actual, expected)
        );
    }

    #[test]
    fn bounds_are_complements(actual in -1e6f64..1e6, expected in -1e6f64..1e6) {
        prop_assert_ne!(Combo::Min.compare(actual, expected), Combo::Less.compare(actual, expected));
        prop_assert_ne!(Combo::Max.compare(actual, expected), Combo::Greater.compare(actual, expected));
    }

    #[test]
    fn sum_rule_agrees_with_compare(
        combo in combo_strategy(),
        numbers in prop::collection::vec(-1000i64..1000, 1..20),
        expected in -5000i64..5000,
    ) {
        let name = combo.rule_name("sum");
        let rule = RuleRegistry::builtin().aggregate_rule(&name, &json!(expected)).unwrap();
        let values: Vec<String> = numbers.iter().map(ToString::to_string).collect();
        let total: i64 = numbers.iter().sum();
        let passes = combo.compare(total as f64, expected as f64);
        prop_assert_eq!(rule.validate(&values).is_none(), passes);
    }

    #[test]
    fn length_counts_characters(text in "\\PC{1,30}") {
        let chars = text.chars().count();
        let rule = RuleRegistry::builtin().cell_rule("length", &json!(chars)).unwrap();
        prop_assert_eq!(rule.validate(&text), None);
    }
}

#[test]
fn only_not_empty_reports_empty_cells() {
    let registry = RuleRegistry::builtin();
    let mut checked = 0;
    for spec in registry.iter().filter(|spec| spec.factory.kind() == RuleKind::Cell) {
        let options: serde_json::Value = serde_yaml::from_str(spec.example)
            .unwrap_or_else(|err| panic!("example of {} is not YAML: {err}", spec.name));
        let rule = registry
            .cell_rule(&spec.name, &options)
            .unwrap_or_else(|err| panic!("example of {} does not build: {err}", spec.name));
        let outcome = rule.validate("");
        if spec.name == "not_empty" {
            assert!(outcome.is_some());
        } else {
            assert_eq!(outcome, None, "{} reported an empty cell", spec.name);
        }
        checked += 1;
    }
    assert!(checked > 60, "only {checked} cell rules registered");
}
