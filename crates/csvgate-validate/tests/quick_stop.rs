//! Quick mode must report a prefix of what a full run reports.

use std::fs;
use std::path::Path;

use csvgate_rules::RuleRegistry;
use csvgate_schema::{DocumentFormat, parse_schema};
use csvgate_validate::Validator;
use proptest::prelude::*;
use tempfile::TempDir;

const SCHEMA: &str = r#"
columns:
  - name: id
    rules:
      not_empty: true
      is_int: true
    aggregate_rules:
      is_unique: true
  - name: name
    rules:
      not_empty: true
      length_max: 3
"#;

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[0-9]{1,3}", "[a-z]{1,5}"]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn quick_run_is_a_prefix_of_full_run(rows in prop::collection::vec((cell(), cell()), 0..10)) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.csv");
        let mut content = String::from("id,name\n");
        for (id, name) in &rows {
            content.push_str(&format!("{id},{name}\n"));
        }
        fs::write(&path, content).unwrap();

        let schema = parse_schema(SCHEMA, DocumentFormat::Yaml, Path::new(".")).unwrap();
        let registry = RuleRegistry::builtin();
        let full = Validator::new(&schema, &registry).validate_file(&path).unwrap();
        let quick = Validator::new(&schema, &registry).quick(true).validate_file(&path).unwrap();

        prop_assert!(full.issues().starts_with(quick.issues()));
        prop_assert_eq!(full.is_empty(), quick.is_empty());
        prop_assert!(quick.len() <= full.len());
    }
}
