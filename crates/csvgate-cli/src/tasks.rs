//! Operations executed by the task runner.
//!
//! Every operation receives plain string arguments and resolves what it needs
//! (schemas, registry) on its own worker.

use std::path::Path;

use csvgate_model::{Issue, IssueSuite, Line};
use csvgate_rules::RuleRegistry;
use csvgate_runner::OperationTable;
use csvgate_schema::load_schema;
use csvgate_validate::{Validator, lint_file};

pub const VALIDATE_CSV: &str = "validate-csv";
pub const VALIDATE_SCHEMA: &str = "validate-schema";

/// Code for issues describing a file that could not be processed at all.
pub const FAILURE_CODE: &str = "error";

pub fn operations() -> OperationTable<IssueSuite> {
    OperationTable::new()
        .register(VALIDATE_CSV, validate_csv_task)
        .register(VALIDATE_SCHEMA, validate_schema_task)
}

/// Warm the shared rule registry before a worker starts.
pub fn bootstrap() {
    let registry = RuleRegistry::shared();
    tracing::trace!(rules = registry.len(), "worker ready");
}

/// Arguments for [`VALIDATE_CSV`].
pub fn csv_args(csv: &Path, schema: &Path, quick: bool) -> Vec<String> {
    vec![
        csv.display().to_string(),
        schema.display().to_string(),
        quick.to_string(),
    ]
}

/// Task key of a (csv, schema) pair.
pub fn pair_key(csv: &Path, schema: &Path) -> String {
    format!("{} :: {}", csv.display(), schema.display())
}

/// A suite carrying one failure issue, for work that produced no report.
pub fn failure_suite(source: &str, message: impl Into<String>) -> IssueSuite {
    let mut suite = IssueSuite::with_source(source);
    suite.push(Issue::new(FAILURE_CODE, message, "", Line::Undefined));
    suite
}

fn validate_csv_task(args: &[String]) -> IssueSuite {
    let [csv, schema_path, quick] = args else {
        return failure_suite("", format!("{VALIDATE_CSV} expects [csv, schema, quick]"));
    };
    let quick = quick == "true";
    let schema = match load_schema(Path::new(schema_path)) {
        Ok(schema) => schema,
        Err(err) => return failure_suite(csv, format!("Schema \"{schema_path}\": {err}")),
    };
    let registry = RuleRegistry::shared();
    Validator::new(&schema, &registry)
        .quick(quick)
        .validate_file(Path::new(csv))
        .unwrap_or_else(|err| failure_suite(csv, err.to_string()))
}

fn validate_schema_task(args: &[String]) -> IssueSuite {
    let [schema_path] = args else {
        return failure_suite("", format!("{VALIDATE_SCHEMA} expects [schema]"));
    };
    let registry = RuleRegistry::shared();
    let (_, suite) = lint_file(Path::new(schema_path), &registry);
    suite
}
