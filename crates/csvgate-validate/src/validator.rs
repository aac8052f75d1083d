//! The per-file validation pipeline.
//!
//! Stages run in a fixed order: file name, header, column presence, rows
//! (cell rules) and aggregates. Every stage contributes to one suite. In quick
//! mode the pipeline returns as soon as the suite is non-empty, so a quick
//! result is always a prefix of the full one.

use std::path::Path;
use std::time::Instant;

use csvgate_ingest::CsvSource;
use csvgate_model::{ColumnId, Issue, IssueSuite, Line, Schema};
use csvgate_rules::{AggregateRuleset, CellRuleset, RuleRegistry};
use tracing::{debug, info, info_span};

use crate::codes;
use crate::error::Result;
use crate::filename::filename_matches;

const HEADER_LINE: Line = Line::Number(1);

/// Validates CSV files against one resolved schema.
pub struct Validator<'a> {
    schema: &'a Schema,
    registry: &'a RuleRegistry,
    quick: bool,
}

/// A schema column matched to its position in the CSV.
struct Binding {
    schema_index: usize,
    csv_index: usize,
}

/// Rules of one bound column, plus the values buffered for its aggregates.
struct ColumnRules {
    csv_index: usize,
    cell: CellRuleset,
    aggregate: AggregateRuleset,
    buffer: Vec<String>,
}

impl<'a> Validator<'a> {
    pub fn new(schema: &'a Schema, registry: &'a RuleRegistry) -> Self {
        Self {
            schema,
            registry,
            quick: false,
        }
    }

    /// Stop at the first stage (or row) that reports anything.
    pub fn quick(mut self, quick: bool) -> Self {
        self.quick = quick;
        self
    }

    /// Open and validate one CSV file.
    pub fn validate_file(&self, path: &Path) -> Result<IssueSuite> {
        let _span = info_span!("validate", csv = %path.display(), schema = %self.schema.name).entered();
        let started = Instant::now();
        let mut source = CsvSource::open(path, &self.schema.csv)?;
        let suite = self.validate_source(&mut source)?;
        info!(
            issues = suite.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "file validated"
        );
        Ok(suite)
    }

    /// Validate an already opened source.
    pub fn validate_source(&self, source: &mut CsvSource) -> Result<IssueSuite> {
        let mut suite = IssueSuite::with_source(source.path().display().to_string());

        suite.merge(self.check_filename(source.path())?);
        if self.stop(&suite) {
            return Ok(suite);
        }

        if self.schema.csv.header {
            suite.merge(self.check_header());
            if self.stop(&suite) {
                return Ok(suite);
            }
        }

        let header = source.header().map(<[String]>::to_vec);
        let mut records = source.records().peekable();

        let bindings = match &header {
            Some(header) => {
                let (bindings, presence) = self.bind_by_name(header);
                suite.merge(presence);
                bindings
            }
            None => {
                let width = match records.peek() {
                    Some(Ok(record)) => Some((record.values.len(), record.line)),
                    _ => None,
                };
                suite.merge(self.check_column_count(width));
                self.bind_by_index()
            }
        };
        if self.stop(&suite) {
            return Ok(suite);
        }

        let mut columns = self.build_rules(&bindings)?;
        if columns.is_empty() {
            debug!("no column carries rules, rows are not read");
            return Ok(suite);
        }

        let mut rows = 0u64;
        for record in records {
            let record = record?;
            rows += 1;
            for column in &mut columns {
                let value = record.get(column.csv_index);
                suite.merge(column.cell.validate_cell(value, Line::Number(record.line)));
                if !column.aggregate.is_empty() {
                    column.buffer.push(value.to_string());
                }
            }
            if self.stop(&suite) {
                debug!(rows, "quick stop in row stage");
                return Ok(suite);
            }
        }
        debug!(rows, "row stage finished");

        for column in &columns {
            if column.aggregate.is_empty() {
                continue;
            }
            suite.merge(column.aggregate.validate_column(&column.buffer));
            if self.stop(&suite) {
                return Ok(suite);
            }
        }
        Ok(suite)
    }

    fn stop(&self, suite: &IssueSuite) -> bool {
        self.quick && !suite.is_empty()
    }

    fn check_filename(&self, path: &Path) -> Result<IssueSuite> {
        let pattern = &self.schema.filename_pattern;
        let mut suite = IssueSuite::new();
        if !filename_matches(pattern, path)? {
            suite.push(Issue::new(
                codes::FILENAME_PATTERN,
                format!(
                    "Filename \"{}\" does not match pattern: \"{pattern}\"",
                    path.display()
                ),
                "",
                Line::Undefined,
            ));
        }
        debug!(issues = suite.len(), "file stage");
        Ok(suite)
    }

    fn check_header(&self) -> IssueSuite {
        let suite: IssueSuite = self
            .schema
            .columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.name.trim().is_empty())
            .map(|(index, _)| {
                Issue::new(
                    codes::CSV_HEADER,
                    "Property \"name\" is not defined in schema, but the CSV has a header",
                    self.schema.column_id(index).to_string(),
                    Line::Undefined,
                )
            })
            .collect();
        debug!(issues = suite.len(), "header stage");
        suite
    }

    /// Match schema columns to header positions and report presence problems.
    fn bind_by_name(&self, header: &[String]) -> (Vec<Binding>, IssueSuite) {
        let mut suite = IssueSuite::new();
        let mut bindings = Vec::new();
        for (schema_index, column) in self.schema.columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                continue;
            }
            match header.iter().position(|name| *name == column.name) {
                Some(csv_index) => bindings.push(Binding {
                    schema_index,
                    csv_index,
                }),
                None if column.required => suite.push(Issue::new(
                    codes::REQUIRED,
                    format!("Required column \"{}\" not found in CSV", column.name),
                    self.schema.column_id(schema_index).to_string(),
                    HEADER_LINE,
                )),
                None => debug!(column = %column.name, "optional column absent"),
            }
        }

        let rules = &self.schema.structural_rules;
        if !rules.allow_extra_columns {
            for (csv_index, name) in header.iter().enumerate() {
                if !self.schema.columns.iter().any(|column| column.name == *name) {
                    suite.push(Issue::new(
                        codes::ALLOW_EXTRA_COLUMNS,
                        format!("Column \"{name}\" is not defined in schema"),
                        ColumnId::new(csv_index, name.as_str()).to_string(),
                        HEADER_LINE,
                    ));
                }
            }
        }

        if rules.strict_column_order && !bindings.is_sorted_by_key(|binding| binding.csv_index) {
            let expected: Vec<&str> = bindings
                .iter()
                .map(|binding| self.schema.columns[binding.schema_index].name.as_str())
                .collect();
            let mut actual = bindings.iter().collect::<Vec<_>>();
            actual.sort_by_key(|binding| binding.csv_index);
            let actual: Vec<&str> = actual
                .iter()
                .map(|binding| header[binding.csv_index].as_str())
                .collect();
            suite.push(Issue::new(
                codes::STRICT_COLUMN_ORDER,
                format!(
                    "Real columns order doesn't match schema. Expected: [{}]. Actual: [{}]",
                    quoted(&expected),
                    quoted(&actual)
                ),
                "",
                HEADER_LINE,
            ));
        }
        debug!(bound = bindings.len(), issues = suite.len(), "presence stage");
        (bindings, suite)
    }

    fn bind_by_index(&self) -> Vec<Binding> {
        (0..self.schema.columns.len())
            .map(|index| Binding {
                schema_index: index,
                csv_index: index,
            })
            .collect()
    }

    /// `width` is the column count and line of the first record, if any.
    fn check_column_count(&self, width: Option<(usize, u64)>) -> IssueSuite {
        let expected = self.schema.columns.len();
        let (actual, line) = width.map_or((0, Line::Undefined), |(count, line)| (count, Line::Number(line)));
        let mut suite = IssueSuite::new();
        if actual < expected {
            suite.push(Issue::new(
                codes::CSV_COLUMN_COUNT,
                format!("Schema number of columns \"{expected}\" greater than real \"{actual}\""),
                "",
                line,
            ));
        }
        suite
    }

    fn build_rules(&self, bindings: &[Binding]) -> Result<Vec<ColumnRules>> {
        let mut columns = Vec::new();
        for binding in bindings {
            let column = &self.schema.columns[binding.schema_index];
            if !column.has_rules() {
                continue;
            }
            let id = self.schema.column_id(binding.schema_index);
            columns.push(ColumnRules {
                csv_index: binding.csv_index,
                cell: CellRuleset::build(self.registry, &id, &column.rules)?,
                aggregate: AggregateRuleset::build(self.registry, &id, &column.aggregate_rules),
                buffer: Vec::new(),
            });
        }
        Ok(columns)
    }
}

fn quoted(names: &[&str]) -> String {
    names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_names() {
        assert_eq!(quoted(&["a", "b"]), "\"a\", \"b\"");
        assert_eq!(quoted(&[]), "");
    }
}
