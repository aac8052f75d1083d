//! Matching CSV files to the schemas that should validate them.

use std::path::{Path, PathBuf};

use csvgate_schema::load_schema;
use csvgate_validate::filename_matches;
use tracing::{debug, warn};

/// A schema file together with its resolved `filename_pattern`.
///
/// `pattern` is `None` when the schema could not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaEntry {
    pub path: PathBuf,
    pub pattern: Option<String>,
}

impl SchemaEntry {
    /// Load the schema at `path` to learn its pattern.
    pub fn load(path: &Path) -> Self {
        let pattern = match load_schema(path) {
            Ok(schema) => Some(schema.filename_pattern),
            Err(err) => {
                warn!(schema = %path.display(), %err, "schema cannot be loaded");
                None
            }
        };
        Self {
            path: path.to_path_buf(),
            pattern,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pairing {
    /// (csv, schema) pairs in discovery order.
    pub pairs: Vec<(PathBuf, PathBuf)>,
    pub unpaired: Vec<PathBuf>,
}

impl Pairing {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Pair every CSV with the schemas that apply to it.
///
/// A single schema applies to every CSV, so mismatched names surface through
/// the filename stage. With several schemas, a CSV only pairs with schemas
/// whose pattern is empty or matches its path. A schema that failed to load
/// pairs with every CSV so each validation reports the load error.
pub fn pair_files(csvs: &[PathBuf], schemas: &[SchemaEntry]) -> Pairing {
    let mut pairing = Pairing::default();
    if let [only] = schemas {
        for csv in csvs {
            pairing.pairs.push((csv.clone(), only.path.clone()));
        }
        return pairing;
    }

    for csv in csvs {
        let matched: Vec<&SchemaEntry> = schemas
            .iter()
            .filter(|schema| applies_to(schema, csv))
            .collect();
        if matched.is_empty() {
            warn!(csv = %csv.display(), "no schema matches this file; skipping");
            pairing.unpaired.push(csv.clone());
            continue;
        }
        for schema in matched {
            debug!(csv = %csv.display(), schema = %schema.path.display(), "paired");
            pairing.pairs.push((csv.clone(), schema.path.clone()));
        }
    }
    pairing
}

fn applies_to(schema: &SchemaEntry, csv: &Path) -> bool {
    match schema.pattern.as_deref() {
        None => true,
        Some(pattern) => filename_matches(pattern, csv).unwrap_or_else(|err| {
            debug!(schema = %schema.path.display(), %err, "invalid filename_pattern");
            false
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, pattern: Option<&str>) -> SchemaEntry {
        SchemaEntry {
            path: PathBuf::from(path),
            pattern: pattern.map(str::to_string),
        }
    }

    #[test]
    fn single_schema_takes_every_file() {
        let csvs = vec![PathBuf::from("a.csv"), PathBuf::from("b.csv")];
        let pairing = pair_files(&csvs, &[entry("s.yml", Some("/^x$/"))]);
        assert_eq!(pairing.pairs.len(), 2);
        assert!(pairing.unpaired.is_empty());
    }

    #[test]
    fn broken_schema_pairs_with_every_file_when_several() {
        let csvs = vec![PathBuf::from("a.csv")];
        let pairing = pair_files(&csvs, &[entry("bad.yml", None), entry("ok.yml", Some("/^b/"))]);
        assert_eq!(
            pairing.pairs,
            vec![(PathBuf::from("a.csv"), PathBuf::from("bad.yml"))]
        );
        assert!(pairing.unpaired.is_empty());
    }
}
