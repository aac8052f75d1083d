//! Preset resolution.
//!
//! A document may declare `presets` (alias to file path or inline fragment)
//! and reference them from `filename_pattern`, `csv`, `structural_rules`,
//! column entries and rule maps. Resolution is depth-first: every preset is
//! fully resolved before anything points into it, so the output carries no
//! markers at all.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csvgate_model::Schema;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::document::read_document;
use crate::error::{Result, SchemaError};
use crate::pointer::PresetRef;

const PRESET_KEY: &str = "preset";
const RULE_SECTIONS: [&str; 2] = ["rules", "aggregate_rules"];
const MAPPING_SECTIONS: [&str; 2] = ["csv", "structural_rules"];

type Node = Map<String, Value>;

/// Resolves schema documents and caches preset files across documents.
#[derive(Debug, Default)]
pub struct Resolver {
    /// Files currently being resolved, outermost first.
    chain: Vec<PathBuf>,
    cache: HashMap<PathBuf, Node>,
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and resolve a schema file into a typed [`Schema`].
    pub fn resolve_file(&mut self, path: &Path) -> Result<Schema> {
        let origin = path.display().to_string();
        let node = self.resolve_path(path)?;
        into_schema(node, &origin)
    }

    /// Resolve an already parsed document. Relative preset paths are taken
    /// from `base_dir`.
    pub fn resolve_document(&mut self, document: Value, base_dir: &Path, origin: &str) -> Result<Schema> {
        let node = self.resolve_node(document, base_dir, origin)?;
        into_schema(node, origin)
    }

    fn resolve_path(&mut self, path: &Path) -> Result<Node> {
        let canonical = std::fs::canonicalize(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if self.chain.contains(&canonical) {
            let chain = self
                .chain
                .iter()
                .chain(std::iter::once(&canonical))
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(SchemaError::PresetCycle { chain });
        }
        if let Some(cached) = self.cache.get(&canonical) {
            trace!(path = %canonical.display(), "preset cache hit");
            return Ok(cached.clone());
        }

        debug!(path = %canonical.display(), depth = self.chain.len(), "resolving schema file");
        let document = read_document(&canonical)?;
        let base_dir = canonical.parent().map(Path::to_path_buf).unwrap_or_default();
        let origin = path.display().to_string();

        self.chain.push(canonical.clone());
        let resolved = self.resolve_node(document, &base_dir, &origin);
        self.chain.pop();

        let resolved = resolved?;
        self.cache.insert(canonical, resolved.clone());
        Ok(resolved)
    }

    fn resolve_node(&mut self, document: Value, base_dir: &Path, origin: &str) -> Result<Node> {
        let Value::Object(mut node) = document else {
            return Err(invalid("/", origin, "expected a mapping at the top level"));
        };
        let presets = match node.remove("presets") {
            None | Some(Value::Null) => Presets::empty(origin),
            Some(Value::Object(entries)) => self.resolve_presets(entries, base_dir, origin)?,
            Some(_) => return Err(invalid("presets", origin, "expected a mapping of aliases")),
        };

        let mut resolved = Node::new();
        for (key, value) in node {
            let value = match key.as_str() {
                "filename_pattern" => resolve_filename_pattern(value, &presets)?,
                section if MAPPING_SECTIONS.contains(&section) => {
                    Value::Object(resolve_mapping(value, section, &presets)?)
                }
                "columns" => Value::Array(resolve_columns(value, &presets)?),
                _ => value,
            };
            resolved.insert(key, value);
        }
        Ok(resolved)
    }

    fn resolve_presets(&mut self, entries: Node, base_dir: &Path, origin: &str) -> Result<Presets> {
        let mut presets = Presets::empty(origin);
        for (alias, entry) in entries {
            let resolved = match entry {
                Value::String(path) => self.resolve_path(&base_dir.join(path))?,
                Value::Object(_) => {
                    let inline_origin = format!("{origin} (preset \"{alias}\")");
                    self.resolve_node(entry, base_dir, &inline_origin)?
                }
                _ => {
                    return Err(invalid(
                        &format!("presets.{alias}"),
                        origin,
                        "expected a file path or an inline mapping",
                    ));
                }
            };
            trace!(alias = %alias, origin, "preset resolved");
            presets.by_alias.insert(alias, resolved);
        }
        Ok(presets)
    }
}

/// Resolved presets visible to one document.
struct Presets {
    origin: String,
    by_alias: HashMap<String, Node>,
}

impl Presets {
    fn empty(origin: &str) -> Self {
        Self {
            origin: origin.to_string(),
            by_alias: HashMap::new(),
        }
    }

    fn get(&self, alias: &str) -> Result<&Node> {
        self.by_alias
            .get(alias)
            .ok_or_else(|| SchemaError::PresetNotFound {
                alias: alias.to_string(),
                origin: self.origin.clone(),
            })
    }

    /// The resolved column a `alias/<pointer>` reference designates.
    fn column(&self, reference: &Value, path: &str) -> Result<Node> {
        let raw = reference
            .as_str()
            .ok_or_else(|| invalid(path, &self.origin, "preset reference must be a string"))?;
        let parsed = PresetRef::parse(raw).ok_or_else(|| SchemaError::ColumnPointer {
            pointer: raw.to_string(),
            origin: self.origin.clone(),
            message: "expected \"alias/index\", \"alias/index:name\" or \"alias/name\"".to_string(),
        })?;
        let preset = self.get(&parsed.alias)?;
        let columns: &[Value] = match preset.get("columns") {
            Some(Value::Array(columns)) => columns.as_slice(),
            _ => &[],
        };
        let index = parsed
            .pointer
            .locate(columns)
            .map_err(|message| SchemaError::ColumnPointer {
                pointer: raw.to_string(),
                origin: self.origin.clone(),
                message,
            })?;
        match &columns[index] {
            Value::Object(column) => Ok(column.clone()),
            _ => Err(invalid(path, &self.origin, "preset column is not a mapping")),
        }
    }
}

fn resolve_filename_pattern(value: Value, presets: &Presets) -> Result<Value> {
    match value {
        Value::Object(marker) => {
            let alias = preset_alias(&marker, "filename_pattern", presets)?;
            if marker.len() > 1 {
                return Err(invalid(
                    "filename_pattern",
                    &presets.origin,
                    "a preset marker takes no sibling keys",
                ));
            }
            Ok(presets
                .get(alias)?
                .get("filename_pattern")
                .cloned()
                .unwrap_or_else(|| Value::String(String::new())))
        }
        Value::Null => Ok(Value::String(String::new())),
        other => Ok(other),
    }
}

fn preset_alias<'a>(marker: &'a Node, path: &str, presets: &Presets) -> Result<&'a str> {
    marker
        .get(PRESET_KEY)
        .and_then(Value::as_str)
        .ok_or_else(|| invalid(path, &presets.origin, "expected { preset: <alias> }"))
}

/// `csv` and `structural_rules`: preset keys first, sibling keys win.
fn resolve_mapping(value: Value, section: &str, presets: &Presets) -> Result<Node> {
    let node = match value {
        Value::Object(node) => node,
        Value::Null => return Ok(Node::new()),
        _ => return Err(invalid(section, &presets.origin, "expected a mapping")),
    };
    let mut merged = match node.get(PRESET_KEY) {
        Some(_) => {
            let alias = preset_alias(&node, section, presets)?;
            match presets.get(alias)?.get(section) {
                Some(Value::Object(inherited)) => inherited.clone(),
                _ => Node::new(),
            }
        }
        None => Node::new(),
    };
    merge_siblings(&mut merged, node);
    Ok(merged)
}

fn merge_siblings(target: &mut Node, node: Node) {
    for (key, value) in node {
        if key != PRESET_KEY {
            target.insert(key, value);
        }
    }
}

fn resolve_columns(value: Value, presets: &Presets) -> Result<Vec<Value>> {
    let columns = match value {
        Value::Array(columns) => columns,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(invalid("columns", &presets.origin, "expected a list of columns")),
    };
    columns
        .into_iter()
        .enumerate()
        .map(|(index, column)| resolve_column(column, index, presets).map(Value::Object))
        .collect()
}

/// Precedence: preset column, then the column's rule-map pointers, then siblings.
fn resolve_column(value: Value, index: usize, presets: &Presets) -> Result<Node> {
    let path = format!("columns[{index}]");
    let Value::Object(node) = value else {
        return Err(invalid(&path, &presets.origin, "expected a mapping"));
    };
    let mut merged = match node.get(PRESET_KEY) {
        Some(reference) => presets.column(reference, &path)?,
        None => Node::new(),
    };
    for (key, value) in node {
        if key == PRESET_KEY {
            continue;
        }
        let value = if RULE_SECTIONS.contains(&key.as_str()) {
            let inherited = match merged.get(&key) {
                Some(Value::Object(rules)) => rules.clone(),
                _ => Node::new(),
            };
            let section_path = format!("{path}.{key}");
            Value::Object(resolve_rule_map(value, inherited, &key, &section_path, presets)?)
        } else {
            value
        };
        merged.insert(key, value);
    }
    Ok(merged)
}

fn resolve_rule_map(
    value: Value,
    inherited: Node,
    section: &str,
    path: &str,
    presets: &Presets,
) -> Result<Node> {
    let rules = match value {
        Value::Object(rules) => rules,
        Value::Null => return Ok(inherited),
        _ => return Err(invalid(path, &presets.origin, "expected a mapping of rules")),
    };
    let mut merged = inherited;
    if let Some(reference) = rules.get(PRESET_KEY) {
        let column = presets.column(reference, path)?;
        if let Some(Value::Object(pointed)) = column.get(section) {
            for (name, options) in pointed {
                merged.insert(name.clone(), options.clone());
            }
        }
    }
    merge_siblings(&mut merged, rules);
    Ok(merged)
}

fn into_schema(node: Node, origin: &str) -> Result<Schema> {
    serde_json::from_value(Value::Object(node)).map_err(|err| invalid("/", origin, err.to_string()))
}

fn invalid(path: &str, origin: &str, message: impl Into<String>) -> SchemaError {
    SchemaError::InvalidNode {
        path: path.to_string(),
        origin: origin.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn resolve(document: Value) -> Result<Schema> {
        Resolver::new().resolve_document(document, Path::new("."), "inline")
    }

    #[test]
    fn empty_presets_are_a_no_op() {
        let schema = resolve(json!({"presets": {}, "name": "plain"})).unwrap();
        assert_eq!(schema.name, "plain");
        assert!(schema.csv.header);
    }

    #[test]
    fn sections_inherit_and_siblings_win() {
        let schema = resolve(json!({
            "presets": {"base": {"csv": {"delimiter": ";", "header": false}}},
            "csv": {"preset": "base", "header": true},
        }))
        .unwrap();
        assert_eq!(schema.csv.delimiter, ';');
        assert!(schema.csv.header);
        assert_eq!(schema.csv.enclosure, '"');
    }

    #[test]
    fn filename_pattern_from_preset() {
        let schema = resolve(json!({
            "presets": {"base": {"filename_pattern": "/users-\\d+\\.csv$/i"}},
            "filename_pattern": {"preset": "base"},
        }))
        .unwrap();
        assert_eq!(schema.filename_pattern, "/users-\\d+\\.csv$/i");
    }

    #[test]
    fn partial_override_keeps_other_keys() {
        let schema = resolve(json!({
            "presets": {"users": {"columns": [
                {"name": "id", "description": "Identifier", "example": 7,
                 "rules": {"not_empty": true, "is_int": true},
                 "aggregate_rules": {"is_unique": true}}
            ]}},
            "columns": [{"preset": "users/id", "rules": {"num_min": 1}}],
        }))
        .unwrap();
        let column = &schema.columns[0];
        assert_eq!(column.description, "Identifier");
        assert_eq!(column.example, Some(json!(7)));
        assert_eq!(column.aggregate_rules.get("is_unique"), Some(&json!(true)));
        let names: Vec<_> = column.rules.keys().map(String::as_str).collect();
        assert_eq!(names, ["not_empty", "is_int", "num_min"]);
    }

    #[test]
    fn rule_map_pointer_then_siblings() {
        let schema = resolve(json!({
            "presets": {"users": {"columns": [
                {"name": "login", "rules": {"length_min": 3, "length_max": 8}}
            ]}},
            "columns": [{"name": "nick", "rules": {"preset": "users/0:login", "length_max": 12}}],
        }))
        .unwrap();
        let rules = &schema.columns[0].rules;
        assert_eq!(rules.get("length_min"), Some(&json!(3)));
        assert_eq!(rules.get("length_max"), Some(&json!(12)));
        assert!(rules.get("preset").is_none());
    }

    #[test]
    fn mismatched_pointer_is_an_error() {
        let err = resolve(json!({
            "presets": {"users": {"columns": [{"name": "id"}, {"name": "login"}]}},
            "columns": [{"preset": "users/0:login"}],
        }))
        .unwrap_err();
        assert!(matches!(err, SchemaError::ColumnPointer { .. }), "{err}");
    }

    #[test]
    fn unknown_alias_is_an_error() {
        let err = resolve(json!({"columns": [{"preset": "nope/0"}]})).unwrap_err();
        assert!(matches!(err, SchemaError::PresetNotFound { ref alias, .. } if alias == "nope"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = resolve(json!({"columns": [{"name": "a", "rulez": {}}]})).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidNode { .. }));
    }

    #[test]
    fn transitive_inline_presets() {
        let schema = resolve(json!({
            "presets": {"outer": {
                "presets": {"inner": {"columns": [{"name": "id", "rules": {"is_int": true}}]}},
                "columns": [{"preset": "inner/id", "required": false}],
            }},
            "columns": [{"preset": "outer/0"}],
        }))
        .unwrap();
        let column = &schema.columns[0];
        assert_eq!(column.name, "id");
        assert!(!column.required);
        assert_eq!(column.rules.get("is_int"), Some(&json!(true)));
    }
}
