//! Column pointers: `index`, `index:name`, `name`, `index:` or `:name`.

use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnPointer {
    pub index: Option<usize>,
    pub name: Option<String>,
}

impl ColumnPointer {
    /// Parse a pointer. Returns `None` for malformed input.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let (index, name) = match raw.split_once(':') {
            Some((index, name)) => {
                let index = if index.is_empty() {
                    None
                } else {
                    Some(index.parse::<usize>().ok()?)
                };
                (index, (!name.is_empty()).then(|| name.to_string()))
            }
            None if raw.bytes().all(|b| b.is_ascii_digit()) => (Some(raw.parse().ok()?), None),
            None => (None, Some(raw.to_string())),
        };
        if index.is_none() && name.is_none() {
            return None;
        }
        Some(Self { index, name })
    }

    /// Position of the target inside a list of column nodes.
    pub fn locate(&self, columns: &[Value]) -> Result<usize, String> {
        match (self.index, self.name.as_deref()) {
            (Some(index), name) => {
                let column = columns.get(index).ok_or_else(|| {
                    format!("column index {index} is out of range ({} columns)", columns.len())
                })?;
                if let Some(expected) = name {
                    let actual = column_name(column);
                    if actual != expected {
                        return Err(format!(
                            "column {index} is named \"{actual}\", not \"{expected}\""
                        ));
                    }
                }
                Ok(index)
            }
            (None, Some(name)) => columns
                .iter()
                .position(|column| column_name(column) == name)
                .ok_or_else(|| format!("no column is named \"{name}\"")),
            (None, None) => Err("empty pointer".to_string()),
        }
    }
}

impl fmt::Display for ColumnPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.index, &self.name) {
            (Some(index), Some(name)) => write!(f, "{index}:{name}"),
            (Some(index), None) => write!(f, "{index}"),
            (None, Some(name)) => f.write_str(name),
            (None, None) => Ok(()),
        }
    }
}

fn column_name(column: &Value) -> &str {
    column.get("name").and_then(Value::as_str).unwrap_or("")
}

/// A `alias/<pointer>` reference into a preset's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetRef {
    pub alias: String,
    pub pointer: ColumnPointer,
}

impl PresetRef {
    pub fn parse(raw: &str) -> Option<Self> {
        let (alias, pointer) = raw.split_once('/')?;
        let alias = alias.trim();
        if alias.is_empty() {
            return None;
        }
        Some(Self {
            alias: alias.to_string(),
            pointer: ColumnPointer::parse(pointer)?,
        })
    }
}
