//! The resolved schema tree.
//!
//! Every optional key has a serde default, so deserializing a resolved document
//! (or serializing a [`Schema`] built in code) always yields a complete tree.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::column::ColumnId;

/// Rule name to option value, in declaration order.
pub type RuleMap = serde_json::Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Schema {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Regex over CSV paths; empty matches everything.
    #[serde(default)]
    pub filename_pattern: String,
    #[serde(default)]
    pub csv: CsvConfig,
    #[serde(default)]
    pub structural_rules: StructuralRules,
    #[serde(default)]
    pub columns: Vec<Column>,
}

impl Schema {
    /// Identifier used in messages for the column at `index`.
    pub fn column_id(&self, index: usize) -> ColumnId {
        let name = self
            .columns
            .get(index)
            .map(|column| column.name.clone())
            .unwrap_or_default();
        ColumnId::new(index, name)
    }
}

/// Parser dialect of the CSV files a schema applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CsvConfig {
    #[serde(default = "default_true")]
    pub header: bool,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Escape character used inside enclosed fields.
    #[serde(default = "default_quote_char")]
    pub quote_char: char,
    #[serde(default = "default_enclosure")]
    pub enclosure: char,
    #[serde(default)]
    pub encoding: Encoding,
    #[serde(default)]
    pub bom: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            header: true,
            delimiter: default_delimiter(),
            quote_char: default_quote_char(),
            enclosure: default_enclosure(),
            encoding: Encoding::default(),
            bom: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Encoding {
    #[default]
    #[serde(rename = "utf-8")]
    Utf8,
    #[serde(rename = "utf-16")]
    Utf16,
    #[serde(rename = "utf-32")]
    Utf32,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16 => "utf-16",
            Encoding::Utf32 => "utf-32",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructuralRules {
    #[serde(default = "default_true")]
    pub strict_column_order: bool,
    #[serde(default)]
    pub allow_extra_columns: bool,
}

impl Default for StructuralRules {
    fn default() -> Self {
        Self {
            strict_column_order: true,
            allow_extra_columns: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Column {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Sample value, checked against the column's own cell rules by the schema lint.
    #[serde(default)]
    pub example: Option<Value>,
    #[serde(default = "default_true")]
    pub required: bool,
    #[serde(default)]
    pub rules: RuleMap,
    #[serde(default)]
    pub aggregate_rules: RuleMap,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            example: None,
            required: true,
            rules: RuleMap::new(),
            aggregate_rules: RuleMap::new(),
        }
    }
}

impl Column {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty() || !self.aggregate_rules.is_empty()
    }

    /// The example rendered as a cell value.
    pub fn example_text(&self) -> Option<String> {
        match self.example.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            Value::Bool(flag) => Some(flag.to_string()),
            Value::Number(number) => Some(number.to_string()),
            other => Some(other.to_string()),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_delimiter() -> char {
    ','
}

fn default_quote_char() -> char {
    '\\'
}

fn default_enclosure() -> char {
    '"'
}
