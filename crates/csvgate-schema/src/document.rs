//! Raw schema documents: YAML or JSON text parsed into a JSON value tree.

use std::fmt;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SchemaError};

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("yml" | "yaml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(SchemaError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    /// Parse a document. `origin` names it in error messages.
    pub fn parse(self, text: &str, origin: &str) -> Result<Value> {
        if text.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        let parsed = match self {
            Self::Yaml => serde_yaml::from_str::<Value>(text).map_err(|err| err.to_string()),
            Self::Json => serde_json::from_str::<Value>(text).map_err(|err| err.to_string()),
        };
        parsed.map_err(|message| SchemaError::Parse {
            origin: origin.to_string(),
            message,
        })
    }

    /// Render a value in this format.
    pub fn render(self, value: &Value) -> Result<String> {
        let rendered = match self {
            Self::Yaml => serde_yaml::to_string(value).map_err(|err| err.to_string()),
            Self::Json => serde_json::to_string_pretty(value).map_err(|err| err.to_string()),
        };
        rendered.map_err(|message| SchemaError::Parse {
            origin: "rendered schema".to_string(),
            message,
        })
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("yaml"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Read and parse a schema file.
pub fn read_document(path: &Path) -> Result<Value> {
    let format = DocumentFormat::from_path(path)?;
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    format.parse(&text, &path.display().to_string())
}
