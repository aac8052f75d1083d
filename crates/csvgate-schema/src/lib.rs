//! Schema loading for csvgate.
//!
//! Reads YAML or JSON schema documents, resolves their presets and returns a
//! typed [`Schema`](csvgate_model::Schema) with every default filled in.

pub mod document;
pub mod error;
pub mod pointer;
pub mod resolver;

use std::path::Path;

use csvgate_model::Schema;

pub use document::{DocumentFormat, read_document};
pub use error::{Result, SchemaError};
pub use pointer::{ColumnPointer, PresetRef};
pub use resolver::Resolver;

/// Load and resolve one schema file.
pub fn load_schema(path: &Path) -> Result<Schema> {
    Resolver::new().resolve_file(path)
}

/// Parse and resolve schema text. Relative presets are read from `base_dir`.
pub fn parse_schema(text: &str, format: DocumentFormat, base_dir: &Path) -> Result<Schema> {
    let document = format.parse(text, "inline schema")?;
    Resolver::new().resolve_document(document, base_dir, "inline schema")
}

/// Render a resolved schema with every default shown.
pub fn dump_schema(schema: &Schema, format: DocumentFormat) -> Result<String> {
    let value = serde_json::to_value(schema).map_err(|err| SchemaError::Parse {
        origin: format!("schema \"{}\"", schema.name),
        message: err.to_string(),
    })?;
    format.render(&value)
}
