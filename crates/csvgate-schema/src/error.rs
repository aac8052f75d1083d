//! Error types for schema loading and resolution.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that make a schema document unusable.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Schema or preset file could not be read.
    #[error("Failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid YAML or JSON.
    #[error("Failed to parse schema {origin}: {message}")]
    Parse { origin: String, message: String },

    /// File extension is not one of yml, yaml, json.
    #[error("Unsupported schema format for {path}: expected .yml, .yaml or .json")]
    UnsupportedFormat { path: PathBuf },

    /// A preset marker names an alias that is not declared.
    #[error("Preset \"{alias}\" is not declared in {origin}")]
    PresetNotFound { alias: String, origin: String },

    /// Presets reference each other in a loop.
    #[error("Preset cycle detected: {chain}")]
    PresetCycle { chain: String },

    /// A column pointer is malformed or points nowhere.
    #[error("Column pointer \"{pointer}\" in {origin}: {message}")]
    ColumnPointer {
        pointer: String,
        origin: String,
        message: String,
    },

    /// A section has the wrong node kind or fails typed validation.
    #[error("Invalid schema node {path} in {origin}: {message}")]
    InvalidNode {
        path: String,
        origin: String,
        message: String,
    },
}

/// Result type for schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
