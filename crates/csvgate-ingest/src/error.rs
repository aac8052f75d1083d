//! Error types for CSV ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while locating or reading CSV files.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === CSV Parsing Errors ===
    /// Malformed CSV content (including invalid UTF-8).
    #[error("failed to parse CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// File or schema declares an encoding other than UTF-8.
    #[error("unsupported encoding {encoding} in {path}: only UTF-8 is supported")]
    UnsupportedEncoding { path: PathBuf, encoding: String },

    /// A chunk was requested before the current read position.
    #[error("cannot rewind {path} to record {offset}: {position} records already read")]
    Rewind {
        path: PathBuf,
        offset: usize,
        position: usize,
    },

    /// Delimiter, enclosure or escape cannot be used by the parser.
    #[error("invalid CSV dialect for {path}: {message}")]
    InvalidDialect { path: PathBuf, message: String },

    // === Discovery Errors ===
    /// A file pattern is not a valid glob.
    #[error("invalid file pattern \"{pattern}\": {message}")]
    Glob { pattern: String, message: String },
}

impl IngestError {
    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::FileRead {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
