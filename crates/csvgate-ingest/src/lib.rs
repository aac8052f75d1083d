//! CSV ingestion for csvgate: a lazy record source over one file and
//! discovery of input files from paths and glob patterns.

pub mod discovery;
pub mod error;
pub mod source;

pub use discovery::{find_files, list_files};
pub use error::{IngestError, Result};
pub use source::{CsvSource, Record};
