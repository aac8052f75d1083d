//! Validation for csvgate: the per-file pipeline and the schema lint.

pub mod codes;
pub mod error;
pub mod filename;
pub mod lint;
pub mod validator;

pub use error::{Result, ValidateError};
pub use filename::filename_matches;
pub use lint::{lint_file, lint_schema};
pub use validator::Validator;
