//! Issue codes of the structural stages.

pub const FILENAME_PATTERN: &str = "filename_pattern";
pub const CSV_HEADER: &str = "csv.header";
pub const REQUIRED: &str = "required";
pub const ALLOW_EXTRA_COLUMNS: &str = "allow_extra_columns";
pub const STRICT_COLUMN_ORDER: &str = "strict_column_order";
pub const CSV_COLUMN_COUNT: &str = "csv.column_count";
pub const SCHEMA: &str = "schema";
