use std::path::Path;

use csvgate_rules::{Result, compile_pattern};

/// Whether `path` matches a schema's `filename_pattern`. An empty pattern
/// matches every path.
pub fn filename_matches(pattern: &str, path: &Path) -> Result<bool> {
    if pattern.trim().is_empty() {
        return Ok(true);
    }
    let regex = compile_pattern(pattern)?;
    let normalized = path.to_string_lossy().replace('\\', "/");
    Ok(regex.is_match(&normalized))
}
