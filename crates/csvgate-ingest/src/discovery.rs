//! Resolving user-supplied paths and glob patterns to files.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Expand paths and glob patterns into a sorted, de-duplicated file list.
///
/// A pattern naming an existing file is taken literally. Patterns that match
/// nothing are logged and skipped.
pub fn find_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();
    for pattern in patterns {
        let literal = Path::new(pattern);
        if literal.is_file() {
            files.insert(literal.to_path_buf());
            continue;
        }
        let entries = glob::glob(pattern).map_err(|err| IngestError::Glob {
            pattern: pattern.clone(),
            message: err.to_string(),
        })?;
        let before = files.len();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    files.insert(path);
                }
                Ok(_) => {}
                Err(err) => warn!(pattern = %pattern, error = %err, "skipping unreadable path"),
            }
        }
        if files.len() == before {
            warn!(pattern = %pattern, "pattern matched no files");
        }
    }
    debug!(count = files.len(), "files discovered");
    Ok(files.into_iter().collect())
}

/// Lists all files with the given extension in a directory (non-recursive),
/// sorted by file name.
pub fn list_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::open(dir, source))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| IngestError::FileRead {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        let matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension));
        if path.is_file() && matches {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
