//! Tests for input file discovery.

use std::fs;

use csvgate_ingest::{IngestError, find_files, list_files};
use tempfile::TempDir;

#[test]
fn globs_are_expanded_sorted_and_deduplicated() {
    let dir = TempDir::new().expect("temp dir");
    for name in ["b.csv", "a.csv", "notes.txt"] {
        fs::write(dir.path().join(name), "x\n").expect("write");
    }
    let pattern = format!("{}/*.csv", dir.path().display());
    let literal = dir.path().join("a.csv").display().to_string();

    let files = find_files(&[pattern, literal]).expect("find");
    let names: Vec<_> = files
        .iter()
        .filter_map(|path| path.file_name()?.to_str())
        .collect();
    assert_eq!(names, ["a.csv", "b.csv"]);
}

#[test]
fn unmatched_pattern_is_not_an_error() {
    let dir = TempDir::new().expect("temp dir");
    let pattern = format!("{}/*.yml", dir.path().display());
    assert!(find_files(&[pattern]).expect("find").is_empty());
}

#[test]
fn invalid_glob_is_an_error() {
    let err = find_files(&["[".to_string()]).expect_err("invalid");
    assert!(matches!(err, IngestError::Glob { .. }));
}

#[test]
fn lists_by_extension() {
    let dir = TempDir::new().expect("temp dir");
    for name in ["B.CSV", "a.csv", "c.yml"] {
        fs::write(dir.path().join(name), "x\n").expect("write");
    }
    let files = list_files(dir.path(), "csv").expect("list");
    assert_eq!(files.len(), 2);
}
