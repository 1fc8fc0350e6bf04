//! Shared fixtures for tail integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use revtail::{FilterSet, MatchAnySubstring, RawFileSource, TailOptions, scan};

pub const HARD_PROBLEMS: &str = "There are 2 hard problems in computer science:\ncache invalidation,\nnaming things,\nand off-by-1 errors.";

pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub path: PathBuf,
}

pub fn write_fixture(content: impl AsRef<[u8]>) -> Fixture {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fixture.log");
    std::fs::write(&path, content).expect("write fixture");
    Fixture { dir, path }
}

/// `count` numbered lines of varying length, newline terminated.
pub fn numbered_lines(count: usize) -> String {
    (0..count)
        .map(|i| format!("{i:05} {}\n", "x".repeat(i % 37)))
        .collect()
}

pub fn substring_filters(substrings: &[&str]) -> Arc<FilterSet> {
    if substrings.is_empty() {
        return Arc::new(FilterSet::new());
    }
    Arc::new(FilterSet::new().with_filter(MatchAnySubstring::new(substrings.iter().copied())))
}

/// Tail `path` through the threaded stream and collect everything.
pub fn tail(path: &Path, max_lines: i64, chunk_size: usize, filters: Arc<FilterSet>) -> Vec<String> {
    let source = RawFileSource::open(path).expect("open");
    let options = TailOptions::default()
        .with_max_lines(max_lines)
        .with_chunk_size(chunk_size);
    let stream = scan(source, &options, filters);
    let lines: Vec<String> = stream.lines().iter().collect();
    stream.finish().expect("scan");
    lines
}
