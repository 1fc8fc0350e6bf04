use std::path::{Component, Path, PathBuf};

use tracing::warn;

use crate::error::TailError;

/// Lexically normalize `path`: drop `.` and resolve `..` without touching
/// the filesystem.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !path.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Whether `path` lies under one of `prefixes`. No prefixes allows anything.
pub fn is_allowed_path(path: &Path, prefixes: &[PathBuf]) -> bool {
    if prefixes.is_empty() {
        return true;
    }
    let cleaned = clean_path(path);
    prefixes
        .iter()
        .any(|prefix| cleaned.starts_with(clean_path(prefix)))
}

pub fn ensure_allowed(path: &Path, prefixes: &[PathBuf]) -> Result<(), TailError> {
    if is_allowed_path(path, prefixes) {
        Ok(())
    } else {
        Err(TailError::InvalidPath(path.to_path_buf()))
    }
}

/// Regular files directly inside `dir`, sorted.
pub fn list_dir(dir: &Path) -> Result<Vec<PathBuf>, TailError> {
    let entries = std::fs::read_dir(dir).map_err(|err| TailError::from_open(dir, err))?;
    let mut files = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort();
    Ok(files)
}

/// Files under every prefix; unreadable prefixes are logged and skipped.
pub fn list_prefixes(prefixes: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for prefix in prefixes {
        match list_dir(prefix) {
            Ok(found) => files.extend(found),
            Err(err) => warn!("failed to list prefix dir {}: {err}", prefix.display()),
        }
    }
    files
}
