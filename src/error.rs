use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TailError {
    #[error("file not found: {}", path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("permission denied: {}", path.display())]
    PermissionDenied {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed scan state: {0}")]
    MalformedState(String),
    #[error("invalid path: {}", .0.display())]
    InvalidPath(PathBuf),
}

impl TailError {
    /// Classify an error from opening `path`.
    pub fn from_open(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => TailError::NotFound {
                path: path.to_path_buf(),
                source: err,
            },
            std::io::ErrorKind::PermissionDenied => TailError::PermissionDenied {
                path: path.to_path_buf(),
                source: err,
            },
            _ => TailError::Io(err),
        }
    }

    /// A second copy of this error. `io::Error` is not `Clone`, so io sources
    /// are rebuilt from their kind and message.
    pub(crate) fn duplicate(&self) -> Self {
        fn copy_io(err: &std::io::Error) -> std::io::Error {
            std::io::Error::new(err.kind(), err.to_string())
        }
        match self {
            TailError::NotFound { path, source } => TailError::NotFound {
                path: path.clone(),
                source: copy_io(source),
            },
            TailError::PermissionDenied { path, source } => TailError::PermissionDenied {
                path: path.clone(),
                source: copy_io(source),
            },
            TailError::Io(err) => TailError::Io(copy_io(err)),
            TailError::MalformedState(msg) => TailError::MalformedState(msg.clone()),
            TailError::InvalidPath(path) => TailError::InvalidPath(path.clone()),
        }
    }
}
