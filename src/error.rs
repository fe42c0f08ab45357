use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading the project's `go.mod` / `go.sum`.
///
/// Any of these aborts the run before a single analysis pass executes.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("go.mod file not found in {}", .0.display())]
    MissingManifest(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl LoadError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoadError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, line: usize, message: impl Into<String>) -> Self {
        LoadError::Parse {
            path: path.into(),
            line,
            message: message.into(),
        }
    }
}
