//! Error type shared by the file readers.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error from input discovery or file parsing.
#[derive(Error, Debug)]
pub enum ReadError {
    /// Underlying filesystem failure.
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed file content.
    #[error("{format} parse error in {path} at line {line}: {message}")]
    Parse {
        format: &'static str,
        path: PathBuf,
        line: usize,
        message: String,
    },
}

impl ReadError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn parse(
        format: &'static str,
        path: &Path,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self::Parse {
            format,
            path: path.to_path_buf(),
            line,
            message: message.into(),
        }
    }
}

/// Result type for reader operations.
pub type ReadResult<T> = Result<T, ReadError>;
