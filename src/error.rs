//! Error types shared by the scanner, tag store and HTTP layer.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TagError {
    /// A required request field was missing or empty
    #[error("{0}")]
    Validation(String),

    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// Read or write failure on a specific file
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TagError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TagError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TagError> = std::result::Result<T, E>;
