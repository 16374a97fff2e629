//! Error types for the tag store, the editor and the codec.

use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a `TagCodec`.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unreadable tag data: {0}")]
    Format(String),

    #[error("Write failed: {0}")]
    Write(String),
}

/// Failures of tag store operations.
///
/// Every variant is per-file: a batch run by the editor collects these
/// instead of stopping at the first one.
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Could not read {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Could not save {path}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Already open: {0}")]
    AlreadyOpen(PathBuf),

    #[error("Filename does not match pattern: {0}")]
    GuessMismatch(String),

    #[error("No tag {tag} with value {value:?}")]
    TagNotFound { tag: String, value: String },

    #[error("Tag name must not be empty")]
    EmptyTagName,

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
}

pub type Result<T> = std::result::Result<T, TagError>;

/// Failures while discovering audio files on disk.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Could not read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("No such file or directory: {0}")]
    Missing(PathBuf),
}
