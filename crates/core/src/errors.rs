//! Error types shared across the data layer.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Result type alias for data-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning meta-repository files into records.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Malformed YAML content
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization/deserialization error
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A time boundary that none of the accepted formats could parse
    #[error("invalid time boundary '{value}': {reason}")]
    Time { value: String, reason: String },

    /// Structurally valid file with the wrong shape (missing field, wrong type)
    #[error("{0}")]
    Structure(String),
}

/// Errors surfaced by the persistence reconciler.
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("connection pool error: {0}")]
    Pool(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("{0}")]
    Internal(String),
}

/// Errors that can occur in the election data layer.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing key or missing file
    #[error("not found: {0}")]
    NotFound(String),

    /// Malformed YAML/Markdown/structure
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Repository fetch failed (clone, fetch, non-fast-forward)
    #[error("meta repository sync failed: {0}")]
    Sync(String),

    /// Persistence-layer failure
    #[error("database error: {0}")]
    Database(#[from] DatabaseError),

    /// Invalid or missing configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Filesystem fault outside the taxonomy above
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Create a repository sync failure
    pub fn sync(message: impl Into<String>) -> Self {
        Self::Sync(message.into())
    }

    /// Create a structural parse error
    pub fn structure(message: impl Into<String>) -> Self {
        Self::Parse(ParseError::Structure(message.into()))
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Map an I/O error for `path`, folding missing-file into `NotFound`.
    pub fn from_io(err: io::Error, path: &Path) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Self::NotFound(path.display().to_string())
        } else {
            Self::Io(err)
        }
    }

    /// True when this error represents a missing key or file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(ParseError::Yaml(err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(ParseError::Json(err))
    }
}
