//! Error types for the meta-repository fetcher.

use thiserror::Error;

/// Result type alias for fetch operations.
pub type Result<T> = std::result::Result<T, GitError>;

/// Errors that can occur while cloning or pulling the meta repository.
#[derive(Debug, Error)]
pub enum GitError {
    /// Underlying libgit2 failure (network, auth, object store)
    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    /// The local branch can no longer fast-forward onto the remote
    #[error("cannot fast-forward '{branch}': {reason}")]
    NonFastForward { branch: String, reason: String },
}

impl From<GitError> for hustings_core::Error {
    fn from(err: GitError) -> Self {
        hustings_core::Error::sync(err.to_string())
    }
}
