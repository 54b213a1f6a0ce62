//! Meta-repository configuration.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

const DEFAULT_BRANCH: &str = "main";

/// Where the meta repository lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaConfig {
    /// Local working copy of the meta repository.
    pub path: PathBuf,
    /// Remote URL the working copy is cloned from and pulled against.
    pub remote: String,
    /// Branch to track.
    #[serde(default = "default_branch")]
    pub branch: String,
}

fn default_branch() -> String {
    DEFAULT_BRANCH.to_string()
}

impl MetaConfig {
    pub fn new(path: impl Into<PathBuf>, remote: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            remote: remote.into(),
            branch: default_branch(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Load from `META_PATH`, `META_REMOTE` and optional `META_BRANCH`.
    pub fn from_env() -> Result<Self> {
        let path = require_env("META_PATH")?;
        let remote = require_env("META_REMOTE")?;
        let branch = env::var("META_BRANCH").unwrap_or_else(|_| default_branch());
        Ok(Self {
            path: PathBuf::from(path),
            remote,
            branch,
        })
    }

    /// Root directory holding one subdirectory per election.
    pub fn elections_root(&self) -> PathBuf {
        self.path.join("elections")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| Error::config(format!("{name} is not set")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_defaults_to_main() {
        let config = MetaConfig::new("/var/meta", "https://example.org/meta.git");
        assert_eq!(config.branch, "main");
        assert_eq!(config.elections_root(), PathBuf::from("/var/meta/elections"));
    }

    #[test]
    fn with_branch_overrides() {
        let config =
            MetaConfig::new("/var/meta", "https://example.org/meta.git").with_branch("release");
        assert_eq!(config.branch, "release");
    }
}
