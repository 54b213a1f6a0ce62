//! libgit2-backed implementation of the meta-repository fetch contract.
//!
//! Clone-if-absent, pull-if-present. Pulls are fetch plus fast-forward
//! only; the working copy is read-only from the application's point of
//! view, so any divergence from the remote is an operator error and
//! surfaces as a failure rather than a merge attempt.

mod error;

pub use error::{GitError, Result};

use std::path::Path;

use git2::build::{CheckoutBuilder, RepoBuilder};
use git2::Repository;
use log::{debug, info};

use hustings_core::meta::MetaFetcher;

/// Fetcher shelling into libgit2 against a local working copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }

    fn clone_into(&self, remote_url: &str, branch: &str, dest: &Path) -> Result<()> {
        info!("cloning {remote_url} ({branch}) into {}", dest.display());
        RepoBuilder::new().branch(branch).clone(remote_url, dest)?;
        Ok(())
    }

    fn pull(&self, dest: &Path, branch: &str) -> Result<()> {
        debug!("pulling {branch} into {}", dest.display());
        let repo = Repository::open(dest)?;
        let mut remote = repo.find_remote("origin")?;
        remote.fetch(&[branch], None, None)?;

        let fetch_head = repo.find_reference("FETCH_HEAD")?;
        let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
        let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;
        if analysis.is_up_to_date() {
            return Ok(());
        }
        if !analysis.is_fast_forward() {
            return Err(GitError::NonFastForward {
                branch: branch.to_string(),
                reason: "local history has diverged from the remote".to_string(),
            });
        }

        let refname = format!("refs/heads/{branch}");
        let mut reference = repo.find_reference(&refname)?;
        reference.set_target(fetch_commit.id(), "fast-forward")?;
        repo.set_head(&refname)?;
        repo.checkout_head(Some(CheckoutBuilder::default().force()))?;
        Ok(())
    }
}

impl MetaFetcher for GitFetcher {
    fn ensure_synced(
        &self,
        local_path: &Path,
        remote_url: &str,
        branch: &str,
    ) -> hustings_core::Result<()> {
        if local_path.is_dir() {
            self.pull(local_path, branch).map_err(Into::into)
        } else {
            self.clone_into(remote_url, branch, local_path)
                .map_err(Into::into)
        }
    }
}
