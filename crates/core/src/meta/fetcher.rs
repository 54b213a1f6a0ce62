//! Contract for keeping the local meta-repository working copy current.

use std::path::Path;

use crate::errors::Result;

/// Repository fetch capability injected into the sync coordinator.
///
/// Implementations clone `remote_url` at `branch` into `local_path` when the
/// directory is absent, and pull `branch` into the existing working copy
/// otherwise. Network, auth and non-fast-forward failures surface as
/// `Error::Sync`; callers decide whether to proceed with stale data.
pub trait MetaFetcher: Send + Sync {
    fn ensure_synced(&self, local_path: &Path, remote_url: &str, branch: &str) -> Result<()>;
}
