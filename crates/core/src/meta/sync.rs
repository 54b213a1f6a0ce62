//! Sync coordination: fetch, rebuild the store, reconcile durable storage.

use std::sync::{Arc, Mutex, PoisonError};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::meta::{MetaConfig, MetaFetcher, MetaStore};
use crate::records::Record;

/// Identifiers created, updated and deleted while reconciling a store
/// snapshot against durable storage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLog {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub deleted: Vec<String>,
}

impl ChangeLog {
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.updated.is_empty() && self.deleted.is_empty()
    }
}

/// Diff-and-upsert capability provided by the persistence layer.
pub trait SnapshotReconciler: Send + Sync {
    fn reconcile(&self, snapshot: &[Record]) -> Result<ChangeLog>;
}

/// Orchestrates one sync pass: repository fetch, key discovery, record
/// refresh, persistence reconciliation.
///
/// A failed fetch leaves the store untouched; the refresh steps run only
/// after the fetch succeeds. An internal mutex serializes overlapping
/// `sync()` calls within the process, so two webhook deliveries cannot pull
/// into the same working copy at once.
pub struct SyncCoordinator {
    config: MetaConfig,
    fetcher: Arc<dyn MetaFetcher>,
    store: Arc<MetaStore>,
    reconciler: Arc<dyn SnapshotReconciler>,
    serial: Mutex<()>,
}

impl SyncCoordinator {
    pub fn new(
        config: MetaConfig,
        fetcher: Arc<dyn MetaFetcher>,
        store: Arc<MetaStore>,
        reconciler: Arc<dyn SnapshotReconciler>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            reconciler,
            serial: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &MetaConfig {
        &self.config
    }

    /// Run one full sync pass and return the persistence change log.
    pub fn sync(&self) -> Result<ChangeLog> {
        let _serial = self.serial.lock().unwrap_or_else(PoisonError::into_inner);

        self.fetcher.ensure_synced(
            &self.config.path,
            &self.config.remote,
            &self.config.branch,
        )?;

        let keys = self.store.refresh_keys()?;
        let parsed = self.store.refresh_records()?;
        debug!("meta refresh complete: {keys} keys, {parsed} records");

        let snapshot = self.store.all();
        let log = self.reconciler.reconcile(&snapshot)?;
        info!(
            "meta sync reconciled: {} created, {} updated, {} deleted",
            log.created.len(),
            log.updated.len(),
            log.deleted.len()
        );
        Ok(log)
    }
}
