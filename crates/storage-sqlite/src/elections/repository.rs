//! Diff-and-upsert reconciliation of store snapshots.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::Utc;
use diesel::prelude::*;
use log::debug;

use hustings_core::meta::{ChangeLog, SnapshotReconciler};
use hustings_core::{Record, Result as CoreResult};

use crate::db::{get_connection, DbPool};
use crate::errors::StorageError;
use crate::schema::elections;

use super::model::ElectionRowDB;

/// Reconciles each store snapshot against the `elections` table inside one
/// transaction: upsert every snapshot record, delete rows whose key left
/// the snapshot, report the classification.
pub struct ElectionReconciler {
    pool: Arc<DbPool>,
}

impl ElectionReconciler {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    /// Current row count, mostly for health checks.
    pub fn count(&self) -> CoreResult<i64> {
        let mut conn = get_connection(&self.pool)?;
        let total = elections::table
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(total)
    }
}

impl SnapshotReconciler for ElectionReconciler {
    fn reconcile(&self, snapshot: &[Record]) -> CoreResult<ChangeLog> {
        let mut conn = get_connection(&self.pool)?;
        let log = conn
            .immediate_transaction::<_, StorageError, _>(|conn| reconcile_tx(conn, snapshot))?;
        debug!(
            "reconciled {} snapshot record(s): +{} ~{} -{}",
            snapshot.len(),
            log.created.len(),
            log.updated.len(),
            log.deleted.len()
        );
        Ok(log)
    }
}

fn reconcile_tx(
    conn: &mut SqliteConnection,
    snapshot: &[Record],
) -> Result<ChangeLog, StorageError> {
    let now = Utc::now().to_rfc3339();

    let existing: HashMap<String, ElectionRowDB> = elections::table
        .load::<ElectionRowDB>(conn)?
        .into_iter()
        .map(|row| (row.key.clone(), row))
        .collect();

    let mut log = ChangeLog::default();
    let mut seen: HashSet<String> = HashSet::with_capacity(snapshot.len());

    for record in snapshot {
        let row = ElectionRowDB::from_record(record, &now)?;
        seen.insert(row.key.clone());

        match existing.get(&row.key) {
            None => {
                diesel::insert_into(elections::table)
                    .values(&row)
                    .execute(conn)?;
                log.created.push(row.key);
            }
            Some(prev) if prev.document != row.document => {
                diesel::update(elections::table.find(&row.key))
                    .set((
                        elections::name.eq(row.name.as_deref()),
                        elections::status.eq(row.status.as_deref()),
                        elections::start_at.eq(row.start_at.as_deref()),
                        elections::end_at.eq(row.end_at.as_deref()),
                        elections::document.eq(&row.document),
                        elections::updated_at.eq(&row.updated_at),
                    ))
                    .execute(conn)?;
                log.updated.push(row.key);
            }
            Some(_) => {}
        }
    }

    for key in existing.keys() {
        if !seen.contains(key) {
            diesel::delete(elections::table.find(key)).execute(conn)?;
            log.deleted.push(key.clone());
        }
    }
    log.deleted.sort();

    Ok(log)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    use crate::db::{create_pool, init, run_migrations};

    fn setup_pool() -> Arc<DbPool> {
        let app_data = tempfile::tempdir()
            .expect("tempdir")
            .keep()
            .to_string_lossy()
            .to_string();
        let db_path = init(&app_data).expect("init db");
        run_migrations(&db_path).expect("migrate db");
        create_pool(&db_path).expect("create pool")
    }

    fn record(key: &str, name: &str, status: &str) -> Record {
        match json!({
            "key": key,
            "name": name,
            "status": status,
            "start": "2024-01-01",
            "end": "2024-12-31",
        }) {
            Value::Object(map) => Record::from(map),
            _ => unreachable!(),
        }
    }

    #[test]
    fn first_snapshot_creates_every_row() {
        let reconciler = ElectionReconciler::new(setup_pool());
        let snapshot = vec![record("e1", "First", "ongoing"), record("e2", "Second", "upcoming")];

        let log = reconciler.reconcile(&snapshot).expect("reconcile");
        assert_eq!(log.created, vec!["e1", "e2"]);
        assert!(log.updated.is_empty());
        assert!(log.deleted.is_empty());
        assert_eq!(reconciler.count().expect("count"), 2);
    }

    #[test]
    fn unchanged_snapshot_reports_nothing() {
        let reconciler = ElectionReconciler::new(setup_pool());
        let snapshot = vec![record("e1", "First", "ongoing")];

        reconciler.reconcile(&snapshot).expect("first pass");
        let log = reconciler.reconcile(&snapshot).expect("second pass");
        assert!(log.is_empty());
    }

    #[test]
    fn changed_document_reports_updated() {
        let reconciler = ElectionReconciler::new(setup_pool());
        reconciler
            .reconcile(&[record("e1", "First", "ongoing")])
            .expect("first pass");

        let log = reconciler
            .reconcile(&[record("e1", "First", "ended")])
            .expect("second pass");
        assert!(log.created.is_empty());
        assert_eq!(log.updated, vec!["e1"]);
        assert!(log.deleted.is_empty());
    }

    #[test]
    fn keys_leaving_the_snapshot_report_deleted() {
        let reconciler = ElectionReconciler::new(setup_pool());
        reconciler
            .reconcile(&[record("e1", "First", "ongoing"), record("e2", "Second", "upcoming")])
            .expect("first pass");

        let log = reconciler
            .reconcile(&[record("e2", "Second", "upcoming")])
            .expect("second pass");
        assert_eq!(log.deleted, vec!["e1"]);
        assert_eq!(reconciler.count().expect("count"), 1);
    }

    #[test]
    fn record_without_key_aborts_the_transaction() {
        let reconciler = ElectionReconciler::new(setup_pool());
        let keyless = match json!({ "name": "No key" }) {
            Value::Object(map) => Record::from(map),
            _ => unreachable!(),
        };

        let err = reconciler
            .reconcile(&[record("e1", "First", "ongoing"), keyless])
            .expect_err("keyless record must fail");
        assert!(matches!(err, hustings_core::Error::Database(_)));
        // The transaction rolled back: nothing was committed.
        assert_eq!(reconciler.count().expect("count"), 0);
    }
}
