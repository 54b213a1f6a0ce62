//! Row type for the `elections` table.

use diesel::prelude::*;

use hustings_core::Record;

use crate::errors::StorageError;
use crate::schema::elections;

/// One durable election row. `document` carries the full record as JSON;
/// the promoted columns exist for SQL-side filtering by the web layer.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Insertable, Identifiable)]
#[diesel(table_name = elections, primary_key(key))]
pub struct ElectionRowDB {
    pub key: String,
    pub name: Option<String>,
    pub status: Option<String>,
    pub start_at: Option<String>,
    pub end_at: Option<String>,
    pub document: String,
    pub created_at: String,
    pub updated_at: String,
}

impl ElectionRowDB {
    /// Flatten a snapshot record into a row stamped with `now`.
    pub fn from_record(record: &Record, now: &str) -> Result<Self, StorageError> {
        let key = record
            .key()
            .ok_or_else(|| StorageError::Snapshot("snapshot record is missing 'key'".to_string()))?
            .to_string();
        let document = serde_json::to_string(record)
            .map_err(|e| StorageError::Snapshot(format!("record '{key}' is not serializable: {e}")))?;

        Ok(Self {
            key,
            name: record.get_str("name").map(String::from),
            status: record.get_str("status").map(String::from),
            start_at: record.get_str("start").map(String::from),
            end_at: record.get_str("end").map(String::from),
            document,
            created_at: now.to_string(),
            updated_at: now.to_string(),
        })
    }
}
