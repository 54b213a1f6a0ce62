//! Error types for the SQLite storage crate.

use thiserror::Error;

use hustings_core::errors::DatabaseError;

/// Errors raised by pool management, migrations and reconciliation.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("connection failed: {0}")]
    Connection(#[from] diesel::result::ConnectionError),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("invalid snapshot record: {0}")]
    Snapshot(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for hustings_core::Error {
    fn from(err: StorageError) -> Self {
        let database = match err {
            StorageError::Query(e) => DatabaseError::Query(e.to_string()),
            StorageError::Pool(e) => DatabaseError::Pool(e.to_string()),
            StorageError::Connection(e) => DatabaseError::Pool(e.to_string()),
            StorageError::Migration(m) => DatabaseError::Migration(m),
            StorageError::Snapshot(m) => DatabaseError::Internal(m),
            StorageError::Io(e) => DatabaseError::Internal(e.to_string()),
        };
        hustings_core::Error::Database(database)
    }
}
