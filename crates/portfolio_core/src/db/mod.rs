//! SQLite backing for the persistent project store.
//!
//! # Responsibility
//! - Open project databases (file or in-memory) with pragmas applied.
//! - Bring the `projects` schema up to the version this build knows.
//!
//! # Invariants
//! - The schema version lives in `PRAGMA user_version`.
//! - `SqliteProjectStore` only accepts connections at `latest_version()`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening, migrating or querying a project database.
#[derive(Debug)]
pub enum DbError {
    /// Raw SQLite failure, including `CHECK` violations on `projects`.
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build; it is left untouched.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// A connection handed to `SqliteProjectStore::new` skipped `open_db`.
    SchemaMismatch { db_version: u32, expected: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "project database error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "project database schema {db_version} is newer than supported \
                 {latest_supported}"
            ),
            Self::SchemaMismatch {
                db_version,
                expected,
            } => write!(
                f,
                "project database schema {db_version} does not match {expected}; \
                 open it with open_db"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::SchemaMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

#[cfg(test)]
mod tests {
    use super::DbError;

    #[test]
    fn schema_errors_name_both_versions() {
        let newer = DbError::UnsupportedSchemaVersion {
            db_version: 7,
            latest_supported: 1,
        };
        assert_eq!(
            newer.to_string(),
            "project database schema 7 is newer than supported 1"
        );

        let mismatch = DbError::SchemaMismatch {
            db_version: 0,
            expected: 1,
        };
        assert!(mismatch.to_string().contains("schema 0 does not match 1"));
    }
}
