//! Schema steps for the `projects` database.
//!
//! # Responsibility
//! - List the `projects` schema steps in version order.
//! - Run the steps a connection has not seen yet, in one transaction.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - `PRAGMA user_version` equals the last step applied.

use crate::db::{DbError, DbResult};
use log::{debug, info};
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_projects.sql"),
}];

/// Schema version a fully migrated project database carries.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Reads the applied schema version of `conn`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn pending_after(version: u32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |migration| migration.version > version)
}

/// Upgrades `conn` to `latest_version()`.
///
/// A database already at the latest version is left alone. A newer one is
/// refused with `UnsupportedSchemaVersion` so an older build never rewrites it.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from = schema_version(conn)?;
    let latest = latest_version();

    if from > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from,
            latest_supported: latest,
        });
    }
    if from == latest {
        debug!("event=db_migrate module=db status=skip version={from}");
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending_after(from) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        debug!("event=db_migrate_step module=db status=ok version={}", step.version);
    }
    tx.commit()?;

    info!("event=db_migrate module=db status=ok from={from} to={latest}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, latest_version, pending_after, schema_version, MIGRATIONS};
    use crate::db::DbError;
    use rusqlite::Connection;

    #[test]
    fn step_versions_are_contiguous_from_one() {
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(migration.version, index as u32 + 1);
        }
        assert_eq!(pending_after(0).count(), MIGRATIONS.len());
        assert_eq!(pending_after(latest_version()).count(), 0);
    }

    #[test]
    fn fresh_connection_migrates_to_latest_and_is_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert_eq!(schema_version(&conn).unwrap(), 0);

        apply_migrations(&mut conn).unwrap();
        apply_migrations(&mut conn).unwrap();
        assert_eq!(schema_version(&conn).unwrap(), latest_version());

        let table_count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'projects';",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(table_count, 1);
    }

    #[test]
    fn projects_table_rejects_reversed_timestamps() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();

        let err = conn
            .execute(
                "INSERT INTO projects (id, title, description, created_at, updated_at)
                 VALUES ('p-1', 't', 'd',
                         '2024-01-02T00:00:00.000Z', '2024-01-01T00:00:00.000Z');",
                [],
            )
            .unwrap_err();
        assert!(matches!(DbError::from(err), DbError::Sqlite(_)));
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut conn = Connection::open_in_memory().unwrap();
        let newer = latest_version() + 1;
        conn.execute_batch(&format!("PRAGMA user_version = {newer};"))
            .unwrap();

        let err = apply_migrations(&mut conn).unwrap_err();
        assert!(matches!(
            err,
            DbError::UnsupportedSchemaVersion { db_version, .. } if db_version == newer
        ));
        assert_eq!(schema_version(&conn).unwrap(), newer);
    }
}
