//! Schema migrations.
//!
//! # Responsibility
//! - Hold the ordered migration registry and bring any database from its
//!   recorded version to the latest.
//!
//! # Invariants
//! - Migrations are append-only; versions are contiguous from 1.
//! - Each pending migration runs inside one transaction together with its
//!   `user_version` bump, so a failure leaves the previous version intact.

use log::info;
use rusqlite::Connection;

use crate::db::{DbError, DbResult};

struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_app_storage.sql"),
}];

/// Newest schema version this build understands.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings `conn` up to the latest schema version.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the database was written
///   by a newer build; nothing is touched.
/// - [`DbError::Sqlite`] when a migration statement fails.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let current: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        let tx = conn.transaction()?;
        tx.execute_batch(migration.sql)?;
        tx.pragma_update(None, "user_version", migration.version)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok version={}",
            migration.version
        );
    }
    Ok(())
}
