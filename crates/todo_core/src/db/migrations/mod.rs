//! Todo schema migrations.
//!
//! # Responsibility
//! - Hold the ordered list of schema steps for the `todos` store.
//! - Run every pending step inside one transaction.
//!
//! # Invariants
//! - Versions start at 1 and increase by exactly one per step.
//! - Steps are written with `IF NOT EXISTS` so a database that already holds a
//!   compatible `todos` table at `user_version = 0` upgrades in place.
//! - `PRAGMA user_version` is only advanced when the whole run commits.

use crate::db::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction};

/// One schema step.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "create_todos",
    sql: include_str!("0001_todos.sql"),
}];

/// Returns the schema version this binary migrates to.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Returns the steps still to run for a database at `current_version`.
pub fn pending_migrations(current_version: u32) -> &'static [Migration] {
    let applied = (current_version as usize).min(MIGRATIONS.len());
    &MIGRATIONS[applied..]
}

/// Migrates the connection to `latest_version()`.
///
/// Returns the number of steps applied (0 when already current).
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the file is ahead of this binary.
/// - `Migration` naming the failed step; earlier steps of the same run are
///   rolled back with it.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let current_version = schema_version(conn)?;
    let latest = latest_version();
    if current_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current_version,
            latest_supported: latest,
        });
    }

    let pending = pending_migrations(current_version);
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for migration in pending {
        run_step(&tx, migration)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={} to_version={} applied={}",
        current_version,
        latest,
        pending.len()
    );
    Ok(pending.len())
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

fn run_step(tx: &Transaction<'_>, migration: &Migration) -> DbResult<()> {
    let result = tx
        .execute_batch(migration.sql)
        .and_then(|()| tx.pragma_update(None, "user_version", migration.version));

    match result {
        Ok(()) => {
            info!(
                "event=db_migration module=db status=ok version={} name={}",
                migration.version, migration.name
            );
            Ok(())
        }
        Err(source) => {
            error!(
                "event=db_migration module=db status=error version={} name={} error={}",
                migration.version, migration.name, source
            );
            Err(DbError::Migration {
                version: migration.version,
                name: migration.name,
                source,
            })
        }
    }
}
