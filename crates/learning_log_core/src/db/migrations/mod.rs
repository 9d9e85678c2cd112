//! Journal schema migrations.
//!
//! # Invariants
//! - Step versions start at 1 and increase by one.
//! - Each step runs in its own transaction together with the
//!   `user_version` bump, so a failed step leaves the previous version intact.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// One schema step, identified by the `user_version` it produces.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub name: &'static str,
    sql: &'static str,
}

static STEPS: [Migration; 2] = [
    Migration {
        version: 1,
        name: "init",
        sql: include_str!("0001_init.sql"),
    },
    Migration {
        version: 2,
        name: "topic_owner_guard",
        sql: include_str!("0002_topic_owner_guard.sql"),
    },
];

/// Schema version this build migrates to.
pub fn latest_version() -> u32 {
    STEPS.len() as u32
}

/// Reads `PRAGMA user_version`.
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Steps not yet applied to a database at `version`.
pub fn pending(version: u32) -> impl Iterator<Item = &'static Migration> {
    STEPS.iter().filter(move |step| step.version > version)
}

/// Brings the schema up to `latest_version()`.
///
/// Fails with `UnsupportedSchemaVersion` when the file was written by a newer
/// build.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    if found > latest_version() {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: found,
            latest_supported: latest_version(),
        });
    }

    for step in pending(found) {
        let tx = conn.transaction()?;
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        tx.commit()?;
        info!(
            "event=db_migrate module=db status=ok from={found} version={} name={}",
            step.version, step.name
        );
    }
    Ok(())
}
