//! Shared application state.

use crate::config::WebConfig;
use learning_log_core::{JournalConfig, JournalService, SqliteJournalRepository};
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

/// Cloneable handle passed to every handler.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Shared>,
}

struct Shared {
    conn: Mutex<Connection>,
    journal: JournalConfig,
    web: WebConfig,
}

impl AppState {
    /// `conn` must come from `open_db`/`open_db_in_memory` so the schema is
    /// migrated.
    pub fn new(conn: Connection, journal: JournalConfig, web: WebConfig) -> Self {
        Self {
            inner: Arc::new(Shared {
                conn: Mutex::new(conn),
                journal,
                web,
            }),
        }
    }

    pub fn web(&self) -> &WebConfig {
        &self.inner.web
    }

    /// Runs `f` against a journal service bound to the shared connection.
    ///
    /// The connection stays locked for the duration of `f` only; `f` must
    /// not block on anything but the database. A lock poisoned by a panicking
    /// request is taken over: every write is a single autocommit statement, so
    /// the connection holds no half-applied state.
    pub fn with_journal<T, F>(&self, f: F) -> T
    where
        F: FnOnce(&JournalService<SqliteJournalRepository<'_>>) -> T,
    {
        let conn = match self.inner.conn.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("event=db_lock module=web status=recovered reason=poisoned");
                poisoned.into_inner()
            }
        };
        let journal = JournalService::with_config(
            SqliteJournalRepository::new(&conn),
            self.inner.journal.clone(),
        );
        f(&journal)
    }
}
