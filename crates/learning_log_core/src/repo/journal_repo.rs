//! Topic/entry repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the storage operations behind the journal service.
//! - Keep row parsing strict: malformed persisted rows are reported, not
//!   masked.
//!
//! # Invariants
//! - Topic lists are ordered by `created_at ASC, rowid ASC`.
//! - Entry lists are ordered by `created_at DESC, rowid DESC`.
//! - No write path touches `topics.owner` after insert.

use crate::db::DbError;
use crate::model::entry::{Entry, EntryId};
use crate::model::identity::Identity;
use crate::model::topic::{Topic, TopicId};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const TOPIC_SELECT_SQL: &str = "SELECT uuid, text, owner, created_at FROM topics";
const ENTRY_SELECT_SQL: &str = "SELECT uuid, topic_uuid, text, created_at FROM entries";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    EntryNotFound(EntryId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::EntryNotFound(id) => write!(f, "entry not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted journal data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "journal schema is missing table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Storage operations required by the journal service.
pub trait JournalRepository {
    fn insert_topic(&self, topic: &Topic) -> RepoResult<()>;
    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>>;
    /// Topics owned by `owner`, oldest first.
    fn list_topics_by_owner(&self, owner: &Identity) -> RepoResult<Vec<Topic>>;
    fn insert_entry(&self, entry: &Entry) -> RepoResult<()>;
    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>>;
    /// Entries under `topic_id`, newest first.
    fn list_entries_by_topic(&self, topic_id: TopicId) -> RepoResult<Vec<Entry>>;
    /// Replaces the entry body. Fails with `EntryNotFound` when no row matched.
    fn update_entry_text(&self, id: EntryId, text: &str) -> RepoResult<()>;
    /// Hard-deletes one entry. Fails with `EntryNotFound` when no row matched.
    fn delete_entry(&self, id: EntryId) -> RepoResult<()>;
}

/// SQLite-backed journal repository over a migrated connection.
pub struct SqliteJournalRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteJournalRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Like `new`, but first verifies the journal tables exist.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        for table in ["topics", "entries"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self::new(conn))
    }
}

impl JournalRepository for SqliteJournalRepository<'_> {
    fn insert_topic(&self, topic: &Topic) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO topics (uuid, text, owner, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                topic.uuid.to_string(),
                topic.text.as_str(),
                topic.owner.as_str(),
                topic.created_at,
            ],
        )?;
        Ok(())
    }

    fn get_topic(&self, id: TopicId) -> RepoResult<Option<Topic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TOPIC_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_topic_row(row)?));
        }

        Ok(None)
    }

    fn list_topics_by_owner(&self, owner: &Identity) -> RepoResult<Vec<Topic>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TOPIC_SELECT_SQL}
             WHERE owner = ?1
             ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([owner.as_str()])?;
        let mut topics = Vec::new();
        while let Some(row) = rows.next()? {
            topics.push(parse_topic_row(row)?);
        }
        Ok(topics)
    }

    fn insert_entry(&self, entry: &Entry) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO entries (uuid, topic_uuid, text, created_at) VALUES (?1, ?2, ?3, ?4);",
            params![
                entry.uuid.to_string(),
                entry.topic_uuid.to_string(),
                entry.text.as_str(),
                entry.created_at,
            ],
        )?;
        Ok(())
    }

    fn get_entry(&self, id: EntryId) -> RepoResult<Option<Entry>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ENTRY_SELECT_SQL} WHERE uuid = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_entry_row(row)?));
        }

        Ok(None)
    }

    fn list_entries_by_topic(&self, topic_id: TopicId) -> RepoResult<Vec<Entry>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ENTRY_SELECT_SQL}
             WHERE topic_uuid = ?1
             ORDER BY created_at DESC, rowid DESC;"
        ))?;
        let mut rows = stmt.query([topic_id.to_string()])?;
        let mut entries = Vec::new();
        while let Some(row) = rows.next()? {
            entries.push(parse_entry_row(row)?);
        }
        Ok(entries)
    }

    fn update_entry_text(&self, id: EntryId, text: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE entries SET text = ?2 WHERE uuid = ?1;",
            params![id.to_string(), text],
        )?;
        if changed == 0 {
            return Err(RepoError::EntryNotFound(id));
        }
        Ok(())
    }

    fn delete_entry(&self, id: EntryId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM entries WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::EntryNotFound(id));
        }
        Ok(())
    }
}

fn parse_topic_row(row: &Row<'_>) -> RepoResult<Topic> {
    let uuid = parse_uuid(row.get("uuid")?, "topics.uuid")?;
    let owner: String = row.get("owner")?;
    if owner.is_empty() {
        return Err(RepoError::InvalidData(format!(
            "empty owner for topic {uuid} in topics.owner"
        )));
    }
    Ok(Topic::with_id(
        uuid,
        Identity::new(owner),
        row.get::<_, String>("text")?,
        row.get("created_at")?,
    ))
}

fn parse_entry_row(row: &Row<'_>) -> RepoResult<Entry> {
    Ok(Entry::with_id(
        parse_uuid(row.get("uuid")?, "entries.uuid")?,
        parse_uuid(row.get("topic_uuid")?, "entries.topic_uuid")?,
        row.get::<_, String>("text")?,
        row.get("created_at")?,
    ))
}

fn parse_uuid(value: String, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(&value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(found.is_some())
}
