use learning_log_core::db::migrations::{latest_version, schema_version};
use learning_log_core::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_table_exists(&conn, "topics");
    assert_table_exists(&conn, "entries");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("learning_log.db");

    let conn_first = open_db(&path).unwrap();
    conn_first
        .execute(
            "INSERT INTO topics (uuid, text, owner, created_at) VALUES ('t1', 'Chess', 'alice', 1);",
            [],
        )
        .unwrap();
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second).unwrap(), latest_version());
    let count: i64 = conn_second
        .query_row("SELECT COUNT(*) FROM topics;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn topic_owner_cannot_be_rewritten() {
    let conn = open_db_in_memory().unwrap();
    insert_topic(&conn, "t1", "alice");

    let err = conn
        .execute("UPDATE topics SET owner = 'bob' WHERE uuid = 't1';", [])
        .unwrap_err();
    assert!(err.to_string().contains("topic owner is immutable"));

    conn.execute("UPDATE topics SET text = 'Go' WHERE uuid = 't1';", [])
        .unwrap();
}

#[test]
fn deleting_topic_cascades_to_entries() {
    let conn = open_db_in_memory().unwrap();
    insert_topic(&conn, "t1", "alice");
    conn.execute(
        "INSERT INTO entries (uuid, topic_uuid, text, created_at) VALUES ('e1', 't1', 'body', 2);",
        [],
    )
    .unwrap();

    conn.execute("DELETE FROM topics WHERE uuid = 't1';", [])
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
}

#[test]
fn partially_migrated_database_is_upgraded() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("v1.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(include_str!("../src/db/migrations/0001_init.sql"))
        .unwrap();
    conn.execute_batch("PRAGMA user_version = 1;").unwrap();
    insert_topic(&conn, "t1", "alice");
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert!(conn
        .execute("UPDATE topics SET owner = 'bob' WHERE uuid = 't1';", [])
        .is_err());
}

#[test]
fn entry_requires_existing_topic() {
    let conn = open_db_in_memory().unwrap();
    let result = conn.execute(
        "INSERT INTO entries (uuid, topic_uuid, text, created_at) VALUES ('e1', 'missing', 'body', 2);",
        [],
    );
    assert!(result.is_err());
}

fn insert_topic(conn: &Connection, uuid: &str, owner: &str) {
    conn.execute(
        "INSERT INTO topics (uuid, text, owner, created_at) VALUES (?1, 'Chess', ?2, 1);",
        params![uuid, owner],
    )
    .unwrap();
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
