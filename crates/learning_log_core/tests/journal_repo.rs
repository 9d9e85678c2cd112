use learning_log_core::db::open_db_in_memory;
use learning_log_core::{
    Entry, Identity, JournalRepository, RepoError, SqliteJournalRepository, Topic,
};
use rusqlite::Connection;
use uuid::Uuid;

fn alice() -> Identity {
    Identity::new("alice")
}

#[test]
fn topic_insert_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::try_new(&conn).unwrap();

    let topic = Topic::new(alice(), "Chess");
    repo.insert_topic(&topic).unwrap();

    let loaded = repo.get_topic(topic.uuid).unwrap().unwrap();
    assert_eq!(loaded, topic);
    assert!(repo.get_topic(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn topics_are_listed_per_owner_oldest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);

    let later = Topic::with_id(Uuid::new_v4(), alice(), "Climbing", 2_000);
    let earlier = Topic::with_id(Uuid::new_v4(), alice(), "Chess", 1_000);
    let foreign = Topic::with_id(Uuid::new_v4(), Identity::new("bob"), "Go", 500);
    repo.insert_topic(&later).unwrap();
    repo.insert_topic(&earlier).unwrap();
    repo.insert_topic(&foreign).unwrap();

    let listed = repo.list_topics_by_owner(&alice()).unwrap();
    let labels: Vec<_> = listed.iter().map(|topic| topic.text.as_str()).collect();
    assert_eq!(labels, vec!["Chess", "Climbing"]);
}

#[test]
fn same_millisecond_topics_keep_insertion_order() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);

    for label in ["first", "second", "third"] {
        repo.insert_topic(&Topic::with_id(Uuid::new_v4(), alice(), label, 42))
            .unwrap();
    }

    let labels: Vec<_> = repo
        .list_topics_by_owner(&alice())
        .unwrap()
        .into_iter()
        .map(|topic| topic.text)
        .collect();
    assert_eq!(labels, vec!["first", "second", "third"]);
}

#[test]
fn entries_are_listed_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);
    let topic = Topic::new(alice(), "Chess");
    repo.insert_topic(&topic).unwrap();

    for (body, at) in [("t1", 1_000), ("t3", 3_000), ("t2", 2_000)] {
        repo.insert_entry(&Entry::with_id(Uuid::new_v4(), topic.uuid, body, at))
            .unwrap();
    }

    let bodies: Vec<_> = repo
        .list_entries_by_topic(topic.uuid)
        .unwrap()
        .into_iter()
        .map(|entry| entry.text)
        .collect();
    assert_eq!(bodies, vec!["t3", "t2", "t1"]);
}

#[test]
fn update_entry_text_replaces_body_only() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);
    let topic = Topic::new(alice(), "Chess");
    repo.insert_topic(&topic).unwrap();
    let entry = Entry::new(topic.uuid, "draft");
    repo.insert_entry(&entry).unwrap();

    repo.update_entry_text(entry.uuid, "final").unwrap();

    let loaded = repo.get_entry(entry.uuid).unwrap().unwrap();
    assert_eq!(loaded.text, "final");
    assert_eq!(loaded.topic_uuid, entry.topic_uuid);
    assert_eq!(loaded.created_at, entry.created_at);
}

#[test]
fn update_and_delete_missing_entry_return_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);
    let missing = Uuid::new_v4();

    let err = repo.update_entry_text(missing, "x").unwrap_err();
    assert!(matches!(err, RepoError::EntryNotFound(id) if id == missing));

    let err = repo.delete_entry(missing).unwrap_err();
    assert!(matches!(err, RepoError::EntryNotFound(id) if id == missing));
}

#[test]
fn delete_entry_removes_row() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteJournalRepository::new(&conn);
    let topic = Topic::new(alice(), "Chess");
    repo.insert_topic(&topic).unwrap();
    let entry = Entry::new(topic.uuid, "gone soon");
    repo.insert_entry(&entry).unwrap();

    repo.delete_entry(entry.uuid).unwrap();

    assert!(repo.get_entry(entry.uuid).unwrap().is_none());
    assert!(repo.list_entries_by_topic(topic.uuid).unwrap().is_empty());
}

#[test]
fn malformed_uuid_row_is_reported_as_invalid_data() {
    let conn = open_db_in_memory().unwrap();
    conn.execute(
        "INSERT INTO topics (uuid, text, owner, created_at) VALUES ('not-a-uuid', 'Chess', 'alice', 1);",
        [],
    )
    .unwrap();
    let repo = SqliteJournalRepository::new(&conn);

    let err = repo.list_topics_by_owner(&alice()).unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}

#[test]
fn try_new_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteJournalRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("topics")));
}
