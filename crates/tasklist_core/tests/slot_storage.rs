use rusqlite::Connection;
use tasklist_core::db::migrations::latest_version;
use tasklist_core::db::{open_db, open_db_in_memory, DbError};
use tasklist_core::{SlotRepository, SqliteSlotRepository, TaskStore, TASKS_SLOT_KEY};

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_slots');",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match open_db(&path).unwrap_err() {
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
fn sqlite_slot_read_missing_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    assert_eq!(repo.read_slot("absent").unwrap(), None);
}

#[test]
fn sqlite_slot_write_replaces_existing_value() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    repo.write_slot("k", "first").unwrap();
    repo.write_slot("k", "second").unwrap();

    assert_eq!(repo.read_slot("k").unwrap().as_deref(), Some("second"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn store_state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.db");

    let added_id = {
        let conn = open_db(&path).unwrap();
        let mut store = TaskStore::load(SqliteSlotRepository::new(&conn)).unwrap();
        let task = store.add("Buy milk").unwrap().unwrap();
        store.add("Walk dog").unwrap();
        store.set_completed(task.id, true).unwrap();
        task.id
    };

    let conn = open_db(&path).unwrap();
    let store = TaskStore::load(SqliteSlotRepository::new(&conn)).unwrap();
    assert_eq!(store.tasks().len(), 2);
    assert_eq!(store.tasks()[0].id, added_id);
    assert!(store.tasks()[0].completed);
    assert_eq!(store.summary().to_string(), "1 of 2 tasks left");
}

#[test]
fn persisted_slot_uses_plain_record_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let mut store = TaskStore::load(&repo).unwrap();
    let task = store.add("Buy milk").unwrap().unwrap();

    let raw = repo.read_slot(TASKS_SLOT_KEY).unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{ "id": task.id, "text": "Buy milk", "completed": false }])
    );
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
