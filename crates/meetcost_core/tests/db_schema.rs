//! Database bootstrap and migration behavior.

use meetcost_core::db::{migrations, open_db, open_db_in_memory, DbError};
use rusqlite::Connection;

fn user_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn in_memory_databases_get_the_full_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(user_version(&conn), migrations::latest_version());

    conn.execute(
        "INSERT INTO app_storage (key, value) VALUES ('scratch', '[]');",
        [],
    )
    .unwrap();
    let value: String = conn
        .query_row(
            "SELECT value FROM app_storage WHERE key = 'scratch';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "[]");
}

#[test]
fn each_in_memory_database_is_independent() {
    let first = open_db_in_memory().unwrap();
    first
        .execute(
            "INSERT INTO app_storage (key, value) VALUES ('scratch', 'x');",
            [],
        )
        .unwrap();

    let second = open_db_in_memory().unwrap();
    let count: u32 = second
        .query_row("SELECT COUNT(*) FROM app_storage;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 0);
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meetcost.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        assert_eq!(user_version(&conn), migrations::latest_version());
        conn.execute(
            "INSERT INTO app_storage (key, value) VALUES ('scratch', 'kept');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(user_version(&conn), migrations::latest_version());
    let value: String = conn
        .query_row(
            "SELECT value FROM app_storage WHERE key = 'scratch';",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(value, "kept");
}

#[test]
fn databases_from_a_newer_build_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meetcost.sqlite3");

    {
        open_db(&path).unwrap();
    }
    {
        let conn = Connection::open(&path).unwrap();
        conn.pragma_update(None, "user_version", 99).unwrap();
    }

    match open_db(&path) {
        Err(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 99);
            assert_eq!(latest_supported, migrations::latest_version());
        }
        other => panic!("expected a schema rejection, got {other:?}"),
    }
}
