use rusqlite::Connection;
use todo_core::db::migrations::{apply_migrations, latest_version, schema_version};
use todo_core::db::{open_db, open_db_in_memory, DbError};
use todo_core::{RepoError, SqliteTodoRepository, TodoRepository, TODO_COLUMNS};

#[test]
fn fresh_store_has_todo_table_columns_and_created_at_index() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert_eq!(todo_columns(&conn), TODO_COLUMNS.to_vec());
    assert!(index_exists(&conn, "idx_todos_created_at"));
    assert!(SqliteTodoRepository::try_new(&conn).is_ok());
}

#[test]
fn reopening_current_store_applies_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.db");
    drop(open_db(&path).unwrap());

    let mut conn = Connection::open(&path).unwrap();
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
}

#[test]
fn unversioned_store_with_existing_todos_is_upgraded_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE todos (
            id TEXT PRIMARY KEY NOT NULL,
            text TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        INSERT INTO todos VALUES ('legacy-1', 'kept across upgrade', 1000, 1000);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), latest_version());
    assert!(index_exists(&conn, "idx_todos_created_at"));

    let todo = SqliteTodoRepository::try_new(&conn)
        .unwrap()
        .get_by_id("legacy-1")
        .unwrap();
    assert_eq!(todo.text, "kept across upgrade");
    assert_eq!(todo.created_at.timestamp_millis(), 1000);
}

#[test]
fn incompatible_legacy_table_fails_migration_and_keeps_version() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("incompatible.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("CREATE TABLE todos (id TEXT PRIMARY KEY, body TEXT);")
        .unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::Migration {
            version: 1,
            name: "create_todos",
            ..
        }
    ));

    let conn = Connection::open(&path).unwrap();
    assert_eq!(schema_version(&conn).unwrap(), 0);
    assert!(!index_exists(&conn, "idx_todos_created_at"));
}

#[test]
fn store_written_by_newer_binary_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::UnsupportedSchemaVersion {
            db_version: 999,
            latest_supported,
        } if latest_supported == latest_version()
    ));
}

#[test]
fn try_new_rejects_store_without_todos_table() {
    let conn = Connection::open_in_memory().unwrap();

    let err = SqliteTodoRepository::try_new(&conn).err().unwrap();
    assert!(matches!(err, RepoError::MissingRequiredTable("todos")));
}

#[test]
fn try_new_names_first_missing_todo_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("CREATE TABLE todos (id TEXT PRIMARY KEY, text TEXT NOT NULL);")
        .unwrap();

    let err = SqliteTodoRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        RepoError::MissingRequiredColumn {
            table: "todos",
            column: "created_at"
        }
    ));
}

fn todo_columns(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("PRAGMA table_info(todos);").unwrap();
    stmt.query_map([], |row| row.get::<_, String>(1))
        .unwrap()
        .collect::<Result<Vec<_>, _>>()
        .unwrap()
}

fn index_exists(conn: &Connection, index_name: &str) -> bool {
    conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'index' AND name = ?1
        );",
        [index_name],
        |row| row.get::<_, i64>(0),
    )
    .unwrap()
        == 1
}
