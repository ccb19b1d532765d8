//! Todo repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the `{create, get_all, get_by_id}` capability set over a store.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `create` is the only path that introduces a new identity; uniqueness is
//!   enforced by the `todos.id` primary key.
//! - `get_all` orders by `created_at DESC, id ASC`.
//! - `get_by_id` reports a missing row as `RepoError::NotFound`, never as a
//!   transport error.
//! - Read paths reject undecodable rows instead of masking them.

use crate::db::DbError;
use crate::model::todo::{Todo, TodoId};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const TODO_SELECT_SQL: &str = "SELECT
    id,
    text,
    created_at,
    updated_at
FROM todos";

/// Columns every `todos` table must carry.
pub const TODO_COLUMNS: [&str; 4] = ["id", "text", "created_at", "updated_at"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for todo persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Transport or SQL failure from the backing store.
    Db(DbError),
    /// No record matches the requested id.
    NotFound(TodoId),
    /// A record with this id already exists.
    Conflict(TodoId),
    /// A persisted row could not be decoded.
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo not found: {id}"),
            Self::Conflict(id) => write!(f, "todo already exists: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted todo data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::Conflict(_)
            | Self::InvalidData(_)
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
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

/// Persistence contract for todos.
///
/// Any backend (SQLite table, in-memory map) may implement this; services
/// stay storage-agnostic by depending only on the trait.
pub trait TodoRepository {
    /// Persists a fully-formed todo and returns the stored value, which may
    /// carry normalized fields (e.g. millisecond timestamp precision).
    fn create(&self, todo: &Todo) -> RepoResult<Todo>;
    /// Returns every todo, most recently created first.
    fn get_all(&self) -> RepoResult<Vec<Todo>>;
    /// Returns one todo or `RepoError::NotFound`.
    fn get_by_id(&self, id: &str) -> RepoResult<Todo>;
}

impl<R: TodoRepository + ?Sized> TodoRepository for &R {
    fn create(&self, todo: &Todo) -> RepoResult<Todo> {
        (**self).create(todo)
    }

    fn get_all(&self) -> RepoResult<Vec<Todo>> {
        (**self).get_all()
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Todo> {
        (**self).get_by_id(id)
    }
}

/// SQLite-backed todo repository.
pub struct SqliteTodoRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTodoRepository<'conn> {
    /// Wraps a connection that is known to be migrated (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Constructs a repository after verifying the `todos` schema exists.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_todo_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TodoRepository for SqliteTodoRepository<'_> {
    fn create(&self, todo: &Todo) -> RepoResult<Todo> {
        // The returned value is derived from the exact column values written,
        // so a successful insert is the whole operation.
        let created_ms = todo.created_at.timestamp_millis();
        let updated_ms = todo.updated_at.timestamp_millis();
        let persisted = Todo {
            id: todo.id.clone(),
            text: todo.text.clone(),
            created_at: millis_to_instant(created_ms, "created_at")?,
            updated_at: millis_to_instant(updated_ms, "updated_at")?,
        };

        let inserted = self.conn.execute(
            "INSERT INTO todos (
                id,
                text,
                created_at,
                updated_at
            ) VALUES (?1, ?2, ?3, ?4);",
            params![
                persisted.id.as_str(),
                persisted.text.as_str(),
                created_ms,
                updated_ms,
            ],
        );

        match inserted {
            Ok(_) => Ok(persisted),
            Err(err) => {
                let err = DbError::from(err);
                if err.is_constraint_violation() {
                    return Err(RepoError::Conflict(todo.id.clone()));
                }
                Err(err.into())
            }
        }
    }

    fn get_all(&self) -> RepoResult<Vec<Todo>> {
        let mut stmt = self.conn.prepare(&format!(
            "{TODO_SELECT_SQL} ORDER BY created_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut todos = Vec::new();

        while let Some(row) = rows.next()? {
            todos.push(parse_todo_row(row)?);
        }

        Ok(todos)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Todo> {
        let mut stmt = self
            .conn
            .prepare(&format!("{TODO_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return parse_todo_row(row);
        }

        Err(RepoError::NotFound(id.to_string()))
    }
}

fn parse_todo_row(row: &Row<'_>) -> RepoResult<Todo> {
    let id: String = row.get("id")?;
    let created_at = millis_to_instant(row.get("created_at")?, "created_at")?;
    let updated_at = millis_to_instant(row.get("updated_at")?, "updated_at")?;

    Ok(Todo {
        id,
        text: row.get("text")?,
        created_at,
        updated_at,
    })
}

fn millis_to_instant(value: i64, column: &str) -> RepoResult<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_millis(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "timestamp `{value}` out of range in todos.{column}"
        ))
    })
}

fn ensure_todo_connection_ready(conn: &Connection) -> RepoResult<()> {
    if !table_exists(conn, "todos")? {
        return Err(RepoError::MissingRequiredTable("todos"));
    }

    for column in TODO_COLUMNS {
        if !table_has_column(conn, "todos", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "todos",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
