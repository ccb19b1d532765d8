//! Shared handler state.
//!
//! # Responsibility
//! - Own the single migrated SQLite connection used by every request.
//! - Run synchronous use-case calls on tokio's blocking pool.
//!
//! # Invariants
//! - At most one use-case call touches the connection at a time.
//! - A poisoned connection lock is recovered, not turned into a permanent
//!   error: rusqlite rolls back an open transaction on drop, so a panicking
//!   call cannot leave a partial write behind. `InMemoryTodoRepository`
//!   follows the same policy.

use crate::error::{AppError, AppResult};
use log::warn;
use rusqlite::Connection;
use std::sync::{Arc, Mutex, MutexGuard};
use todo_core::{ServiceResult, SqliteTodoRepository, TodoService};

/// Shared application state available to handlers via `State<AppState>`.
///
/// Cheap to clone; all clones share one SQLite connection.
#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Wraps a migrated connection (see `todo_core::db::open_db`).
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one use-case call on the blocking pool while holding the
    /// connection lock.
    pub async fn with_todo_service<T, F>(&self, call: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: for<'c> FnOnce(&TodoService<SqliteTodoRepository<'c>>) -> ServiceResult<T>
            + Send
            + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = lock_connection(&conn);
            let service = TodoService::new(SqliteTodoRepository::new(&conn));
            call(&service).map_err(AppError::from)
        })
        .await
        .map_err(|err| AppError::Internal(format!("blocking task failed: {err}")))?
    }
}

fn lock_connection(conn: &Mutex<Connection>) -> MutexGuard<'_, Connection> {
    conn.lock().unwrap_or_else(|poisoned| {
        warn!("event=db_lock module=server status=recovered reason=poisoned");
        conn.clear_poison();
        poisoned.into_inner()
    })
}

#[cfg(test)]
mod tests {
    use super::AppState;
    use std::sync::Arc;
    use todo_core::db::open_db_in_memory;
    use todo_core::CreateTodoRequest;

    #[tokio::test]
    async fn panicked_call_does_not_wedge_the_connection() {
        let state = AppState::new(open_db_in_memory().unwrap());

        let conn = Arc::clone(&state.conn);
        let joined = std::thread::spawn(move || {
            let _guard = conn.lock().unwrap();
            panic!("handler panicked while holding the connection");
        })
        .join();
        assert!(joined.is_err());
        assert!(state.conn.is_poisoned());

        let created = state
            .with_todo_service(|service| service.create_todo(&CreateTodoRequest::new("after panic")))
            .await
            .unwrap();
        let todos = state
            .with_todo_service(|service| service.get_all_todos())
            .await
            .unwrap();

        assert_eq!(todos, vec![created]);
        assert!(!state.conn.is_poisoned());
    }
}
