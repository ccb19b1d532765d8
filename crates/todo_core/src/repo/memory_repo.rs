//! In-memory todo repository.
//!
//! Mirrors the SQLite backend's contract (ordering, not-found and conflict
//! signals) without a database. Timestamps are kept at full precision.

use crate::model::todo::{Todo, TodoId};
use crate::repo::todo_repo::{RepoError, RepoResult, TodoRepository};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Mutex-guarded map keyed by todo id.
#[derive(Debug, Default)]
pub struct InMemoryTodoRepository {
    todos: Mutex<HashMap<TodoId, Todo>>,
}

impl InMemoryTodoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored todos.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TodoId, Todo>> {
        // A panic while holding the lock cannot leave a half-written entry:
        // every mutation is a single `insert`, so poisoning is recovered.
        self.todos
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TodoRepository for InMemoryTodoRepository {
    fn create(&self, todo: &Todo) -> RepoResult<Todo> {
        let mut todos = self.lock();
        if todos.contains_key(&todo.id) {
            return Err(RepoError::Conflict(todo.id.clone()));
        }
        todos.insert(todo.id.clone(), todo.clone());
        Ok(todo.clone())
    }

    fn get_all(&self) -> RepoResult<Vec<Todo>> {
        let mut todos = self.lock().values().cloned().collect::<Vec<_>>();
        todos.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(todos)
    }

    fn get_by_id(&self, id: &str) -> RepoResult<Todo> {
        self.lock()
            .get(id)
            .cloned()
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::InMemoryTodoRepository;
    use crate::model::todo::Todo;
    use crate::repo::todo_repo::{RepoError, TodoRepository};
    use chrono::{DateTime, Utc};

    fn at_millis(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(ms).unwrap()
    }

    #[test]
    fn get_all_on_empty_store_returns_empty_vec() {
        let repo = InMemoryTodoRepository::new();
        assert!(repo.get_all().unwrap().is_empty());
        assert!(repo.is_empty());
    }

    #[test]
    fn get_all_orders_newest_first() {
        let repo = InMemoryTodoRepository::new();
        repo.create(&Todo::with_id("old", "first", at_millis(1000)))
            .unwrap();
        repo.create(&Todo::with_id("new", "second", at_millis(2000)))
            .unwrap();

        let ids = repo
            .get_all()
            .unwrap()
            .into_iter()
            .map(|todo| todo.id)
            .collect::<Vec<_>>();
        assert_eq!(ids, vec!["new", "old"]);
    }

    #[test]
    fn duplicate_id_is_a_conflict() {
        let repo = InMemoryTodoRepository::new();
        let todo = Todo::new("once");
        repo.create(&todo).unwrap();

        let err = repo.create(&todo).unwrap_err();
        assert!(matches!(err, RepoError::Conflict(id) if id == todo.id));
        assert_eq!(repo.len(), 1);
    }

    #[test]
    fn get_by_id_missing_returns_not_found() {
        let repo = InMemoryTodoRepository::new();
        let err = repo.get_by_id("missing").unwrap_err();
        assert!(matches!(err, RepoError::NotFound(id) if id == "missing"));
    }
}
