//! Todo use-case service.
//!
//! # Responsibility
//! - Validate caller input before any storage access.
//! - Delegate persistence to a `TodoRepository` implementation.
//! - Translate repository errors into caller-facing `ServiceError`s.
//!
//! # Invariants
//! - Validation failures never reach the repository.
//! - Storage failures are wrapped with context; the cause stays reachable
//!   through `Error::source`.
//! - Each operation either fully succeeds or fails without side effects.
//! - Todo text is never written to logs.

use crate::contract::CreateTodoRequest;
use crate::model::todo::{Todo, TodoId, TodoValidationError, TODO_TEXT_MAX_CHARS};
use crate::repo::todo_repo::{RepoError, TodoRepository};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Caller-facing failure of a todo use case.
#[derive(Debug)]
pub enum ServiceError {
    /// Input rejected before touching storage.
    Validation(TodoValidationError),
    /// No todo exists with the requested id.
    NotFound(TodoId),
    /// Backing store failed; `context` names the operation.
    Storage {
        context: &'static str,
        source: RepoError,
    },
}

impl ServiceError {
    fn storage(context: &'static str, source: RepoError) -> Self {
        Self::Storage { context, source }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "todo with ID {id} not found"),
            Self::Storage { context, source } => write!(f, "{context}: {source}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) => None,
            Self::Storage { source, .. } => Some(source),
        }
    }
}

impl From<TodoValidationError> for ServiceError {
    fn from(value: TodoValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Use-case service wrapper for todo operations.
pub struct TodoService<R: TodoRepository> {
    repo: R,
}

impl<R: TodoRepository> TodoService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates `request.text`, builds a new todo and persists it.
    ///
    /// # Errors
    /// - `Validation` when text is empty or longer than 500 characters.
    /// - `Storage` when the repository rejects the write.
    pub fn create_todo(&self, request: &CreateTodoRequest) -> ServiceResult<Todo> {
        if let Err(err) = validate_todo_text(&request.text) {
            warn!("event=todo_create module=service status=rejected reason={err}");
            return Err(err.into());
        }

        let todo = request.to_todo();
        match self.repo.create(&todo) {
            Ok(created) => {
                info!(
                    "event=todo_create module=service status=ok todo_id={} text_chars={}",
                    created.id,
                    created.text.chars().count()
                );
                Ok(created)
            }
            Err(err) => {
                warn!("event=todo_create module=service status=error error={err}");
                Err(ServiceError::storage("failed to create todo", err))
            }
        }
    }

    /// Lists every todo, most recently created first.
    pub fn get_all_todos(&self) -> ServiceResult<Vec<Todo>> {
        match self.repo.get_all() {
            Ok(todos) => {
                info!(
                    "event=todo_list module=service status=ok count={}",
                    todos.len()
                );
                Ok(todos)
            }
            Err(err) => {
                warn!("event=todo_list module=service status=error error={err}");
                Err(ServiceError::storage("failed to get todos", err))
            }
        }
    }

    /// Gets one todo by id.
    ///
    /// # Errors
    /// - `Validation` when `id` is empty.
    /// - `NotFound` carrying `id` when no record matches.
    /// - `Storage` for any other repository failure.
    pub fn get_todo_by_id(&self, id: &str) -> ServiceResult<Todo> {
        if id.is_empty() {
            return Err(TodoValidationError::EmptyId.into());
        }

        match self.repo.get_by_id(id) {
            Ok(todo) => Ok(todo),
            Err(RepoError::NotFound(_)) => {
                info!("event=todo_get module=service status=not_found todo_id={id}");
                Err(ServiceError::NotFound(id.to_string()))
            }
            Err(err) => {
                warn!("event=todo_get module=service status=error todo_id={id} error={err}");
                Err(ServiceError::storage("failed to get todo", err))
            }
        }
    }
}

/// Checks todo text against the 1..=500 character rule.
pub fn validate_todo_text(text: &str) -> Result<(), TodoValidationError> {
    if text.is_empty() {
        return Err(TodoValidationError::EmptyText);
    }

    let chars = text.chars().count();
    if chars > TODO_TEXT_MAX_CHARS {
        return Err(TodoValidationError::TextTooLong {
            chars,
            max: TODO_TEXT_MAX_CHARS,
        });
    }

    Ok(())
}
