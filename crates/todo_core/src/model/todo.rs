//! Todo domain model.
//!
//! # Responsibility
//! - Define the canonical todo record persisted by repositories.
//! - Provide the single constructing operation that assigns identity.
//!
//! # Invariants
//! - `id` is generated by the constructor, never supplied by callers of
//!   `Todo::new`.
//! - `updated_at == created_at` because no mutation path exists.
//! - `text` is stored verbatim; validation happens in the service layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier of a todo in canonical hyphenated UUID form.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type TodoId = String;

/// Maximum accepted `text` length, in characters.
pub const TODO_TEXT_MAX_CHARS: usize = 500;

/// Canonical persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Globally unique, immutable identifier.
    pub id: TodoId,
    /// User-supplied body, never trimmed or normalized.
    pub text: String,
    /// Instant the todo was constructed.
    pub created_at: DateTime<Utc>,
    /// Instant of the last mutation. Equals `created_at` in current scope.
    pub updated_at: DateTime<Utc>,
}

impl Todo {
    /// Creates a new todo with a generated id stamped at the current instant.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), text, Utc::now())
    }

    /// Creates a todo with a caller-provided id and creation instant.
    ///
    /// Used by import and test paths where identity already exists.
    /// Both timestamps are set to `created_at`.
    pub fn with_id(
        id: impl Into<TodoId>,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            created_at,
            updated_at: created_at,
        }
    }
}

/// Validation failures for todo inputs, raised before storage is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoValidationError {
    EmptyText,
    TextTooLong { chars: usize, max: usize },
    EmptyId,
}

impl Display for TodoValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "todo text cannot be empty"),
            Self::TextTooLong { chars, max } => {
                write!(f, "todo text is {chars} characters; maximum is {max}")
            }
            Self::EmptyId => write!(f, "todo ID cannot be empty"),
        }
    }
}

impl Error for TodoValidationError {}

#[cfg(test)]
mod tests {
    use super::Todo;
    use chrono::{TimeZone, Utc};

    #[test]
    fn new_stamps_both_timestamps_identically() {
        let todo = Todo::new("buy milk");
        assert_eq!(todo.created_at, todo.updated_at);
        assert!(!todo.id.is_empty());
    }

    #[test]
    fn new_keeps_text_verbatim() {
        let todo = Todo::new("  padded\ttext  ");
        assert_eq!(todo.text, "  padded\ttext  ");
    }

    #[test]
    fn new_generates_distinct_ids() {
        let first = Todo::new("a");
        let second = Todo::new("a");
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn with_id_uses_given_identity_and_instant() {
        let created_at = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let todo = Todo::with_id("fixed-id", "imported", created_at);
        assert_eq!(todo.id, "fixed-id");
        assert_eq!(todo.created_at, created_at);
        assert_eq!(todo.updated_at, created_at);
    }
}
