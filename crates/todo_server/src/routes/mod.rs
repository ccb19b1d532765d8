//! HTTP route groups.
//!
//! # Responsibility
//! - `health`: liveness probe at `/health`.
//! - `todos`: `/api/todos` list/create and `/api/todos/{id}` lookup.
//!
//! # Invariants
//! - Handlers only reach storage through `AppState::with_todo_service`.
//! - Every response body is built from `todo_core::contract` types.

pub mod health;
pub mod todos;
