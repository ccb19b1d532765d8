//! Core domain logic for the todo service.
//! This crate is the single source of truth for todo invariants.

pub mod contract;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use contract::{
    format_contract_timestamp, to_contract_list, to_contract_todo, ContractTodo,
    CreateTodoRequest, ErrorResponse,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::todo::{Todo, TodoId, TodoValidationError, TODO_TEXT_MAX_CHARS};
pub use repo::memory_repo::InMemoryTodoRepository;
pub use repo::todo_repo::{
    RepoError, RepoResult, SqliteTodoRepository, TodoRepository, TODO_COLUMNS,
};
pub use service::todo_service::{ServiceError, ServiceResult, TodoService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
