//! Externally guaranteed wire shapes.
//!
//! # Responsibility
//! - Project domain todos into the public response format.
//! - Define inbound request and error envelope shapes.
//!
//! # Invariants
//! - Response shape is exactly `{id, text, createdAt}`; internal fields such
//!   as `updated_at` never leak.
//! - `createdAt` is UTC with millisecond precision and a literal `Z`.

mod todo_contract;

pub use todo_contract::{
    format_contract_timestamp, to_contract_list, to_contract_todo, ContractTodo,
    CreateTodoRequest, ErrorResponse, CONTRACT_TIMESTAMP_FORMAT,
};
