//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the todo data access contract.
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository APIs return semantic errors (`NotFound`, `Conflict`) in
//!   addition to DB transport errors.

pub mod memory_repo;
pub mod todo_repo;
