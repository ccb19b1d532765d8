//! Domain model for todo persistence.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep wire-format concerns out of the domain type (see `contract`).
//!
//! # Invariants
//! - Every todo is identified by a stable `TodoId` assigned at construction.

pub mod todo;
