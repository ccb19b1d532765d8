//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Keep HTTP layers decoupled from storage details.

pub mod todo_service;
