//! Document store: the single owner of the planner document.
//!
//! # Responsibility
//! - Load the persisted document or fall back to the built-in default.
//! - Commit whole-document replacements and persist them.
//! - Notify subscribed listeners after every commit.
//!
//! # Invariants
//! - The in-memory document is always structurally valid.
//! - Persistence failures never roll back or corrupt in-memory state.

pub mod codec;
pub mod document_store;
