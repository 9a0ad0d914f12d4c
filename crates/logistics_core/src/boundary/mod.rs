//! Adapters between external UI collaborators and the core.
//!
//! # Responsibility
//! - Keep gesture-library shapes out of engine and store code.

pub mod dnd;
