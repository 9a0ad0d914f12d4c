//! Drag-and-drop reassignment.
//!
//! # Responsibility
//! - Turn one completed drag gesture into the next planner document.
//! - Enforce placement uniqueness and referential integrity on every move.
//!
//! # Invariants
//! - The input document is never mutated; callers receive a new value.
//! - Failed or rejected moves hand back a document equal to the input.

pub mod reassign;
