//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate boundary, engine and store calls into use-case APIs.
//! - Keep UI shells decoupled from storage details.

pub mod planner_service;
