//! Planner document model.
//!
//! # Responsibility
//! - Define the customer record and the persisted planner document.
//! - Own structural validation shared by load, commit and reassignment paths.
//!
//! # Invariants
//! - A customer id identifies at most one placement.
//! - A customer is either queued or placed, never both.
//! - Schedule entries only reference known customers inside the grid.

pub mod customer;
pub mod dataset;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Structural validation failure for customers and planner documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Customer id is blank after trim.
    BlankCustomerId,
    /// Customer id has leading or trailing whitespace.
    UntrimmedCustomerId(String),
    /// Two customers share one id.
    DuplicateCustomerId(String),
    /// Planner is configured with zero planning days.
    NoPlanningDays,
    /// Planner is configured without any slots.
    NoSlots,
    /// Slot name at the given index is blank after trim.
    BlankSlotName(usize),
    /// Two slots share one name.
    DuplicateSlotName(String),
    /// Schedule key lies outside the configured grid.
    SlotOutOfRange { day: usize, slot: usize },
    /// Schedule entry references a customer that does not exist.
    UnknownCustomer(String),
    /// One customer is placed in more than one slot.
    DuplicatePlacement(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankCustomerId => write!(f, "customer id must not be blank"),
            Self::UntrimmedCustomerId(id) => {
                write!(f, "customer id has surrounding whitespace: `{id}`")
            }
            Self::DuplicateCustomerId(id) => write!(f, "duplicate customer id: {id}"),
            Self::NoPlanningDays => write!(f, "planner must have at least one day"),
            Self::NoSlots => write!(f, "planner must have at least one slot"),
            Self::BlankSlotName(index) => write!(f, "slot name at index {index} is blank"),
            Self::DuplicateSlotName(name) => write!(f, "duplicate slot name: {name}"),
            Self::SlotOutOfRange { day, slot } => {
                write!(f, "schedule key day={day} slot={slot} is outside the grid")
            }
            Self::UnknownCustomer(id) => {
                write!(f, "schedule references unknown customer: {id}")
            }
            Self::DuplicatePlacement(id) => {
                write!(f, "customer placed in more than one slot: {id}")
            }
        }
    }
}

impl Error for ValidationError {}
