//! Reassignment engine for drag-end events.
//!
//! # Responsibility
//! - Validate a drag event against the current document.
//! - Apply the configured occupied-slot policy.
//!
//! # Invariants
//! - Cancelled gestures and same-location drops are no-ops checked first.
//! - Unknown customers, stale sources and off-grid targets leave the
//!   document untouched.
//! - Customer records are never rewritten, only their schedule entries.

use crate::model::customer::CustomerId;
use crate::model::dataset::{Dataset, Location};
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Flat drag-end event consumed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragEvent {
    pub customer_id: CustomerId,
    pub source: Location,
    /// `None` when the gesture was cancelled or dropped outside any zone.
    pub destination: Option<Location>,
}

impl DragEvent {
    pub fn new(
        customer_id: impl Into<CustomerId>,
        source: Location,
        destination: Option<Location>,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            source,
            destination,
        }
    }
}

/// What to do when the target slot already holds another customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OccupiedSlotPolicy {
    /// Refuse the drop; nothing moves.
    #[default]
    Reject,
    /// Occupant takes the dragged customer's source location.
    Swap,
    /// Occupant goes back to the queue.
    DisplaceToQueue,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineConfig {
    pub policy: OccupiedSlotPolicy,
}

/// Result classification of one reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Cancelled gesture or drop onto the source location.
    NoOp,
    /// Customer moved into a free slot or back to the queue.
    Moved,
    /// Customer moved and the previous occupant took its old location.
    Swapped { displaced: CustomerId },
    /// Customer moved and the previous occupant returned to the queue.
    Displaced { displaced: CustomerId },
    /// Target slot is occupied and the policy refused the drop.
    RejectedPlacement { occupant: CustomerId },
}

impl MoveOutcome {
    /// Returns whether the produced document differs from the input.
    pub fn changes_dataset(&self) -> bool {
        matches!(
            self,
            Self::Moved | Self::Swapped { .. } | Self::Displaced { .. }
        )
    }
}

/// Next document plus how it was reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    pub dataset: Dataset,
    pub outcome: MoveOutcome,
}

/// Events the engine drops without touching the document.
///
/// These indicate a race between the gesture and an already-applied update,
/// not a user mistake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassignError {
    /// Dragged id is not a known customer.
    InvalidReference(CustomerId),
    /// Event source does not hold the dragged customer any more.
    StaleEvent {
        customer_id: CustomerId,
        claimed: Location,
        actual: Location,
    },
    /// Destination slot lies outside the configured grid.
    OutOfRange(Location),
}

impl Display for ReassignError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidReference(id) => write!(f, "unknown customer: {id}"),
            Self::StaleEvent {
                customer_id,
                claimed,
                actual,
            } => write!(
                f,
                "stale drag event for {customer_id}: claimed source {claimed}, actual {actual}"
            ),
            Self::OutOfRange(location) => write!(f, "destination {location} is outside the grid"),
        }
    }
}

impl Error for ReassignError {}

pub type ReassignResult<T> = Result<T, ReassignError>;

/// Stateless move calculator parameterized by occupied-slot policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReassignmentEngine {
    config: EngineConfig,
}

impl ReassignmentEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn with_policy(policy: OccupiedSlotPolicy) -> Self {
        Self::new(EngineConfig { policy })
    }

    pub fn policy(&self) -> OccupiedSlotPolicy {
        self.config.policy
    }

    /// Computes the document that results from `event`.
    ///
    /// # Errors
    /// - `InvalidReference` when the customer is unknown.
    /// - `StaleEvent` when `event.source` does not hold the customer.
    /// - `OutOfRange` when the destination slot is off-grid.
    pub fn apply(&self, current: &Dataset, event: &DragEvent) -> ReassignResult<Reassignment> {
        let destination = match event.destination {
            Some(destination) if destination != event.source => destination,
            _ => return Ok(unchanged(current, MoveOutcome::NoOp)),
        };

        let actual = current
            .location_of(&event.customer_id)
            .ok_or_else(|| ReassignError::InvalidReference(event.customer_id.clone()))?;
        if actual != event.source {
            return Err(ReassignError::StaleEvent {
                customer_id: event.customer_id.clone(),
                claimed: event.source,
                actual,
            });
        }

        let occupant = match destination {
            Location::Queue => None,
            Location::Slot { day, slot } => {
                if !current.planner.contains(day, slot) {
                    return Err(ReassignError::OutOfRange(destination));
                }
                current
                    .planner
                    .schedule
                    .get(day, slot)
                    .map(str::to_string)
            }
        };

        if let (Some(occupant), OccupiedSlotPolicy::Reject) = (&occupant, self.config.policy) {
            debug!(
                "event=reassign module=engine status=rejected customer={} occupant={} destination={}",
                event.customer_id, occupant, destination
            );
            return Ok(unchanged(
                current,
                MoveOutcome::RejectedPlacement {
                    occupant: occupant.clone(),
                },
            ));
        }

        let mut next = current.clone();
        clear(&mut next, event.source);

        let outcome = match occupant {
            None => MoveOutcome::Moved,
            Some(occupant) if self.config.policy == OccupiedSlotPolicy::Swap => {
                place(&mut next, event.source, &occupant);
                MoveOutcome::Swapped {
                    displaced: occupant,
                }
            }
            Some(occupant) => MoveOutcome::Displaced {
                displaced: occupant,
            },
        };

        // Writing the destination overwrites any occupant entry.
        place(&mut next, destination, &event.customer_id);

        debug!(
            "event=reassign module=engine status=ok customer={} source={} destination={} outcome={:?}",
            event.customer_id, event.source, destination, outcome
        );
        Ok(Reassignment {
            dataset: next,
            outcome,
        })
    }
}

fn unchanged(current: &Dataset, outcome: MoveOutcome) -> Reassignment {
    Reassignment {
        dataset: current.clone(),
        outcome,
    }
}

fn clear(dataset: &mut Dataset, location: Location) {
    if let Location::Slot { day, slot } = location {
        dataset.planner.schedule.remove(day, slot);
    }
}

fn place(dataset: &mut Dataset, location: Location, customer_id: &str) {
    if let Location::Slot { day, slot } = location {
        dataset.planner.schedule.insert(day, slot, customer_id);
    }
}
