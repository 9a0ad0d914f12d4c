//! Planner use-case service.
//!
//! # Responsibility
//! - Run the drag-end pipeline: boundary adapter, engine, store commit.
//! - Translate outcomes into UI feedback.
//! - Add and remove customers through whole-document commits.
//!
//! # Invariants
//! - Every document change goes through `DocumentStore::commit`.
//! - Stale and unknown-reference events are dropped quietly, never surfaced
//!   as user-facing failures.

use crate::boundary::dnd::{to_drag_event, BoundaryError, DropResult};
use crate::engine::reassign::{
    DragEvent, MoveOutcome, ReassignError, Reassignment, ReassignmentEngine,
};
use crate::model::customer::{Customer, CustomerId};
use crate::model::dataset::Dataset;
use crate::model::ValidationError;
use crate::storage::KeyValueStorage;
use crate::store::document_store::DocumentStore;
use crate::view::planner_view::PlannerView;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Reason a drag event was dropped without changing the document.
#[derive(Debug)]
pub enum DragError {
    Boundary(BoundaryError),
    Reassign(ReassignError),
    Commit(ValidationError),
}

impl Display for DragError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Boundary(err) => write!(f, "{err}"),
            Self::Reassign(err) => write!(f, "{err}"),
            Self::Commit(err) => write!(f, "commit refused: {err}"),
        }
    }
}

impl Error for DragError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Boundary(err) => Some(err),
            Self::Reassign(err) => Some(err),
            Self::Commit(err) => Some(err),
        }
    }
}

/// What the UI should show after a drag gesture ends.
#[derive(Debug)]
pub enum DragFeedback {
    /// Cancelled or same-zone drop.
    Ignored,
    /// Document changed; `persisted` is false when the write failed.
    Applied { outcome: MoveOutcome, persisted: bool },
    /// Target slot is occupied; show the drop as refused.
    Rejected { occupant: CustomerId },
    /// Event raced with an earlier update and was discarded.
    Dropped(DragError),
}

/// Errors from customer management operations.
#[derive(Debug)]
pub enum PlannerError {
    CustomerNotFound(CustomerId),
    Validation(ValidationError),
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CustomerNotFound(id) => write!(f, "customer not found: {id}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PlannerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CustomerNotFound(_) => None,
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<ValidationError> for PlannerError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Planner facade owning the document store and the engine.
pub struct PlannerService<S: KeyValueStorage> {
    store: DocumentStore<S>,
    engine: ReassignmentEngine,
}

impl<S: KeyValueStorage> PlannerService<S> {
    pub fn new(store: DocumentStore<S>, engine: ReassignmentEngine) -> Self {
        Self { store, engine }
    }

    pub fn store(&self) -> &DocumentStore<S> {
        &self.store
    }

    /// Mutable store access, e.g. for listener registration.
    pub fn store_mut(&mut self) -> &mut DocumentStore<S> {
        &mut self.store
    }

    pub fn dataset(&self) -> &Dataset {
        self.store.current()
    }

    pub fn view(&self) -> PlannerView {
        PlannerView::build(self.store.current())
    }

    /// Handles a drag-end payload from the gesture library.
    pub fn handle_drag_end(&mut self, result: &DropResult) -> DragFeedback {
        match to_drag_event(result) {
            Ok(event) => self.apply_event(&event),
            Err(err) => dropped(DragError::Boundary(err)),
        }
    }

    /// Applies an already-flattened drag event.
    pub fn apply_event(&mut self, event: &DragEvent) -> DragFeedback {
        let reassignment = match self.engine.apply(self.store.current(), event) {
            Ok(reassignment) => reassignment,
            Err(err) => return dropped(DragError::Reassign(err)),
        };

        let Reassignment { dataset, outcome } = reassignment;
        if !outcome.changes_dataset() {
            return match outcome {
                MoveOutcome::RejectedPlacement { occupant } => {
                    info!(
                        "event=drag_end module=service status=rejected customer={} occupant={}",
                        event.customer_id, occupant
                    );
                    DragFeedback::Rejected { occupant }
                }
                _ => DragFeedback::Ignored,
            };
        }

        match self.store.commit(dataset) {
            Ok(status) => DragFeedback::Applied {
                outcome,
                persisted: status.is_persisted(),
            },
            Err(err) => dropped(DragError::Commit(err)),
        }
    }

    /// Creates a customer in the queue and commits it.
    pub fn add_customer(
        &mut self,
        name: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
    ) -> Result<Customer, PlannerError> {
        let customer = Customer::new(name, pickup, dropoff);
        let mut next = self.store.current().clone();
        next.add_customer(customer.clone())?;
        self.store.commit(next)?;
        info!(
            "event=customer_add module=service status=ok customer={}",
            customer.id()
        );
        Ok(customer)
    }

    /// Deletes a customer and any schedule entry referencing it.
    pub fn remove_customer(&mut self, customer_id: &str) -> Result<Customer, PlannerError> {
        let mut next = self.store.current().clone();
        let removed = next
            .remove_customer(customer_id)
            .ok_or_else(|| PlannerError::CustomerNotFound(customer_id.to_string()))?;
        self.store.commit(next)?;
        info!(
            "event=customer_remove module=service status=ok customer={}",
            customer_id
        );
        Ok(removed)
    }
}

fn dropped(err: DragError) -> DragFeedback {
    debug!(
        "event=drag_end module=service status=dropped error={}",
        err
    );
    DragFeedback::Dropped(err)
}
