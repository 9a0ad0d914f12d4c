//! Render-ready projection of the planner document.
//!
//! # Responsibility
//! - Resolve queue ids and schedule entries into customer records.
//! - Attach droppable ids so the view and the boundary adapter agree.

use crate::boundary::dnd::{droppable_id, QUEUE_DROPPABLE_ID};
use crate::model::customer::Customer;
use crate::model::dataset::{Dataset, Location};
use serde::Serialize;

/// One grid cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotCell {
    pub slot: usize,
    pub droppable_id: String,
    pub customer: Option<Customer>,
}

/// One planning day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayRow {
    /// Offset from today.
    pub day: usize,
    pub cells: Vec<SlotCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannerView {
    pub queue_droppable_id: String,
    pub queue: Vec<Customer>,
    /// Column headers.
    pub slots: Vec<String>,
    pub days: Vec<DayRow>,
}

impl PlannerView {
    /// Builds the view from a committed document.
    pub fn build(dataset: &Dataset) -> Self {
        let planner = &dataset.planner;
        let days = (0..planner.days)
            .map(|day| DayRow {
                day,
                cells: (0..planner.slots.len())
                    .map(|slot| SlotCell {
                        slot,
                        droppable_id: droppable_id(Location::slot(day, slot)),
                        customer: planner
                            .schedule
                            .get(day, slot)
                            .and_then(|customer_id| dataset.customer(customer_id))
                            .cloned(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            queue_droppable_id: QUEUE_DROPPABLE_ID.to_string(),
            queue: dataset.queue().into_iter().cloned().collect(),
            slots: planner.slots.clone(),
            days,
        }
    }

    /// Number of occupied cells.
    pub fn placed_count(&self) -> usize {
        self.days
            .iter()
            .flat_map(|row| row.cells.iter())
            .filter(|cell| cell.customer.is_some())
            .count()
    }
}
