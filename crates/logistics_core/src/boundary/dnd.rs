//! Drag-and-drop library boundary.
//!
//! # Responsibility
//! - Name drop zones with stable droppable ids.
//! - Collapse the library's drop result into a flat [`DragEvent`].
//!
//! # Invariants
//! - `parse_droppable_id(&droppable_id(loc)) == Some(loc)` for every location.
//! - An unrecognised destination zone counts as a cancelled gesture.

use crate::engine::reassign::DragEvent;
use crate::model::dataset::Location;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Droppable id of the unplaced-customer column.
pub const QUEUE_DROPPABLE_ID: &str = "queue";

static SLOT_DROPPABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^slot-(\d+)-(\d+)$").expect("valid slot droppable regex"));

/// Why the library ended the gesture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DropReason {
    #[default]
    Drop,
    Cancel,
}

/// Zone plus index as reported by the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraggableLocation {
    pub droppable_id: String,
    /// Position within the zone; irrelevant to placement.
    pub index: usize,
}

impl DraggableLocation {
    pub fn new(droppable_id: impl Into<String>, index: usize) -> Self {
        Self {
            droppable_id: droppable_id.into(),
            index,
        }
    }
}

/// Drag-end payload in the library's own shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropResult {
    pub draggable_id: String,
    pub source: DraggableLocation,
    pub destination: Option<DraggableLocation>,
    pub reason: DropReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundaryError {
    /// Source zone id does not map to any location.
    UnknownDroppable(String),
}

impl Display for BoundaryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownDroppable(id) => write!(f, "unknown droppable id: {id}"),
        }
    }
}

impl Error for BoundaryError {}

/// Renders the droppable id for a location.
pub fn droppable_id(location: Location) -> String {
    match location {
        Location::Queue => QUEUE_DROPPABLE_ID.to_string(),
        Location::Slot { day, slot } => format!("slot-{day}-{slot}"),
    }
}

/// Maps a droppable id back to a location.
pub fn parse_droppable_id(id: &str) -> Option<Location> {
    if id == QUEUE_DROPPABLE_ID {
        return Some(Location::Queue);
    }
    let captures = SLOT_DROPPABLE_RE.captures(id)?;
    let day = captures.get(1)?.as_str().parse().ok()?;
    let slot = captures.get(2)?.as_str().parse().ok()?;
    Some(Location::slot(day, slot))
}

/// Converts a library drop result into the engine's event.
///
/// # Errors
/// - `BoundaryError::UnknownDroppable` when the source zone is unrecognised.
pub fn to_drag_event(result: &DropResult) -> Result<DragEvent, BoundaryError> {
    let source = parse_droppable_id(&result.source.droppable_id).ok_or_else(|| {
        BoundaryError::UnknownDroppable(result.source.droppable_id.clone())
    })?;
    let destination = match result.reason {
        DropReason::Cancel => None,
        DropReason::Drop => result
            .destination
            .as_ref()
            .and_then(|destination| parse_droppable_id(&destination.droppable_id)),
    };
    Ok(DragEvent::new(result.draggable_id.clone(), source, destination))
}
