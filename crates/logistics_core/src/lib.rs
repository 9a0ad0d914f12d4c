//! Core domain logic for the logistics planner.
//! This crate owns the planner document, drag reassignment and persistence.

pub mod boundary;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;
pub mod storage;
pub mod store;
pub mod view;

pub use boundary::dnd::{
    droppable_id, parse_droppable_id, to_drag_event, BoundaryError, DraggableLocation,
    DropReason, DropResult, QUEUE_DROPPABLE_ID,
};
pub use engine::reassign::{
    DragEvent, EngineConfig, MoveOutcome, OccupiedSlotPolicy, ReassignError, ReassignResult,
    Reassignment, ReassignmentEngine,
};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::customer::{Customer, CustomerId};
pub use model::dataset::{Dataset, Location, Planner, Schedule, DEFAULT_DAYS, DEFAULT_SLOT_NAMES};
pub use model::ValidationError;
pub use service::planner_service::{DragError, DragFeedback, PlannerError, PlannerService};
pub use storage::{
    open_db, open_db_in_memory, KeyValueStorage, MemoryStorage, SqliteStorage, StorageError,
    StorageResult,
};
pub use store::codec::{decode_dataset, encode_dataset, CodecError};
pub use store::document_store::{
    CommitStatus, CorruptPersistedState, DocumentStore, LoadSource, PersistenceFailure,
    StoreOptions, SubscriptionId, DEFAULT_STORAGE_KEY,
};
pub use view::planner_view::{DayRow, PlannerView, SlotCell};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
