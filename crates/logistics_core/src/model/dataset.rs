//! Planner document: customers, grid configuration and placements.
//!
//! # Responsibility
//! - Hold the aggregate root that is persisted and transformed as a whole.
//! - Answer placement queries (where is a customer, who occupies a slot).
//!
//! # Invariants
//! - `Dataset::validate()` is the single structural check used on load and
//!   on commit.
//! - Empty day maps are pruned from the schedule, so clearing the last
//!   placement of a day restores the original document shape.

use super::customer::{Customer, CustomerId};
use super::ValidationError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt::{Display, Formatter};

/// Number of planning days in the built-in document.
pub const DEFAULT_DAYS: usize = 7;
/// Slot names of the built-in document.
pub const DEFAULT_SLOT_NAMES: [&str; 4] = ["Slot 1", "Slot 2", "Slot 3", "Slot 4"];

/// Where a customer currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// Unplaced pool.
    Queue,
    /// One cell of the planning grid.
    Slot { day: usize, slot: usize },
}

impl Location {
    pub fn slot(day: usize, slot: usize) -> Self {
        Self::Slot { day, slot }
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queue => write!(f, "queue"),
            Self::Slot { day, slot } => write!(f, "slot(day={day}, slot={slot})"),
        }
    }
}

/// Placements keyed by day index then slot index.
///
/// Serialized as `{"<day>": {"<slot>": "<customer id>"}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Schedule(BTreeMap<usize, BTreeMap<usize, CustomerId>>);

impl<'de> Deserialize<'de> for Schedule {
    /// Drops empty day maps so loaded documents match the pruned shape.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut days = BTreeMap::<usize, BTreeMap<usize, CustomerId>>::deserialize(deserializer)?;
        days.retain(|_, slots| !slots.is_empty());
        Ok(Self(days))
    }
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the customer occupying `(day, slot)`.
    pub fn get(&self, day: usize, slot: usize) -> Option<&str> {
        self.0
            .get(&day)
            .and_then(|slots| slots.get(&slot))
            .map(String::as_str)
    }

    /// Writes a placement and returns the previous occupant.
    pub fn insert(
        &mut self,
        day: usize,
        slot: usize,
        customer_id: impl Into<CustomerId>,
    ) -> Option<CustomerId> {
        self.0.entry(day).or_default().insert(slot, customer_id.into())
    }

    /// Clears a placement and returns the removed occupant.
    pub fn remove(&mut self, day: usize, slot: usize) -> Option<CustomerId> {
        let slots = self.0.get_mut(&day)?;
        let removed = slots.remove(&slot);
        if slots.is_empty() {
            self.0.remove(&day);
        }
        removed
    }

    /// Iterates placements as `(day, slot, customer id)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &str)> + '_ {
        self.0.iter().flat_map(|(day, slots)| {
            slots
                .iter()
                .map(move |(slot, customer_id)| (*day, *slot, customer_id.as_str()))
        })
    }

    /// Finds the first slot holding `customer_id`.
    pub fn position_of(&self, customer_id: &str) -> Option<(usize, usize)> {
        self.iter()
            .find(|(_, _, id)| *id == customer_id)
            .map(|(day, slot, _)| (day, slot))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Grid configuration plus placements; persisted under `planner`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Planner {
    /// Ordered slot names, one column each.
    pub slots: Vec<String>,
    /// Number of planning days, one row each.
    pub days: usize,
    pub schedule: Schedule,
}

impl Planner {
    /// Returns whether `(day, slot)` lies inside the configured grid.
    pub fn contains(&self, day: usize, slot: usize) -> bool {
        day < self.days && slot < self.slots.len()
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SLOT_NAMES.iter().map(|name| name.to_string()).collect(),
            days: DEFAULT_DAYS,
            schedule: Schedule::new(),
        }
    }
}

/// Aggregate root: the unit of persistence and of reassignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    pub customers: Vec<Customer>,
    pub planner: Planner,
}

impl Default for Dataset {
    /// Built-in document used on first start and after a corrupt load.
    fn default() -> Self {
        let customers = [
            ("customer-1", "Customer A", "Location A", "Location B"),
            ("customer-2", "Customer B", "Location C", "Location D"),
        ]
        .into_iter()
        .filter_map(|(id, name, pickup, dropoff)| {
            Customer::with_id(id, name, pickup, dropoff).ok()
        })
        .collect();

        Self {
            customers,
            planner: Planner::default(),
        }
    }
}

impl Dataset {
    /// Checks every structural invariant of the document.
    ///
    /// # Errors
    /// Returns the first violation found, checking customers, then grid
    /// configuration, then placements.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut customer_ids = HashSet::with_capacity(self.customers.len());
        for customer in &self.customers {
            customer.validate()?;
            if !customer_ids.insert(customer.id()) {
                return Err(ValidationError::DuplicateCustomerId(
                    customer.id().to_string(),
                ));
            }
        }

        if self.planner.days == 0 {
            return Err(ValidationError::NoPlanningDays);
        }
        if self.planner.slots.is_empty() {
            return Err(ValidationError::NoSlots);
        }
        let mut slot_names = HashSet::with_capacity(self.planner.slots.len());
        for (index, name) in self.planner.slots.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ValidationError::BlankSlotName(index));
            }
            if !slot_names.insert(name.as_str()) {
                return Err(ValidationError::DuplicateSlotName(name.clone()));
            }
        }

        let mut placed = HashSet::new();
        for (day, slot, customer_id) in self.planner.schedule.iter() {
            if !self.planner.contains(day, slot) {
                return Err(ValidationError::SlotOutOfRange { day, slot });
            }
            if !customer_ids.contains(customer_id) {
                return Err(ValidationError::UnknownCustomer(customer_id.to_string()));
            }
            if !placed.insert(customer_id) {
                return Err(ValidationError::DuplicatePlacement(customer_id.to_string()));
            }
        }

        Ok(())
    }

    /// Looks up one customer record by id.
    pub fn customer(&self, customer_id: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| customer.id() == customer_id)
    }

    /// Returns the current location of a customer, or `None` when unknown.
    pub fn location_of(&self, customer_id: &str) -> Option<Location> {
        self.customer(customer_id)?;
        Some(
            self.planner
                .schedule
                .position_of(customer_id)
                .map_or(Location::Queue, |(day, slot)| Location::slot(day, slot)),
        )
    }

    /// Returns unplaced customers in declaration order.
    pub fn queue(&self) -> Vec<&Customer> {
        let placed: HashSet<&str> = self
            .planner
            .schedule
            .iter()
            .map(|(_, _, customer_id)| customer_id)
            .collect();
        self.customers
            .iter()
            .filter(|customer| !placed.contains(customer.id()))
            .collect()
    }

    /// Same as [`Dataset::queue`] but yields ids only.
    pub fn queue_ids(&self) -> Vec<&str> {
        self.queue().into_iter().map(Customer::id).collect()
    }

    /// Appends a customer to the unplaced pool.
    ///
    /// # Errors
    /// - `ValidationError::DuplicateCustomerId` when the id is taken.
    pub fn add_customer(&mut self, customer: Customer) -> Result<(), ValidationError> {
        customer.validate()?;
        if self.customer(customer.id()).is_some() {
            return Err(ValidationError::DuplicateCustomerId(
                customer.id().to_string(),
            ));
        }
        self.customers.push(customer);
        Ok(())
    }

    /// Removes a customer together with its schedule entry.
    pub fn remove_customer(&mut self, customer_id: &str) -> Option<Customer> {
        let index = self
            .customers
            .iter()
            .position(|customer| customer.id() == customer_id)?;
        if let Some((day, slot)) = self.planner.schedule.position_of(customer_id) {
            self.planner.schedule.remove(day, slot);
        }
        Some(self.customers.remove(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{Dataset, Location, Schedule};
    use crate::model::customer::Customer;
    use crate::model::ValidationError;

    #[test]
    fn default_dataset_is_valid_and_fully_queued() {
        let dataset = Dataset::default();
        dataset.validate().unwrap();
        assert_eq!(dataset.queue_ids(), vec!["customer-1", "customer-2"]);
        assert_eq!(dataset.planner.days, 7);
        assert_eq!(dataset.planner.slots.len(), 4);
        assert!(dataset.planner.schedule.is_empty());
    }

    #[test]
    fn schedule_remove_prunes_empty_days() {
        let mut schedule = Schedule::new();
        schedule.insert(2, 1, "customer-1");
        assert_eq!(schedule.remove(2, 1).as_deref(), Some("customer-1"));
        assert_eq!(schedule, Schedule::new());
        assert_eq!(schedule.remove(2, 1), None);
    }

    #[test]
    fn location_of_reports_queue_slot_and_unknown() {
        let mut dataset = Dataset::default();
        dataset.planner.schedule.insert(1, 2, "customer-1");

        assert_eq!(dataset.location_of("customer-1"), Some(Location::slot(1, 2)));
        assert_eq!(dataset.location_of("customer-2"), Some(Location::Queue));
        assert_eq!(dataset.location_of("customer-404"), None);
    }

    #[test]
    fn validate_rejects_structural_violations() {
        let mut out_of_range = Dataset::default();
        out_of_range.planner.schedule.insert(7, 0, "customer-1");
        assert_eq!(
            out_of_range.validate().unwrap_err(),
            ValidationError::SlotOutOfRange { day: 7, slot: 0 }
        );

        let mut unknown = Dataset::default();
        unknown.planner.schedule.insert(0, 0, "ghost");
        assert_eq!(
            unknown.validate().unwrap_err(),
            ValidationError::UnknownCustomer("ghost".to_string())
        );

        let mut twice = Dataset::default();
        twice.planner.schedule.insert(0, 0, "customer-1");
        twice.planner.schedule.insert(0, 1, "customer-1");
        assert_eq!(
            twice.validate().unwrap_err(),
            ValidationError::DuplicatePlacement("customer-1".to_string())
        );

        let mut no_slots = Dataset::default();
        no_slots.planner.slots.clear();
        assert_eq!(no_slots.validate().unwrap_err(), ValidationError::NoSlots);

        let mut no_days = Dataset::default();
        no_days.planner.days = 0;
        assert_eq!(no_days.validate().unwrap_err(), ValidationError::NoPlanningDays);
    }

    #[test]
    fn add_customer_rejects_duplicate_ids() {
        let mut dataset = Dataset::default();
        let duplicate = Customer::with_id("customer-1", "Other", "X", "Y").unwrap();
        assert_eq!(
            dataset.add_customer(duplicate).unwrap_err(),
            ValidationError::DuplicateCustomerId("customer-1".to_string())
        );
        assert_eq!(dataset.customers.len(), 2);
    }

    #[test]
    fn remove_customer_clears_its_placement() {
        let mut dataset = Dataset::default();
        dataset.planner.schedule.insert(3, 3, "customer-2");

        let removed = dataset.remove_customer("customer-2").unwrap();
        assert_eq!(removed.id(), "customer-2");
        assert!(dataset.planner.schedule.is_empty());
        dataset.validate().unwrap();
        assert!(dataset.remove_customer("customer-2").is_none());
    }
}
