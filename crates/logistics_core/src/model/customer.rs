//! Customer domain record.
//!
//! # Responsibility
//! - Define the logistics job that gets dragged between queue and grid.
//!
//! # Invariants
//! - `id` is non-blank and never changes once created.
//! - Records are immutable; only their placement moves.

use super::ValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable customer identity, also used as the draggable id in the UI.
pub type CustomerId = String;

const GENERATED_ID_PREFIX: &str = "customer-";

/// A logistics job with a pickup and a dropoff location.
///
/// Fields are private so a record cannot be edited after creation; rebuild
/// the record instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    pickup: String,
    dropoff: String,
}

impl Customer {
    /// Creates a customer with a caller-provided id.
    ///
    /// # Errors
    /// - `ValidationError::BlankCustomerId` when `id` is blank after trim.
    pub fn with_id(
        id: impl Into<String>,
        name: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let customer = Self {
            id: id.into().trim().to_string(),
            name: name.into(),
            pickup: pickup.into(),
            dropoff: dropoff.into(),
        };
        customer.validate()?;
        Ok(customer)
    }

    /// Creates a customer with a freshly generated `customer-<uuid>` id.
    pub fn new(
        name: impl Into<String>,
        pickup: impl Into<String>,
        dropoff: impl Into<String>,
    ) -> Self {
        Self {
            id: format!("{GENERATED_ID_PREFIX}{}", Uuid::new_v4()),
            name: name.into(),
            pickup: pickup.into(),
            dropoff: dropoff.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pickup(&self) -> &str {
        &self.pickup
    }

    pub fn dropoff(&self) -> &str {
        &self.dropoff
    }

    /// Checks record-level invariants.
    ///
    /// Deserialized records bypass the constructors, so document validation
    /// calls this for every customer.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let trimmed = self.id.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankCustomerId);
        }
        if trimmed != self.id {
            return Err(ValidationError::UntrimmedCustomerId(self.id.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Customer;
    use crate::model::ValidationError;

    #[test]
    fn with_id_trims_and_rejects_blank_ids() {
        let customer = Customer::with_id(" customer-9 ", "N", "P", "D").unwrap();
        assert_eq!(customer.id(), "customer-9");

        let err = Customer::with_id("   ", "N", "P", "D").unwrap_err();
        assert_eq!(err, ValidationError::BlankCustomerId);
    }

    #[test]
    fn validate_rejects_ids_with_surrounding_whitespace() {
        let customer: Customer = serde_json::from_value(serde_json::json!({
            "id": " customer-1 ",
            "name": "Customer A",
            "pickup": "Location A",
            "dropoff": "Location B"
        }))
        .unwrap();

        assert_eq!(
            customer.validate().unwrap_err(),
            ValidationError::UntrimmedCustomerId(" customer-1 ".to_string())
        );
    }

    #[test]
    fn new_generates_distinct_prefixed_ids() {
        let first = Customer::new("A", "P", "D");
        let second = Customer::new("A", "P", "D");
        assert!(first.id().starts_with("customer-"));
        assert_ne!(first.id(), second.id());
        assert!(first.validate().is_ok());
    }
}
