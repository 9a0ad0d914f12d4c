//! JSON encoding of the planner document.
//!
//! # Invariants
//! - `decode_dataset(&encode_dataset(d)?)? == d` for every valid `d`.
//! - Decoding validates structure; a parseable but inconsistent document is
//!   an error, not a value.

use crate::model::dataset::Dataset;
use crate::model::ValidationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    Invalid(ValidationError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed dataset json: {err}"),
            Self::Invalid(err) => write!(f, "invalid dataset: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<ValidationError> for CodecError {
    fn from(value: ValidationError) -> Self {
        Self::Invalid(value)
    }
}

pub fn encode_dataset(dataset: &Dataset) -> Result<String, CodecError> {
    Ok(serde_json::to_string(dataset)?)
}

/// Parses and validates a persisted document.
pub fn decode_dataset(raw: &str) -> Result<Dataset, CodecError> {
    let dataset: Dataset = serde_json::from_str(raw)?;
    dataset.validate()?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::{decode_dataset, encode_dataset, CodecError};
    use crate::model::dataset::Dataset;
    use crate::model::ValidationError;

    #[test]
    fn encoded_dataset_uses_nested_string_keys() {
        let mut dataset = Dataset::default();
        dataset.planner.schedule.insert(0, 1, "customer-1");

        let value: serde_json::Value =
            serde_json::from_str(&encode_dataset(&dataset).unwrap()).unwrap();
        assert_eq!(value["planner"]["schedule"]["0"]["1"], "customer-1");
        assert_eq!(value["planner"]["days"], 7);
        assert_eq!(value["planner"]["slots"][3], "Slot 4");
        assert_eq!(value["customers"][1]["dropoff"], "Location D");
    }

    #[test]
    fn decode_rejects_inconsistent_documents() {
        let raw = serde_json::json!({
            "customers": [],
            "planner": {
                "slots": ["Slot 1"],
                "days": 1,
                "schedule": { "0": { "0": "ghost" } }
            }
        })
        .to_string();

        let err = decode_dataset(&raw).unwrap_err();
        assert!(matches!(
            err,
            CodecError::Invalid(ValidationError::UnknownCustomer(ref id)) if id == "ghost"
        ));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(matches!(decode_dataset("null"), Err(CodecError::Json(_))));
        assert!(matches!(decode_dataset("{"), Err(CodecError::Json(_))));
    }
}
