//! Validation error types for API payload decoding.
//!
//! This module defines the errors reported when a JSON response body does
//! not match the schema of the model it is decoded into.

use std::fmt;

/// Errors that can occur while validating a payload against a model schema.
///
/// Field paths use wire names and array indices, e.g.
/// `hits[0].amsDetailMapping[1].weight`.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A required field is missing from the payload.
    MissingRequiredField {
        /// The path to the missing field (e.g., "hits[2].cover").
        field_path: String,
    },

    /// A field has an invalid JSON type.
    InvalidType {
        /// The path to the field with the wrong type.
        field_path: String,
        /// The expected type according to the schema.
        expected: String,
        /// The actual JSON type found in the payload.
        found: String,
    },

    /// A string field does not parse as the declared format (URL, date-time).
    InvalidFormat {
        /// The path to the malformed field.
        field_path: String,
        /// The expected format.
        expected: String,
        /// Why parsing failed.
        reason: String,
    },

    /// The payload passed schema validation but serde rejected it.
    Deserialize(String),

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Collect every offending field path carried by this error.
    pub fn field_paths(&self) -> Vec<&str> {
        match self {
            ValidationError::MissingRequiredField { field_path }
            | ValidationError::InvalidType { field_path, .. }
            | ValidationError::InvalidFormat { field_path, .. } => vec![field_path.as_str()],
            ValidationError::Deserialize(_) => Vec::new(),
            ValidationError::Multiple(errors) => {
                errors.iter().flat_map(|e| e.field_paths()).collect()
            }
        }
    }

    /// Fold a list of collected errors into a single error.
    ///
    /// Returns `None` when the list is empty.
    pub(crate) fn from_collected(mut errors: Vec<ValidationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ValidationError::Multiple(errors)),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingRequiredField { field_path } => {
                write!(f, "Missing required field: {}", field_path)
            }
            ValidationError::InvalidType {
                field_path,
                expected,
                found,
            } => {
                write!(
                    f,
                    "Invalid type for field '{}': expected {}, found {}",
                    field_path, expected, found
                )
            }
            ValidationError::InvalidFormat {
                field_path,
                expected,
                reason,
            } => {
                write!(
                    f,
                    "Field '{}' is not a valid {}: {}",
                    field_path, expected, reason
                )
            }
            ValidationError::Deserialize(msg) => {
                write!(f, "Failed to deserialize payload: {}", msg)
            }
            ValidationError::Multiple(errors) => {
                writeln!(f, "Multiple validation errors occurred:")?;
                for (i, error) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}
