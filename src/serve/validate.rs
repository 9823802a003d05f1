//! Required-field validation for incoming request rows
//!
//! Validation is key-presence only: a present key with a null value passes,
//! because null handling belongs to the classifier. Type and range checks
//! are likewise out of scope here.

use serde::Serialize;

use crate::pipeline::schema::{RawRow, CANONICAL_FIELDS};

/// Outcome of validating one request row.
#[derive(Debug, Clone, Serialize)]
pub struct Validation {
    pub accepted: bool,
    /// Required fields absent from the row, in canonical schema order.
    pub missing_fields: Vec<String>,
}

/// Required field names absent from `raw`, in canonical schema order.
pub fn missing_fields(raw: &RawRow) -> Vec<String> {
    CANONICAL_FIELDS
        .iter()
        .filter(|field| !raw.contains_key(**field))
        .map(|field| field.to_string())
        .collect()
}

/// Pure validation with no scoring attached.
pub fn validate_input(raw: &RawRow) -> Validation {
    let missing = missing_fields(raw);
    Validation {
        accepted: missing.is_empty(),
        missing_fields: missing,
    }
}
