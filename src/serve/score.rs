//! Single-record habitability scoring

use serde::{Serialize, Serializer};
use thiserror::Error;

use super::classifier::Classifier;
use super::validate::missing_fields;
use crate::pipeline::schema::{PlanetRecord, RawRow};

/// Decision threshold on the habitability probability.
///
/// Deliberately below 0.5: missing a habitable planet costs more than a
/// false alarm in this domain.
pub const HABITABILITY_THRESHOLD: f64 = 0.30;

/// Errors surfaced at the serving boundary.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// The request is missing required fields; nothing was scored.
    #[error("missing required fields: {}", .missing_fields.join(", "))]
    Validation { missing_fields: Vec<String> },

    /// The shared classifier failed on this record or batch. Not retried.
    #[error("classifier failed: {0}")]
    Classifier(String),
}

/// A scored record: probability of the positive ("habitable") class plus the
/// thresholded verdict.
///
/// `probability` keeps full precision internally; serialization rounds it to
/// 3 decimals as a presentation concern. The verdict is always computed from
/// the unrounded value.
#[derive(Debug, Clone, Serialize)]
pub struct Score {
    pub habitable: u8,
    #[serde(serialize_with = "round_3dp")]
    pub probability: f64,
}

fn round_3dp<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}

/// Score an already-typed record against the fixed threshold.
pub fn score_record(
    classifier: &dyn Classifier,
    record: &PlanetRecord,
) -> Result<Score, ScoreError> {
    let probability = classifier
        .predict_probability(record)
        .map_err(|e| ScoreError::Classifier(e.to_string()))?;

    Ok(Score {
        habitable: u8::from(probability >= HABITABILITY_THRESHOLD),
        probability,
    })
}

/// Validate and score one raw request row.
///
/// A row missing any required key is rejected with the full ordered list of
/// missing fields; no partial scoring is attempted.
pub fn score_one(classifier: &dyn Classifier, raw: &RawRow) -> Result<Score, ScoreError> {
    let missing = missing_fields(raw);
    if !missing.is_empty() {
        return Err(ScoreError::Validation {
            missing_fields: missing,
        });
    }
    score_record(classifier, &PlanetRecord::from_raw(raw))
}
