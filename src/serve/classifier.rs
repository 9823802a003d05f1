//! The trained-classifier capability
//!
//! The serving core treats the classifier as an opaque artifact: loaded once
//! at startup, immutable afterwards, shared by reference across requests.
//! The contract is explicit about the class it scores: every probability this
//! module emits is the probability of the *positive, "habitable"* class. No
//! positional output-index convention exists anywhere in the crate.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::pipeline::schema::{PlanetRecord, NUMERIC_FIELDS, UNKNOWN_STAR_TYPE};

/// A pre-trained binary habitability classifier.
///
/// Implementations must be immutable after construction so a single instance
/// can back all concurrent scoring requests without locking.
pub trait Classifier: Send + Sync {
    /// Estimated probability that `record` belongs to the positive
    /// ("habitable") class, in [0, 1].
    fn predict_probability(&self, record: &PlanetRecord) -> Result<f64>;

    /// Batched form of [`predict_probability`](Self::predict_probability),
    /// one probability per input row in input order.
    fn predict_batch(&self, records: &[PlanetRecord]) -> Result<Vec<f64>> {
        records.iter().map(|r| self.predict_probability(r)).collect()
    }
}

/// A logistic habitability model loaded from a JSON artifact.
///
/// The artifact carries everything the model needs to score a record on its
/// own, including per-feature training means used to stand in for null
/// numeric values (null handling is the classifier's concern, not the
/// validator's).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    /// Coefficient per canonical numeric field.
    pub coefficients: BTreeMap<String, f64>,
    /// Training-set mean per numeric field, substituted for null inputs.
    pub feature_means: BTreeMap<String, f64>,
    /// Additive weight per spectral class; the "Unknown" entry is the
    /// fallback for classes unseen in training.
    pub star_type_weights: BTreeMap<String, f64>,
}

impl LogisticModel {
    /// Load the artifact from disk. Done once at process start.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open model artifact: {}", path.display()))?;
        let model: Self = serde_json::from_reader(file)
            .with_context(|| format!("Malformed model artifact: {}", path.display()))?;
        Ok(model)
    }

    fn feature_value(&self, record: &PlanetRecord, field: &str) -> Result<f64> {
        if let Some(value) = record.numeric(field) {
            return Ok(value);
        }
        self.feature_means
            .get(field)
            .copied()
            .with_context(|| format!("Null '{}' and no training mean to substitute", field))
    }
}

impl Classifier for LogisticModel {
    fn predict_probability(&self, record: &PlanetRecord) -> Result<f64> {
        let mut z = self.intercept;
        for field in NUMERIC_FIELDS {
            if let Some(coefficient) = self.coefficients.get(field) {
                z += coefficient * self.feature_value(record, field)?;
            }
        }

        let star_type = record.star_type.as_deref().unwrap_or(UNKNOWN_STAR_TYPE);
        if let Some(weight) = self
            .star_type_weights
            .get(star_type)
            .or_else(|| self.star_type_weights.get(UNKNOWN_STAR_TYPE))
        {
            z += weight;
        }

        let probability = 1.0 / (1.0 + (-z).exp());
        if !probability.is_finite() {
            anyhow::bail!("Classifier produced a non-finite probability (z = {})", z);
        }
        Ok(probability)
    }
}
