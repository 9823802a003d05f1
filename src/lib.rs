//! Exohab: Exoplanet Habitability Library
//!
//! A library for preparing exoplanet catalog data (schema normalization,
//! merging, tiered missing-value imputation) and for scoring and ranking
//! planets by habitability probability with a pre-trained classifier.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod serve;
pub mod utils;
