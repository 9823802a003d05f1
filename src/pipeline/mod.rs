//! Offline data-preparation pipeline: normalize -> merge -> impute

pub mod impute;
pub mod loader;
pub mod merge;
pub mod schema;

pub use impute::{impute, ImputationReport, KNN_NEIGHBORS};
pub use loader::{load_dataset, save_dataset};
pub use merge::merge;
pub use schema::{normalize, PlanetRecord, RawRow, CANONICAL_FIELDS, CRITICAL_FIELDS};
