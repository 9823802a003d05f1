//! Canonical planet schema and source-catalog normalization
//!
//! Every source catalog is mapped onto the same nine-field record layout
//! before merging. Columns outside the mapping are dropped; canonical columns
//! absent from a source are simply omitted and treated as entirely missing
//! downstream. No unit conversion happens here: sources are assumed to share
//! units (Earth radii/masses, Kelvin, days, parsecs, AU).

use anyhow::{bail, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The nine canonical fields, in schema order.
pub const CANONICAL_FIELDS: [&str; 9] = [
    "radius",
    "mass",
    "temp",
    "orbital_period",
    "distance_star",
    "star_temp",
    "eccentricity",
    "semi_major_axis",
    "star_type",
];

/// Numeric canonical fields (everything except `star_type`).
pub const NUMERIC_FIELDS: [&str; 8] = [
    "radius",
    "mass",
    "temp",
    "orbital_period",
    "distance_star",
    "star_temp",
    "eccentricity",
    "semi_major_axis",
];

/// Fields whose absence is unacceptable for the reference table.
/// These are never filled with a crude global mean.
pub const CRITICAL_FIELDS: [&str; 5] = ["radius", "mass", "temp", "star_temp", "orbital_period"];

/// Fields filled with the global column mean during imputation.
pub const MEAN_FILL_FIELDS: [&str; 3] = ["eccentricity", "semi_major_axis", "distance_star"];

/// Name of the categorical spectral-type column.
pub const STAR_TYPE: &str = "star_type";

/// Sentinel spectral type for planets with no recorded host-star class.
pub const UNKNOWN_STAR_TYPE: &str = "Unknown";

/// Source column name -> canonical field name.
///
/// The source names are the NASA Exoplanet Archive export headers; catalogs
/// that already use canonical names pass through unchanged.
pub const SOURCE_ALIASES: [(&str, &str); 9] = [
    ("pl_rade", "radius"),
    ("pl_bmasse", "mass"),
    ("pl_eqt", "temp"),
    ("pl_orbper", "orbital_period"),
    ("sy_dist", "distance_star"),
    ("st_teff", "star_temp"),
    ("st_spectype", "star_type"),
    ("pl_orbeccen", "eccentricity"),
    ("pl_orbsmax", "semi_major_axis"),
];

/// A raw request row as received at the serving boundary.
pub type RawRow = Map<String, Value>;

/// One exoplanet's feature vector on the canonical schema.
///
/// Numeric fields stay optional: key-presence validation happens at the
/// serving boundary, but a present key may still carry a null value that the
/// classifier handles itself.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetRecord {
    pub radius: Option<f64>,
    pub mass: Option<f64>,
    pub temp: Option<f64>,
    pub orbital_period: Option<f64>,
    pub distance_star: Option<f64>,
    pub star_temp: Option<f64>,
    pub eccentricity: Option<f64>,
    pub semi_major_axis: Option<f64>,
    pub star_type: Option<String>,
}

impl PlanetRecord {
    /// Build a record from a raw row. Missing keys, nulls, and non-numeric
    /// values all become `None`; validation is a separate concern.
    pub fn from_raw(raw: &RawRow) -> Self {
        let num = |field: &str| raw.get(field).and_then(Value::as_f64);
        Self {
            radius: num("radius"),
            mass: num("mass"),
            temp: num("temp"),
            orbital_period: num("orbital_period"),
            distance_star: num("distance_star"),
            star_temp: num("star_temp"),
            eccentricity: num("eccentricity"),
            semi_major_axis: num("semi_major_axis"),
            star_type: raw
                .get(STAR_TYPE)
                .and_then(Value::as_str)
                .map(|s| s.to_string()),
        }
    }

    /// Look up a numeric field by canonical name.
    pub fn numeric(&self, field: &str) -> Option<f64> {
        match field {
            "radius" => self.radius,
            "mass" => self.mass,
            "temp" => self.temp,
            "orbital_period" => self.orbital_period,
            "distance_star" => self.distance_star,
            "star_temp" => self.star_temp,
            "eccentricity" => self.eccentricity,
            "semi_major_axis" => self.semi_major_axis,
            _ => None,
        }
    }
}

/// Resolve the column in `df` that feeds a canonical field, if any.
fn source_column_for(df: &DataFrame, canonical: &str) -> Option<String> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    if names.iter().any(|n| n == canonical) {
        return Some(canonical.to_string());
    }
    SOURCE_ALIASES
        .iter()
        .find(|(source, target)| *target == canonical && names.iter().any(|n| n == source))
        .map(|(source, _)| source.to_string())
}

/// Restrict and rename a source catalog onto the canonical schema.
///
/// Output columns appear in canonical order. Numeric fields are cast to
/// Float64 and `star_type` to String. Canonical fields with no source column
/// are omitted; the merger aligns them as all-null later.
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    let mut columns: Vec<Column> = Vec::with_capacity(CANONICAL_FIELDS.len());

    for canonical in CANONICAL_FIELDS {
        let Some(source) = source_column_for(df, canonical) else {
            continue;
        };

        let target_dtype = if canonical == STAR_TYPE {
            DataType::String
        } else {
            DataType::Float64
        };

        let mut column = df.column(&source)?.cast(&target_dtype)?;
        column.rename(canonical.into());
        columns.push(column);
    }

    if columns.is_empty() {
        bail!("No recognizable catalog columns found; expected canonical or archive names");
    }

    Ok(DataFrame::new(columns)?)
}
