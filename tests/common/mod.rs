//! Shared test utilities and fixture generators

#![allow(dead_code)]

use polars::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use exohab::pipeline::RawRow;

/// A small NASA-archive-style catalog: raw export column names, a column
/// outside the canonical mapping, and a few holes.
pub fn create_archive_catalog() -> DataFrame {
    df! {
        "pl_rade" => [Some(1.0f64), Some(2.4), None, Some(11.2)],
        "pl_bmasse" => [Some(1.0f64), None, Some(4.8), Some(317.8)],
        "pl_eqt" => [Some(288.0f64), Some(400.0), Some(210.0), Some(110.0)],
        "pl_orbper" => [Some(365.2f64), Some(12.4), Some(687.0), Some(4332.6)],
        "sy_dist" => [Some(10.0f64), Some(48.0), None, Some(5.9)],
        "st_teff" => [Some(5778.0f64), Some(3500.0), Some(5778.0), None],
        "st_spectype" => [Some("G"), Some("M"), None, Some("G")],
        "pl_orbeccen" => [Some(0.017f64), None, Some(0.09), Some(0.049)],
        "pl_orbsmax" => [Some(1.0f64), Some(0.05), Some(1.52), Some(5.2)],
        "pl_dens" => [Some(5.5f64), Some(4.2), Some(3.9), Some(1.3)], // unmapped, must be dropped
    }
    .unwrap()
}

/// A second catalog already on canonical names, missing some canonical
/// columns entirely.
pub fn create_partial_catalog() -> DataFrame {
    df! {
        "radius" => [Some(1.0f64), Some(0.9)],
        "mass" => [Some(1.0f64), Some(0.8)],
        "temp" => [Some(288.0f64), Some(250.0)],
        "orbital_period" => [Some(365.2f64), Some(224.7)],
        "star_temp" => [Some(5778.0f64), Some(5778.0)],
        "star_type" => [Some("G"), Some("G")],
    }
    .unwrap()
}

/// Write a DataFrame to a temporary CSV file.
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
    (dir, path)
}

/// Write a small logistic model artifact covering every numeric field.
pub fn write_model_artifact(dir: &Path) -> PathBuf {
    let artifact = json!({
        "intercept": -0.5,
        "coefficients": {
            "radius": 0.3,
            "mass": 0.001,
            "temp": -0.002,
            "orbital_period": -0.0001,
            "distance_star": -0.005,
            "star_temp": 0.0001,
            "eccentricity": -0.8,
            "semi_major_axis": -0.1
        },
        "feature_means": {
            "radius": 2.0,
            "mass": 10.0,
            "temp": 500.0,
            "orbital_period": 200.0,
            "distance_star": 100.0,
            "star_temp": 5000.0,
            "eccentricity": 0.1,
            "semi_major_axis": 1.0
        },
        "star_type_weights": {
            "G": 0.4,
            "M": -0.2,
            "Unknown": 0.0
        }
    });

    let path = dir.join("model.json");
    std::fs::write(&path, serde_json::to_string_pretty(&artifact).unwrap()).unwrap();
    path
}

/// A complete raw request row for an Earth-like planet.
pub fn earth_like_row() -> RawRow {
    json!({
        "radius": 1.0,
        "mass": 1.0,
        "temp": 288,
        "orbital_period": 365,
        "distance_star": 10,
        "star_temp": 5778,
        "eccentricity": 0.017,
        "semi_major_axis": 1.0,
        "star_type": "G",
    })
    .as_object()
    .unwrap()
    .clone()
}

/// Assert the DataFrame contains all of the given columns.
pub fn assert_has_columns(df: &DataFrame, columns: &[&str]) {
    for column in columns {
        assert!(
            df.column(column).is_ok(),
            "Expected column '{}' in DataFrame with columns {:?}",
            column,
            df.get_column_names()
        );
    }
}
