//! Integration tests for the serving core

use anyhow::Result;
use exohab::pipeline::schema::PlanetRecord;
use exohab::pipeline::RawRow;
use exohab::serve::{
    score_batch, score_one, validate_input, Classifier, LogisticModel, ScoreError,
};
use serde_json::json;

#[path = "common/mod.rs"]
mod common;

/// Stub classifier: probability is read straight off the radius field.
struct RadiusStub;

impl Classifier for RadiusStub {
    fn predict_probability(&self, record: &PlanetRecord) -> Result<f64> {
        Ok(record.radius.unwrap_or(0.0))
    }
}

fn row_with_radius(radius: f64) -> RawRow {
    let mut raw = common::earth_like_row();
    raw.insert("radius".to_string(), json!(radius));
    raw
}

#[test]
fn test_validate_input_pure_check() {
    let validation = validate_input(&common::earth_like_row());
    assert!(validation.accepted);

    let mut partial = common::earth_like_row();
    partial.remove("temp");
    let validation = validate_input(&partial);
    assert!(!validation.accepted);
    assert_eq!(validation.missing_fields, vec!["temp"]);
}

#[test]
fn test_score_one_never_partially_scores() {
    let mut raw = common::earth_like_row();
    raw.remove("mass");
    raw.remove("eccentricity");

    let err = score_one(&RadiusStub, &raw).unwrap_err();
    match err {
        ScoreError::Validation { missing_fields } => {
            assert_eq!(missing_fields, vec!["mass", "eccentricity"]);
        }
        other => panic!("Expected Validation error, got {:?}", other),
    }
}

#[test]
fn test_batch_example_ranks_and_order() {
    let rows = vec![
        row_with_radius(0.9),
        row_with_radius(0.5),
        row_with_radius(0.5),
    ];

    let ranked = score_batch(&RadiusStub, &rows).unwrap();
    let ranks: Vec<f64> = ranked.iter().map(|r| r["rank"].as_f64().unwrap()).collect();
    assert_eq!(ranks, vec![1.0, 2.5, 2.5]);

    let probabilities: Vec<f64> = ranked
        .iter()
        .map(|r| r["habitability_probability"].as_f64().unwrap())
        .collect();
    assert_eq!(probabilities, vec![0.9, 0.5, 0.5]);
}

#[test]
fn test_batch_output_sorted_most_habitable_first() {
    let rows = vec![
        row_with_radius(0.1),
        row_with_radius(0.8),
        row_with_radius(0.4),
    ];

    let ranked = score_batch(&RadiusStub, &rows).unwrap();
    let ranks: Vec<f64> = ranked.iter().map(|r| r["rank"].as_f64().unwrap()).collect();
    assert_eq!(ranks, vec![1.0, 2.0, 3.0], "Output must ascend in rank");

    // Monotone: rank never decreases as probability descends.
    for pair in ranked.windows(2) {
        let p0 = pair[0]["habitability_probability"].as_f64().unwrap();
        let p1 = pair[1]["habitability_probability"].as_f64().unwrap();
        assert!(p0 >= p1);
    }
}

#[test]
fn test_batch_preserves_input_fields() {
    let mut row = row_with_radius(0.7);
    row.insert("name".to_string(), json!("Kepler-442b"));

    let ranked = score_batch(&RadiusStub, &[row]).unwrap();
    assert_eq!(ranked[0]["name"], json!("Kepler-442b"));
    assert_eq!(ranked[0]["star_type"], json!("G"));
}

#[test]
fn test_batch_accepts_partial_records() {
    // No field-presence validation on the batch path: missing keys become
    // nulls for the classifier to handle.
    let mut partial = RawRow::new();
    partial.insert("mass".to_string(), json!(2.0));

    let ranked = score_batch(&RadiusStub, &[partial]).unwrap();
    assert_eq!(ranked.len(), 1);
    assert_eq!(ranked[0]["habitability_probability"], json!(0.0));
}

#[test]
fn test_empty_batch_yields_empty_result() {
    let ranked = score_batch(&RadiusStub, &[]).unwrap();
    assert!(ranked.is_empty());
}

#[test]
fn test_ties_keep_original_relative_order() {
    let mut first = row_with_radius(0.5);
    first.insert("name".to_string(), json!("a"));
    let mut second = row_with_radius(0.5);
    second.insert("name".to_string(), json!("b"));

    let ranked = score_batch(&RadiusStub, &[first, second]).unwrap();
    assert_eq!(ranked[0]["name"], json!("a"));
    assert_eq!(ranked[1]["name"], json!("b"));
}

#[test]
fn test_logistic_model_artifact_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_model_artifact(dir.path());
    let model = LogisticModel::from_file(&path).unwrap();

    let score = score_one(&model, &common::earth_like_row()).unwrap();
    assert!(score.probability > 0.0 && score.probability < 1.0);
    assert_eq!(score.habitable, u8::from(score.probability >= 0.30));
}

#[test]
fn test_logistic_model_batch_consistency() {
    let dir = tempfile::tempdir().unwrap();
    let path = common::write_model_artifact(dir.path());
    let model = LogisticModel::from_file(&path).unwrap();

    let rows = vec![common::earth_like_row(), row_with_radius(5.0)];
    let ranked = score_batch(&model, &rows).unwrap();
    assert_eq!(ranked.len(), 2);

    for row in &ranked {
        let p = row["habitability_probability"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&p), "Probability out of range: {}", p);
    }
}

#[test]
fn test_malformed_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.json");
    std::fs::write(&path, "{\"intercept\": \"not a number\"}").unwrap();

    assert!(LogisticModel::from_file(&path).is_err());
}
