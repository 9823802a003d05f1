//! Batch scoring and tie-aware ranking
//!
//! `score_batch` deliberately performs no required-field validation: batch
//! callers may submit partial records and lean on the classifier's own null
//! handling. This asymmetry with `score_one` matches the behavior the
//! serving layer already depends on.

use serde_json::Value;

use super::classifier::Classifier;
use super::score::ScoreError;
use crate::pipeline::schema::{PlanetRecord, RawRow};

/// Descending ranks with averaged ties.
///
/// The highest probability gets rank 1. Equal probabilities share the
/// average of the 1-based positions they would jointly occupy, so a two-way
/// tie for positions 2 and 3 yields 2.5 for both.
pub fn average_ranks_desc(probabilities: &[f64]) -> Vec<f64> {
    let n = probabilities.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        probabilities[b]
            .partial_cmp(&probabilities[a])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut ranks = vec![0.0; n];
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && probabilities[order[end]] == probabilities[order[start]] {
            end += 1;
        }
        // Positions start+1 ..= end, averaged over the tie run.
        let rank = (start + 1 + end) as f64 / 2.0;
        for &index in &order[start..end] {
            ranks[index] = rank;
        }
        start = end;
    }
    ranks
}

/// Score a batch of raw rows and return them sorted most-habitable first.
///
/// Each output row carries all of its input fields plus
/// `habitability_probability` and `rank`. Probabilities come from a single
/// batched classifier call; ties keep their original relative order. An
/// empty batch yields an empty result.
pub fn score_batch(
    classifier: &dyn Classifier,
    rows: &[RawRow],
) -> Result<Vec<RawRow>, ScoreError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<PlanetRecord> = rows.iter().map(PlanetRecord::from_raw).collect();
    let probabilities = classifier
        .predict_batch(&records)
        .map_err(|e| ScoreError::Classifier(e.to_string()))?;
    if probabilities.len() != rows.len() {
        return Err(ScoreError::Classifier(format!(
            "classifier returned {} probabilities for {} rows",
            probabilities.len(),
            rows.len()
        )));
    }

    let ranks = average_ranks_desc(&probabilities);

    let mut scored: Vec<(f64, RawRow)> = rows
        .iter()
        .zip(probabilities.iter().zip(&ranks))
        .map(|(row, (&probability, &rank))| {
            let mut out = row.clone();
            out.insert(
                "habitability_probability".to_string(),
                Value::from(probability),
            );
            out.insert("rank".to_string(), Value::from(rank));
            (rank, out)
        })
        .collect();

    scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    Ok(scored.into_iter().map(|(_, row)| row).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_probabilities_rank_densely() {
        let ranks = average_ranks_desc(&[0.1, 0.9, 0.5]);
        assert_eq!(ranks, vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_two_way_tie_averages_positions() {
        let ranks = average_ranks_desc(&[0.9, 0.5, 0.5]);
        assert_eq!(ranks, vec![1.0, 2.5, 2.5]);
    }

    #[test]
    fn test_three_way_tie() {
        let ranks = average_ranks_desc(&[0.5, 0.5, 0.5, 0.9]);
        assert_eq!(ranks, vec![3.0, 3.0, 3.0, 1.0]);
    }

    #[test]
    fn test_empty_input() {
        assert!(average_ranks_desc(&[]).is_empty());
    }
}
