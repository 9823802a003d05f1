//! Tiered missing-value imputation
//!
//! The merged table is repaired in strictly ordered passes of increasing
//! cost: sentinel default, global mean, per-spectral-type median, conditional
//! k-nearest-neighbour fill, and finally row elimination. Each pass only
//! touches cells that are still null after the passes before it, so re-running
//! a pass is a no-op and earlier fills are never revisited.

use anyhow::Result;
use polars::prelude::*;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use super::schema::{
    CRITICAL_FIELDS, MEAN_FILL_FIELDS, NUMERIC_FIELDS, STAR_TYPE, UNKNOWN_STAR_TYPE,
};

/// Neighbour count for the multivariate fill tier.
pub const KNN_NEIGHBORS: usize = 5;

/// Per-tier accounting for one imputation run.
///
/// Row elimination is a silent data loss if left uncounted, so the report
/// carries it explicitly for the caller to surface.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ImputationReport {
    /// Tier 0: null spectral types replaced by the "Unknown" sentinel.
    pub star_type_defaults: usize,
    /// Tier 1: nulls replaced by the global column mean.
    pub mean_fills: usize,
    /// Tier 2: nulls replaced by the per-spectral-type median.
    pub median_fills: usize,
    /// Whether Tier 3 ran at all (only when critical nulls survived Tier 2).
    pub knn_applied: bool,
    /// Tier 3: nulls replaced by nearest-neighbour estimates.
    pub knn_fills: usize,
    /// Tier 4: rows eliminated because a critical field stayed null.
    pub rows_dropped: usize,
}

fn numeric_values(df: &DataFrame, field: &str) -> Result<Vec<Option<f64>>> {
    Ok(df.column(field)?.f64()?.into_iter().collect())
}

fn set_numeric(df: &mut DataFrame, field: &str, values: Vec<Option<f64>>) -> Result<()> {
    df.with_column(Column::new(field.into(), values))?;
    Ok(())
}

fn mean_of_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().filter_map(|v| *v).collect();
    if present.is_empty() {
        return None;
    }
    Some(present.iter().sum::<f64>() / present.len() as f64)
}

fn median_of_present(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

/// Tier 0: replace null spectral types with the "Unknown" sentinel.
pub fn fill_star_type_default(df: &mut DataFrame) -> Result<usize> {
    let column = df.column(STAR_TYPE)?.str()?;
    let filled_count = column.null_count();
    if filled_count == 0 {
        return Ok(0);
    }

    let values: Vec<String> = column
        .into_iter()
        .map(|v| v.unwrap_or(UNKNOWN_STAR_TYPE).to_string())
        .collect();
    df.with_column(Column::new(STAR_TYPE.into(), values))?;
    Ok(filled_count)
}

/// Tier 1: fill the non-critical numeric fields with their global means.
///
/// All means are computed from the original values before any fill is
/// applied, never from a partially-filled column.
pub fn fill_global_means(df: &mut DataFrame) -> Result<usize> {
    let mut means: Vec<(&str, Option<f64>, Vec<Option<f64>>)> = Vec::new();
    for field in MEAN_FILL_FIELDS {
        let values = numeric_values(df, field)?;
        means.push((field, mean_of_present(&values), values));
    }

    let mut filled = 0usize;
    for (field, mean, values) in means {
        // A column with no observed values has no mean; leave it alone.
        let Some(mean) = mean else { continue };
        let null_count = values.iter().filter(|v| v.is_none()).count();
        if null_count == 0 {
            continue;
        }
        let replaced: Vec<Option<f64>> = values.into_iter().map(|v| v.or(Some(mean))).collect();
        set_numeric(df, field, replaced)?;
        filled += null_count;
    }
    Ok(filled)
}

/// Tier 2: fill critical fields with the median of their spectral-type group.
///
/// A group whose values for a field are all null gets no fill there; the
/// nulls propagate to the next tier instead of raising.
pub fn fill_group_medians(df: &mut DataFrame) -> Result<usize> {
    let star_types: Vec<String> = df
        .column(STAR_TYPE)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(UNKNOWN_STAR_TYPE).to_string())
        .collect();

    let mut filled = 0usize;
    for field in CRITICAL_FIELDS {
        let values = numeric_values(df, field)?;

        let mut groups: HashMap<&str, Vec<f64>> = HashMap::new();
        for (star_type, value) in star_types.iter().zip(values.iter()) {
            if let Some(v) = value {
                groups.entry(star_type.as_str()).or_default().push(*v);
            }
        }
        let medians: HashMap<&str, f64> = groups
            .into_iter()
            .filter_map(|(k, vs)| median_of_present(&vs).map(|m| (k, m)))
            .collect();

        let mut touched = false;
        let replaced: Vec<Option<f64>> = star_types
            .iter()
            .zip(values)
            .map(|(star_type, value)| match value {
                Some(v) => Some(v),
                None => {
                    let fill = medians.get(star_type.as_str()).copied();
                    if fill.is_some() {
                        touched = true;
                        filled += 1;
                    }
                    fill
                }
            })
            .collect();

        if touched {
            set_numeric(df, field, replaced)?;
        }
    }
    Ok(filled)
}

/// Count nulls remaining across the critical fields.
pub fn critical_null_count(df: &DataFrame) -> Result<usize> {
    let mut count = 0;
    for field in CRITICAL_FIELDS {
        count += df.column(field)?.null_count();
    }
    Ok(count)
}

/// Tier 3: k-nearest-neighbour fill over all numeric fields at once.
///
/// Distances are NaN-aware Euclidean with pairwise-complete scaling: only
/// coordinates observed in both rows contribute, and the squared sum is
/// scaled by `total_fields / shared_fields` before the root. Each missing
/// cell takes the mean of its k nearest donors that observed that field;
/// a cell with no usable donor falls back to the column's observed mean.
/// Observed cells are never altered.
pub fn knn_fill(df: &mut DataFrame, k: usize) -> Result<usize> {
    let n_fields = NUMERIC_FIELDS.len();
    let mut columns: Vec<Vec<Option<f64>>> = Vec::with_capacity(n_fields);
    for field in NUMERIC_FIELDS {
        columns.push(numeric_values(df, field)?);
    }
    let n_rows = columns.first().map(|c| c.len()).unwrap_or(0);
    if n_rows == 0 {
        return Ok(0);
    }

    // Row-major view for distance computation.
    let rows: Vec<Vec<Option<f64>>> = (0..n_rows)
        .map(|i| columns.iter().map(|c| c[i]).collect())
        .collect();
    let column_means: Vec<Option<f64>> = columns.iter().map(|c| mean_of_present(c)).collect();

    let fills: Vec<(usize, usize, f64)> = (0..n_rows)
        .into_par_iter()
        .flat_map_iter(|i| {
            let missing: Vec<usize> = (0..n_fields).filter(|&c| rows[i][c].is_none()).collect();
            if missing.is_empty() {
                return Vec::new();
            }

            // Distance to every other row over shared coordinates.
            let mut distances: Vec<(usize, f64)> = Vec::with_capacity(n_rows - 1);
            for (j, other) in rows.iter().enumerate() {
                if j == i {
                    continue;
                }
                let mut sum_sq = 0.0;
                let mut shared = 0usize;
                for c in 0..n_fields {
                    if let (Some(a), Some(b)) = (rows[i][c], other[c]) {
                        let d = a - b;
                        sum_sq += d * d;
                        shared += 1;
                    }
                }
                if shared > 0 {
                    let dist = (sum_sq * n_fields as f64 / shared as f64).sqrt();
                    distances.push((j, dist));
                }
            }
            distances.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

            let mut row_fills = Vec::with_capacity(missing.len());
            for c in missing {
                let donors: Vec<f64> = distances
                    .iter()
                    .filter_map(|&(j, _)| rows[j][c])
                    .take(k)
                    .collect();
                let estimate = if donors.is_empty() {
                    column_means[c]
                } else {
                    Some(donors.iter().sum::<f64>() / donors.len() as f64)
                };
                if let Some(value) = estimate {
                    row_fills.push((i, c, value));
                }
            }
            row_fills
        })
        .collect();

    let filled = fills.len();
    for (row, col, value) in fills {
        columns[col][row] = Some(value);
    }
    for (c, field) in NUMERIC_FIELDS.iter().enumerate() {
        set_numeric(df, field, std::mem::take(&mut columns[c]))?;
    }
    Ok(filled)
}

/// Tier 4: eliminate rows still null in any critical field.
pub fn drop_unresolved(df: &DataFrame) -> Result<(DataFrame, usize)> {
    let mut keep = vec![true; df.height()];
    for field in CRITICAL_FIELDS {
        for (i, value) in df.column(field)?.f64()?.into_iter().enumerate() {
            if value.is_none() {
                keep[i] = false;
            }
        }
    }
    let dropped = keep.iter().filter(|&&k| !k).count();
    if dropped == 0 {
        return Ok((df.clone(), 0));
    }

    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok((df.filter(&mask)?, dropped))
}

/// Run the full imputation ladder and report what each tier did.
///
/// The returned table is fully dense in the critical fields; unrecoverable
/// rows are eliminated and counted rather than silently lost.
pub fn impute(mut df: DataFrame) -> Result<(DataFrame, ImputationReport)> {
    let mut report = ImputationReport::default();

    report.star_type_defaults = fill_star_type_default(&mut df)?;
    report.mean_fills = fill_global_means(&mut df)?;
    report.median_fills = fill_group_medians(&mut df)?;

    if critical_null_count(&df)? > 0 {
        report.knn_applied = true;
        report.knn_fills = knn_fill(&mut df, KNN_NEIGHBORS)?;
    }

    let (clean, dropped) = drop_unresolved(&df)?;
    report.rows_dropped = dropped;
    Ok((clean, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median_of_present(&[10.0, 20.0]), Some(15.0));
        assert_eq!(median_of_present(&[3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median_of_present(&[]), None);
    }

    #[test]
    fn test_mean_of_present_ignores_nulls() {
        assert_eq!(mean_of_present(&[Some(1.0), None, Some(3.0)]), Some(2.0));
        assert_eq!(mean_of_present(&[None, None]), None);
    }

    #[test]
    fn test_fill_star_type_default() {
        let mut df = df! {
            "star_type" => [Some("G"), None, Some("M")],
        }
        .unwrap();

        let filled = fill_star_type_default(&mut df).unwrap();
        assert_eq!(filled, 1);

        let values: Vec<Option<&str>> = df
            .column("star_type")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(values, vec![Some("G"), Some("Unknown"), Some("M")]);
    }
}
