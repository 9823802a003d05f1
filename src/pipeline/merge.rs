//! Catalog merging: schema alignment, concatenation, and exact dedup

use anyhow::{bail, Result};
use polars::prelude::*;

use super::schema::{CANONICAL_FIELDS, STAR_TYPE};

/// Align a normalized table onto the full canonical column set.
///
/// Canonical columns missing from the table become all-null columns of the
/// expected dtype, so every merged source contributes the same schema.
pub fn align_to_canonical(df: &DataFrame) -> Result<DataFrame> {
    let height = df.height();
    let mut columns: Vec<Column> = Vec::with_capacity(CANONICAL_FIELDS.len());

    for field in CANONICAL_FIELDS {
        let column = match df.column(field) {
            Ok(existing) => existing.clone(),
            Err(_) => {
                let dtype = if field == STAR_TYPE {
                    DataType::String
                } else {
                    DataType::Float64
                };
                Column::full_null(field.into(), height, &dtype)
            }
        };
        columns.push(column);
    }

    Ok(DataFrame::new(columns)?)
}

/// Concatenate normalized tables and remove exact full-row duplicates.
///
/// Row order is source-concatenation order; dedup keeps the first occurrence
/// of each row and compares all nine fields, with null equal to null. Partial
/// matches are never collapsed.
pub fn merge(tables: &[DataFrame]) -> Result<DataFrame> {
    if tables.is_empty() {
        bail!("At least one normalized catalog is required for merging");
    }

    let mut merged = align_to_canonical(&tables[0])?;
    for table in &tables[1..] {
        let aligned = align_to_canonical(table)?;
        merged.vstack_mut(&aligned)?;
    }

    let deduped = merged.unique_stable(None, UniqueKeepStrategy::First, None)?;
    Ok(deduped)
}
