//! Exohab: Exoplanet Habitability CLI
//!
//! `prepare` runs the offline pipeline (normalize, merge, impute) over raw
//! catalog exports; `score` and `rank` exercise the serving core against a
//! trained model artifact.

mod cli;
mod pipeline;
mod report;
mod serve;
mod utils;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use polars::prelude::DataFrame;

use cli::{Cli, Commands};
use pipeline::{impute, load_dataset, merge, normalize, save_dataset, RawRow};
use report::PrepSummary;
use serve::{score_batch, score_one, LogisticModel, ScoreError};
use utils::{
    create_spinner, finish_with_success, finish_with_warning, print_banner, print_completion,
    print_config, print_count, print_info, print_step_header, print_step_time, print_success,
    print_warning,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Prepare {
            input,
            output,
            summary,
        } => run_prepare(&input, &output, summary.as_deref()),
        Commands::Score { model, record } => run_score(&model, &record),
        Commands::Rank { model, records } => run_rank(&model, &records),
    }
}

/// Offline pipeline: load each catalog, normalize onto the canonical schema,
/// merge with exact dedup, run the tiered imputer, and save the dense
/// reference table.
fn run_prepare(inputs: &[PathBuf], output: &Path, summary_path: Option<&Path>) -> Result<()> {
    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(inputs, output);

    let mut summary = PrepSummary::new();

    // Step 1: Load and normalize each source
    print_step_header(1, "Load & Normalize Catalogs");
    let step_start = Instant::now();
    let mut tables: Vec<DataFrame> = Vec::with_capacity(inputs.len());
    for input in inputs {
        let df = load_dataset(input)?;
        let normalized = normalize(&df)
            .with_context(|| format!("Failed to normalize catalog: {}", input.display()))?;
        summary.add_source(input, normalized.height());
        tables.push(normalized);
    }
    print_success(&format!("Normalized {} catalog(s)", tables.len()));
    let load_elapsed = step_start.elapsed();
    summary.set_load_time(load_elapsed);
    print_step_time(load_elapsed);

    // Step 2: Merge and dedup
    print_step_header(2, "Merge & Deduplicate");
    let step_start = Instant::now();
    let total_rows: usize = tables.iter().map(|t| t.height()).sum();
    let merged = merge(&tables)?;
    let duplicates = total_rows - merged.height();
    summary.set_merge(merged.height(), duplicates);
    if duplicates == 0 {
        print_info("No duplicate rows found");
    } else {
        print_count("duplicate row(s) removed", duplicates);
    }
    print_success(&format!("Merged table: {} rows", merged.height()));
    let merge_elapsed = step_start.elapsed();
    summary.set_merge_time(merge_elapsed);
    print_step_time(merge_elapsed);

    // Step 3: Tiered imputation
    print_step_header(3, "Tiered Imputation");
    let step_start = Instant::now();
    let spinner = create_spinner("Filling missing values...");
    let (mut clean, imputation) = impute(merged)?;
    if imputation.rows_dropped == 0 {
        finish_with_success(&spinner, "All critical fields resolved");
    } else {
        finish_with_warning(
            &spinner,
            &format!(
                "{} unrecoverable row(s) dropped from the reference table",
                imputation.rows_dropped
            ),
        );
    }
    print_count("spectral type(s) defaulted", imputation.star_type_defaults);
    print_count("mean fill(s)", imputation.mean_fills);
    print_count("group-median fill(s)", imputation.median_fills);
    if imputation.knn_applied {
        print_count("nearest-neighbour fill(s)", imputation.knn_fills);
    } else {
        print_info("Nearest-neighbour tier not needed");
    }
    summary.set_imputation(imputation, clean.height());
    let impute_elapsed = step_start.elapsed();
    summary.set_impute_time(impute_elapsed);
    print_step_time(impute_elapsed);

    // Step 4: Save
    print_step_header(4, "Save Reference Table");
    let step_start = Instant::now();
    save_dataset(&mut clean, output)?;
    print_success(&format!("Saved to {}", output.display()));
    let save_elapsed = step_start.elapsed();
    summary.set_save_time(save_elapsed);
    print_step_time(save_elapsed);

    summary.display();
    if let Some(path) = summary_path {
        summary.export_json(path)?;
        print_info(&format!("Summary exported to {}", path.display()));
    }
    print_completion();

    Ok(())
}

fn read_json(path: &Path) -> Result<serde_json::Value> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open JSON file: {}", path.display()))?;
    serde_json::from_reader(file)
        .with_context(|| format!("Malformed JSON file: {}", path.display()))
}

/// Score one record and print the verdict.
fn run_score(model_path: &Path, record_path: &Path) -> Result<()> {
    let model = LogisticModel::from_file(model_path)?;
    let value = read_json(record_path)?;
    let raw: RawRow = value
        .as_object()
        .cloned()
        .context("Record file must contain a single JSON object")?;

    match score_one(&model, &raw) {
        Ok(score) => {
            println!("{}", serde_json::to_string_pretty(&score)?);
            Ok(())
        }
        Err(ScoreError::Validation { missing_fields }) => {
            print_warning(&format!(
                "Record rejected, missing fields: {}",
                missing_fields.join(", ")
            ));
            anyhow::bail!("validation failed");
        }
        Err(err) => Err(err.into()),
    }
}

/// Rank a batch of records and print them most-habitable first.
fn run_rank(model_path: &Path, records_path: &Path) -> Result<()> {
    let model = LogisticModel::from_file(model_path)?;
    let value = read_json(records_path)?;
    let rows: Vec<RawRow> = value
        .as_array()
        .context("Records file must contain a JSON array of objects")?
        .iter()
        .map(|v| {
            v.as_object()
                .cloned()
                .context("Every element of the records array must be an object")
        })
        .collect::<Result<_>>()?;

    let ranked = score_batch(&model, &rows)?;
    println!("{}", serde_json::to_string_pretty(&ranked)?);
    Ok(())
}
