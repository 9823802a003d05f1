//! Preparation run summary

use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL_CONDENSED, Attribute, Cell, Color, Table};
use console::style;
use serde_json::json;
use std::path::Path;
use std::time::Duration;

use crate::pipeline::ImputationReport;

/// Summary of one offline preparation run.
#[derive(Debug, Default)]
pub struct PrepSummary {
    /// Rows loaded per source, in load order.
    pub source_rows: Vec<(String, usize)>,
    pub merged_rows: usize,
    pub duplicates_removed: usize,
    pub imputation: ImputationReport,
    pub final_rows: usize,
    load_time: Duration,
    merge_time: Duration,
    impute_time: Duration,
    save_time: Duration,
}

impl PrepSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_source(&mut self, path: &Path, rows: usize) {
        self.source_rows.push((path.display().to_string(), rows));
    }

    pub fn set_merge(&mut self, merged_rows: usize, duplicates_removed: usize) {
        self.merged_rows = merged_rows;
        self.duplicates_removed = duplicates_removed;
    }

    pub fn set_imputation(&mut self, report: ImputationReport, final_rows: usize) {
        self.imputation = report;
        self.final_rows = final_rows;
    }

    pub fn set_load_time(&mut self, d: Duration) {
        self.load_time = d;
    }

    pub fn set_merge_time(&mut self, d: Duration) {
        self.merge_time = d;
    }

    pub fn set_impute_time(&mut self, d: Duration) {
        self.impute_time = d;
    }

    pub fn set_save_time(&mut self, d: Duration) {
        self.save_time = d;
    }

    pub fn display(&self) {
        println!();
        println!(
            "    {} {}",
            style("◈").cyan(),
            style("PREPARATION SUMMARY").white().bold()
        );
        println!("    {}", style("─".repeat(50)).dim());
        println!();

        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        table.set_header(vec![
            Cell::new("Metric").add_attribute(Attribute::Bold),
            Cell::new("Value").add_attribute(Attribute::Bold),
        ]);

        for (source, rows) in &self.source_rows {
            table.add_row(vec![
                Cell::new(format!("Source: {}", source)),
                Cell::new(format!("{} rows", rows)),
            ]);
        }
        table.add_row(vec![
            Cell::new("Merged rows (after dedup)"),
            Cell::new(self.merged_rows),
        ]);
        table.add_row(vec![
            Cell::new("Duplicates removed"),
            Cell::new(self.duplicates_removed),
        ]);
        table.add_row(vec![
            Cell::new("Spectral types defaulted"),
            Cell::new(self.imputation.star_type_defaults),
        ]);
        table.add_row(vec![
            Cell::new("Mean fills"),
            Cell::new(self.imputation.mean_fills),
        ]);
        table.add_row(vec![
            Cell::new("Group-median fills"),
            Cell::new(self.imputation.median_fills),
        ]);
        table.add_row(vec![
            Cell::new("KNN fills"),
            Cell::new(if self.imputation.knn_applied {
                self.imputation.knn_fills.to_string()
            } else {
                "not needed".to_string()
            }),
        ]);
        table.add_row(vec![
            Cell::new("Rows dropped (unrecoverable)"),
            Cell::new(self.imputation.rows_dropped).fg(if self.imputation.rows_dropped == 0 {
                Color::White
            } else {
                Color::Yellow
            }),
        ]);
        table.add_row(vec![
            Cell::new("Final reference rows"),
            Cell::new(self.final_rows),
        ]);

        println!("{}", table);

        println!(
            "    {} load {:.2?} | merge {:.2?} | impute {:.2?} | save {:.2?}",
            style("⧗").dim(),
            self.load_time,
            self.merge_time,
            self.impute_time,
            self.save_time,
        );
    }

    /// Export the summary as JSON for downstream tracking.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let payload = json!({
            "generated_at": chrono::Local::now().to_rfc3339(),
            "sources": self.source_rows.iter().map(|(name, rows)| {
                json!({ "path": name, "rows": rows })
            }).collect::<Vec<_>>(),
            "merged_rows": self.merged_rows,
            "duplicates_removed": self.duplicates_removed,
            "imputation": self.imputation,
            "final_rows": self.final_rows,
            "timings_ms": {
                "load": self.load_time.as_millis() as u64,
                "merge": self.merge_time.as_millis() as u64,
                "impute": self.impute_time.as_millis() as u64,
                "save": self.save_time.as_millis() as u64,
            },
        });

        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
        serde_json::to_writer_pretty(file, &payload)
            .with_context(|| format!("Failed to write summary file: {}", path.display()))?;
        Ok(())
    }
}
