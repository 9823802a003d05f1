//! Command-line argument definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Exohab - prepare exoplanet catalogs and score habitability
#[derive(Parser, Debug)]
#[command(name = "exohab")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the clean reference table from raw catalog exports
    Prepare {
        /// Input catalog files (CSV or Parquet); repeat for multiple sources
        #[arg(short, long, required = true)]
        input: Vec<PathBuf>,

        /// Output path for the cleaned table (CSV or Parquet by extension)
        #[arg(short, long)]
        output: PathBuf,

        /// Optional path for a JSON run summary
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Score a single planet record from a JSON file
    Score {
        /// Trained model artifact (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// JSON file containing one record object
        #[arg(short, long)]
        record: PathBuf,
    },

    /// Rank a batch of planet records from a JSON file
    Rank {
        /// Trained model artifact (JSON)
        #[arg(short, long)]
        model: PathBuf,

        /// JSON file containing an array of record objects
        #[arg(short, long)]
        records: PathBuf,
    },
}
