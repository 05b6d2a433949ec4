//! Command-line interface definitions using clap
//!
//! One batch invocation per process: aggregate a window of orders into
//! trend rows, print the run report, optionally export the marker file.

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movietrends")]
#[command(version)]
#[command(about = "Aggregate order data by location into movie trends", long_about = None)]
pub struct Cli {
    /// Window size in days; orders created between N days ago and today
    /// (both inclusive) are aggregated
    #[arg(long, default_value_t = 30)]
    pub days: u32,

    /// Merge accumulated counts into existing trend rows instead of
    /// skipping them
    #[arg(long)]
    pub force: bool,

    /// Write the map-marker JSON file after aggregating
    #[arg(long)]
    pub export_json: bool,

    /// Destination path for the exported marker file
    #[arg(long, default_value = "movie_trends.json")]
    pub export_file: PathBuf,

    /// Path to the SQLite store (defaults to the platform data directory)
    #[arg(long)]
    pub db: Option<PathBuf>,
}
