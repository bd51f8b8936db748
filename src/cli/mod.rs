//! Command-line parsing.
//!
//! Argument parsing and dispatch stay separate from fetching and processing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "impacts",
    version,
    about = "COVID-19 case counts vs. Google Trends search interest, per U.S. state"
)]
pub struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, aggregate, and write the weekly table and chart.
    Run(RunArgs),
    /// Re-render the chart from a saved aggregate CSV (no network).
    Plot(PlotArgs),
}

/// Options for a full run.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// U.S. state, full name or two-letter abbreviation.
    #[arg(short = 's', long)]
    pub state: String,

    /// Comma-separated search terms (1-5); order sets the column order.
    #[arg(short = 'k', long, value_delimiter = ',', num_args = 1.., required = true)]
    pub keywords: Vec<String>,

    /// Trailing window in days, ending yesterday.
    #[arg(
        short = 'd',
        long,
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS))
    )]
    pub days: u32,

    /// Output directory (defaults to IMPACTS_OUTPUT_DIR or `outputs`).
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Skip rendering the chart.
    #[arg(long)]
    pub no_plot: bool,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}

/// Options for plotting a saved table.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Aggregate CSV produced by `impacts run`.
    #[arg(long, value_name = "CSV")]
    pub csv: PathBuf,

    /// State for the chart title (defaults to the one in the file name).
    #[arg(long)]
    pub state: Option<String>,

    /// Output PNG (defaults to the chart name next to the CSV).
    #[arg(long, value_name = "PNG")]
    pub out: Option<PathBuf>,

    /// Chart width (pixels).
    #[arg(long, default_value_t = 1200)]
    pub width: u32,

    /// Chart height (pixels).
    #[arg(long, default_value_t = 700)]
    pub height: u32,
}
