//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs logging
//! - runs the fetch/process pipeline
//! - prints the report
//! - writes the aggregate CSV and the chart

use std::fs::create_dir_all;

use clap::Parser;
use tracing::info;

use crate::cli::{Cli, Command, PlotArgs, RunArgs};
use crate::config::Settings;
use crate::domain::{RunConfig, lookup_state};
use crate::error::AppError;
use crate::io::{OutputPaths, read_aggregate_csv, write_aggregate_csv};
use crate::plot::{build_chart_data, render_png};

pub mod pipeline;

/// Entry point for the `impacts` binary.
pub fn run() -> Result<(), AppError> {
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    crate::logging::init_tracing(cli.verbose)?;

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let settings = Settings::from_env()?;
    let config = run_config_from_args(&args, &settings);
    println!("Using input: state={}, keywords={:?}", config.state, config.keywords);

    let run = pipeline::run_pipeline(&config, &settings)?;
    println!(
        "{}",
        crate::report::format_run_summary(&run.input, &run.window, &run.raw, &run.processed)
    );

    create_dir_all(&config.output_dir).map_err(|e| {
        AppError::new(
            2,
            format!("Failed to create output dir '{}': {e}", config.output_dir.display()),
        )
    })?;
    let paths = OutputPaths::for_state(&config.output_dir, run.input.state.name);

    write_aggregate_csv(&paths.csv, &run.processed.aggregate)?;
    info!(path = %paths.csv.display(), rows = run.processed.aggregate.records.len(), "aggregate table written");
    println!("Aggregated table saved at {}", paths.csv.display());

    if config.plot {
        let chart = build_chart_data(run.input.state.name, &run.processed.aggregate);
        render_png(&paths.png, &chart, config.plot_width, config.plot_height)?;
        info!(path = %paths.png.display(), "chart written");
        println!("Visualization saved at {}", paths.png.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let table = read_aggregate_csv(&args.csv)?;

    // Prefer an explicit state; fall back to the one encoded in the file name.
    let state_name = match &args.state {
        Some(raw) => lookup_state(raw)
            .map(|s| s.name.to_string())
            .ok_or_else(|| AppError::invalid_state(raw))?,
        None => OutputPaths::state_from_csv(&args.csv).unwrap_or_else(|| "Aggregate".to_string()),
    };
    let out = args.out.clone().unwrap_or_else(|| OutputPaths::png_for_csv(&args.csv));

    let chart = build_chart_data(&state_name, &table);
    render_png(&out, &chart, args.width, args.height)?;
    info!(path = %out.display(), weeks = table.records.len(), "chart written");
    println!("Visualization saved at {}", out.display());
    Ok(())
}

pub fn run_config_from_args(args: &RunArgs, settings: &Settings) -> RunConfig {
    RunConfig {
        state: args.state.clone(),
        keywords: args.keywords.clone(),
        days: args.days,
        output_dir: args.output_dir.clone().unwrap_or_else(|| settings.output_dir.clone()),
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}

/// Rewrite argv so flags without a subcommand mean `run`.
///
/// Rules:
/// - `impacts --state X -k a,b`     -> `impacts run --state X -k a,b`
/// - `impacts --help/--version/-h`   -> unchanged (top-level help/version)
/// - `impacts [-v] run|plot|help ...` -> unchanged
///
/// Leading global flags (`-v`) are skipped before deciding.
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(first) = argv
        .iter()
        .skip(1)
        .find(|arg| !matches!(arg.as_str(), "-v" | "--verbose"))
        .cloned()
    else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        first.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(first.as_str(), "run" | "plot");
    if is_subcommand {
        return argv;
    }

    if first.starts_with('-') {
        argv.insert(1, "run".to_string());
    }
    argv
}
