mod commands;
mod logging;
mod progress;

use std::process;

use clap::Parser;
use colored::*;
use commands::Cli;
use dotenv::dotenv;
use flatdir_core::{AppConfig, FlattenEngine, FlattenResult};
use progress::CliReporter;
use tracing::{error, info};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match flatdir_core::config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    if let Err(err) = run(&args, config) {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run(args: &Cli, config: AppConfig) -> anyhow::Result<()> {
    let max_depth = args.max_depth.or(config.max_depth);
    let engine = FlattenEngine::new(config)
        .with_max_depth(max_depth)
        .dry_run(args.dry_run);
    let reporter = CliReporter::new();
    let result = engine.run(&args.input_dir, &args.output_dir, &reporter)?;

    if args.dry_run {
        print_plan(&args.output_dir, &result);
    }
    print_summary(&result);

    Ok(())
}

fn print_plan(output_dir: &std::path::Path, result: &FlattenResult) {
    for entry in &result.plan.entries {
        let destination = output_dir.join(&entry.destination.relative_output_path);
        let destination = destination.display().to_string();
        println!(
            "{} -> {}",
            entry.source.absolute_path.display(),
            if entry.is_renamed() {
                destination.yellow()
            } else {
                destination.normal()
            }
        );
    }
}

fn print_summary(result: &FlattenResult) {
    info!(
        "Scan: {}, Plan: {}, Copy: {}",
        format!("{:.2}s", result.scan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.plan_duration.as_secs_f64()).green(),
        format!("{:.2}s", result.copy_duration.as_secs_f64()).green(),
    );
    info!(
        "{} files scanned, {} skipped, {} output directories",
        format!("{}", result.total_files_scanned).cyan(),
        format!("{}", result.skipped_entries).red(),
        format!("{}", result.groups).cyan(),
    );
    info!(
        "{} files copied ({} bytes), {} renamed",
        format!("{}", result.files_copied).green(),
        format!("{}", result.bytes_copied).green(),
        format!("{}", result.renamed_files).yellow(),
    );
}
