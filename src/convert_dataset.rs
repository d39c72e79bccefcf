/*
cargo run --bin convert_dataset -- \
    --input  data/OR-Instruct-Data-3K.jsonl \
    --output data/OR-Instruct-Data-3K-Gurobipy.jsonl
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coptpy_to_gurobipy::{convert_dataset, Converter, RuleTable, SplitPolicy};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

/// Convert a coptpy JSONL corpus to gurobipy.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input JSONL (coptpy)
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Output JSONL (gurobipy), overwritten
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// JSON file replacing the built-in substitution table
    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SplitPolicy::FirstPresent)]
    split_policy: SplitPolicy,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_path = coptpy_to_gurobipy::logging::init(&cli.log_dir, "convert_dataset")?;
    info!("Started - input: {:?}, output: {:?}", cli.input, cli.output);

    let rules = match &cli.rules {
        Some(path) => RuleTable::from_json_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => RuleTable::default(),
    };
    info!("{} rules, split policy {:?}", rules.len(), cli.split_policy);
    let converter = Converter::new(rules, cli.split_policy);

    println!("{}", "=".repeat(60));
    println!("COPTPY to Gurobipy Dataset Converter");
    println!("{}", "=".repeat(60));
    println!("\nInput file: {}", cli.input.display());
    println!("Output file: {}", cli.output.display());
    println!("\nStarting conversion...\n");

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] {pos} entries ({per_sec})",
    )?);

    let summary = convert_dataset(&converter, &cli.input, &cli.output, &bar)
        .with_context(|| format!("conversion of {} failed", cli.input.display()))?;
    bar.finish_and_clear();
    info!(
        "Finished - total: {}, converted: {}, failed: {}",
        summary.total,
        summary.succeeded,
        summary.failed()
    );

    println!("\n{}", "=".repeat(60));
    println!("Conversion Complete!");
    println!("{}", "=".repeat(60));
    println!("Total entries          : {}", summary.total);
    println!("Successfully converted : {}", summary.succeeded);
    println!("Failed conversions     : {}", summary.failed());
    println!("Success rate           : {:.2}%", summary.success_rate());
    println!("\nOutput saved to: {}", cli.output.display());
    println!("Log file: {}", log_path.display());
    println!("{}", "=".repeat(60));

    Ok(())
}
