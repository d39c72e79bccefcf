/*
cargo run --bin validate_conversion -- \
    --input  data/OR-Instruct-Data-3K.jsonl \
    --output data/OR-Instruct-Data-3K-Gurobipy.jsonl \
    --report data/conversion_validation_report.txt
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use coptpy_to_gurobipy::{inspect, report, validate, validator::load_records};
use log::{info, warn};

/// Audit a converted corpus and write a plain-text report.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Original JSONL (coptpy)
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    /// Converted JSONL (gurobipy)
    #[arg(long, value_name = "PATH")]
    output: PathBuf,

    /// Report file, overwritten
    #[arg(long, value_name = "PATH")]
    report: PathBuf,

    /// Random entries to print for manual inspection
    #[arg(long, default_value_t = 5)]
    samples: usize,

    /// Issues shown on the console (the report lists all of them)
    #[arg(long, default_value_t = 10)]
    max_console_issues: usize,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    coptpy_to_gurobipy::logging::init(&cli.log_dir, "validate_conversion")?;
    info!("Started - original: {:?}, converted: {:?}", cli.input, cli.output);

    let rule = "=".repeat(80);
    println!("{rule}\nValidating Converted Dataset\n{rule}");

    let original = load_records(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let converted = load_records(&cli.output)
        .with_context(|| format!("failed to read {}", cli.output.display()))?;
    println!("\nOriginal dataset: {} entries", original.len());
    println!("Converted dataset: {} entries", converted.len());

    let (stats, issues) = validate(&converted, &original).inspect_err(|e| {
        warn!("{e}");
        println!("⚠ WARNING: Dataset sizes don't match!");
    })?;
    println!("  Validated {} entries.", stats.total_entries);

    println!("\n{rule}\nValidation Statistics\n{rule}\n");
    print!("{}", report::console_summary(&stats, &issues, cli.max_console_issues));

    println!("\n{rule}\nRandom Sample Inspection\n{rule}");
    let mut rng = rand::thread_rng();
    for (i, idx) in inspect::random_indices(&mut rng, converted.len(), cli.samples)
        .into_iter()
        .enumerate()
    {
        println!("\n--- Sample {} (Entry {idx}) ---", i + 1);
        if let Some(code) = inspect::code_block(&converted[idx].completion) {
            println!("Code snippet (first 300 chars):");
            println!("{}...", inspect::truncate_chars(code, 300));
        }
    }

    let original_mb = inspect::file_size_mb(&cli.input)?;
    let converted_mb = inspect::file_size_mb(&cli.output)?;
    println!("\n{rule}\nFile Size Comparison\n{rule}");
    println!("Original file size: {original_mb:.2} MB");
    println!("Converted file size: {converted_mb:.2} MB");
    if original_mb > 0.0 {
        println!(
            "Size difference: {:.2} MB ({:.1}%)",
            converted_mb - original_mb,
            (converted_mb / original_mb - 1.0) * 100.0
        );
    }

    report::save_report(&cli.report, &stats, &issues)
        .with_context(|| format!("cannot write report {}", cli.report.display()))?;
    info!("Report written to {:?} ({} issues)", cli.report, issues.len());

    println!("\n{rule}\nValidation Complete!\n{rule}");
    println!("\nValidation report saved to: {}", cli.report.display());
    Ok(())
}
