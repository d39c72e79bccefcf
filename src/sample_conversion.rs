/*
cargo run --bin sample_conversion -- \
    --input data/OR-Instruct-Data-3K.jsonl \
    --num-samples 3 \
    --comparison data/sample_comparison.txt
*/

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use coptpy_to_gurobipy::{inspect, Converter, RuleTable, SplitPolicy};
use log::info;

/// Convert the first few entries and print them side by side.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Input JSONL (coptpy)
    #[arg(long, value_name = "PATH")]
    input: PathBuf,

    #[arg(long, default_value_t = 3)]
    num_samples: usize,

    /// Where to write a full before/after dump of one entry
    #[arg(long, value_name = "PATH")]
    comparison: Option<PathBuf>,

    /// 0-based entry used for the comparison dump
    #[arg(long, default_value_t = 0)]
    sample_idx: usize,

    #[arg(long, value_name = "PATH")]
    rules: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = SplitPolicy::FirstPresent)]
    split_policy: SplitPolicy,

    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    coptpy_to_gurobipy::logging::init(&cli.log_dir, "sample_conversion")?;
    info!("Sampling {} entries from {:?}", cli.num_samples, cli.input);

    let rules = match &cli.rules {
        Some(path) => RuleTable::from_json_file(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => RuleTable::default(),
    };
    let converter = Converter::new(rules, cli.split_policy);

    let rule = "=".repeat(80);
    println!("{rule}");
    println!("Testing COPTPY to Gurobipy Conversion on Sample Entries");
    println!("{rule}");

    let entries = inspect::read_head(&cli.input, cli.num_samples)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    for (idx, entry) in entries.iter().enumerate() {
        let converted = converter.convert_entry(entry);
        print!("{}", inspect::describe_sample(idx + 1, entry, &converted));
    }

    println!("\n{rule}");
    println!("Testing Complete!");
    println!("{rule}");

    if let Some(path) = &cli.comparison {
        println!("\nSaving detailed comparison of entry {}...", cli.sample_idx);
        let Some(entry) = inspect::read_at(&cli.input, cli.sample_idx)? else {
            bail!(
                "{} has no entry at index {}",
                cli.input.display(),
                cli.sample_idx
            );
        };
        let converted = converter.convert_entry(&entry);
        inspect::save_comparison(path, &entry, &converted)
            .with_context(|| format!("cannot write {}", path.display()))?;
        info!("Comparison written to {:?}", path);
        println!("Detailed comparison saved to: {}", path.display());
    }

    Ok(())
}
