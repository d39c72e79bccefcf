//! Streams a JSONL corpus through the [`Converter`], one line at a time.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use indicatif::ProgressBar;
use log::{info, warn};

use crate::converter::Converter;
use crate::error::Result;
use crate::record::Record;

const PROGRESS_EVERY: usize = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionSummary {
    pub total: usize,
    pub succeeded: usize,
}

impl ConversionSummary {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// Percentage of lines converted; 0 for an empty input.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64 * 100.0
        }
    }
}

/// Convert `input` into `output` (overwritten).
///
/// A line that is not a valid record is logged and skipped, so the output is
/// only index-aligned with the input when `failed() == 0`.
pub fn convert_dataset(
    converter: &Converter,
    input: &Path,
    output: &Path,
    bar: &ProgressBar,
) -> Result<ConversionSummary> {
    let reader = BufReader::new(File::open(input)?);
    let writer = BufWriter::new(File::create(output)?);
    convert_stream(converter, reader, writer, bar)
}

pub fn convert_stream<R: BufRead, W: Write>(
    converter: &Converter,
    reader: R,
    mut writer: W,
    bar: &ProgressBar,
) -> Result<ConversionSummary> {
    let mut summary = ConversionSummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        summary.total += 1;
        bar.inc(1);

        let record = match Record::from_line(&line, line_no) {
            Ok(r) => r,
            Err(e) => {
                warn!("Error processing entry {line_no}: {e}");
                bar.println(format!("Error processing entry {line_no}: {e}"));
                continue;
            }
        };

        let converted = converter.convert_entry(&record);
        writeln!(writer, "{}", converted.to_line()?)?;
        summary.succeeded += 1;

        if line_no % PROGRESS_EVERY == 0 {
            info!("Processed {line_no} entries...");
        }
    }

    writer.flush()?;
    Ok(summary)
}
