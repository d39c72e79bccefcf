//! Helpers for eyeballing a conversion: sample printouts, before/after
//! comparison files and random spot checks.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use rand::Rng;

use crate::error::Result;
use crate::record::Record;

const RULE: &str = "================================================================================";
const PYTHON_FENCE: &str = "```python";
const FENCE: &str = "```";

struct SampleCheck {
    needle: &'static str,
    label: &'static str,
    // not every entry has integer variables or a maximisation objective
    optional: bool,
}

const SAMPLE_CHECKS: &[SampleCheck] = &[
    SampleCheck {
        needle: "import gurobipy as gp",
        label: "Import statement conversion",
        optional: false,
    },
    SampleCheck {
        needle: "from gurobipy import GRB",
        label: "GRB constant import",
        optional: false,
    },
    SampleCheck {
        needle: "gp.Env()",
        label: "Environment creation",
        optional: false,
    },
    SampleCheck {
        needle: "gp.Model(",
        label: "Model creation",
        optional: false,
    },
    SampleCheck {
        needle: "GRB.INTEGER",
        label: "Variable type constant",
        optional: true,
    },
    SampleCheck {
        needle: "GRB.MAXIMIZE",
        label: "Objective sense constant",
        optional: true,
    },
    SampleCheck {
        needle: "GRB.OPTIMAL",
        label: "Status constant",
        optional: false,
    },
    SampleCheck {
        needle: "model.ObjVal",
        label: "Objective value attribute",
        optional: false,
    },
    SampleCheck {
        needle: "gurobipy",
        label: "Text reference to gurobipy",
        optional: false,
    },
];

/// Longest prefix of at most `max_chars` characters.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte, _)) => &s[..byte],
        None => s,
    }
}

/// Body of the first ```` ```python ```` block; an unterminated block runs to the end.
pub fn code_block(completion: &str) -> Option<&str> {
    let start = completion.find(PYTHON_FENCE)? + PYTHON_FENCE.len();
    let rest = &completion[start..];
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    Some(rest.find(FENCE).map_or(rest, |end| &rest[..end]))
}

/// Console rendering of one converted sample (1-based `number`).
pub fn describe_sample(number: usize, original: &Record, converted: &Record) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{RULE}\nSAMPLE {number}\n{RULE}\n"));

    out.push_str("\n--- PROMPT CONVERSION ---\n");
    out.push_str("\nORIGINAL PROMPT (first 200 chars):\n");
    out.push_str(&format!("{}...\n", truncate_chars(&original.prompt, 200)));
    out.push_str("\nCONVERTED PROMPT (first 200 chars):\n");
    out.push_str(&format!("{}...\n", truncate_chars(&converted.prompt, 200)));

    out.push_str("\n--- COMPLETION CONVERSION ---\n");
    if let Some(code) = code_block(&original.completion) {
        out.push_str("\nORIGINAL CODE (first 500 chars):\n");
        out.push_str(&format!("{}...\n", truncate_chars(code, 500)));
    }
    if let Some(code) = code_block(&converted.completion) {
        out.push_str("\nCONVERTED CODE (first 500 chars):\n");
        out.push_str(&format!("{}...\n", truncate_chars(code, 500)));
    }

    out.push_str("\n--- VERIFICATION CHECKS ---\n");
    let text = converted.completion.as_str();
    for check in SAMPLE_CHECKS {
        if text.contains(check.needle) {
            out.push_str(&format!("✓ {}: FOUND\n", check.label));
        } else if check.optional {
            out.push_str(&format!("- {}: Not in this sample (OK)\n", check.label));
        } else {
            out.push_str(&format!("✗ {}: MISSING\n", check.label));
        }
    }

    if text.contains("## Mathematical Model:") {
        out.push_str("✓ Mathematical Model section: PRESERVED\n");
    } else {
        out.push_str("✗ Mathematical Model section: ISSUE\n");
    }
    if text.contains("coptpy") {
        out.push_str("⚠ Warning: 'coptpy' still found in completion\n");
    } else {
        out.push_str("✓ All coptpy references: REMOVED\n");
    }
    if text.contains("COPT.") {
        out.push_str("⚠ Warning: 'COPT.' still found in completion\n");
    } else {
        out.push_str("✓ All COPT. references: REMOVED\n");
    }
    out
}

pub fn write_comparison<W: Write>(
    mut w: W,
    original: &Record,
    converted: &Record,
) -> io::Result<()> {
    for (title, rec) in [
        ("BEFORE CONVERSION (COPTPY)", original),
        ("AFTER CONVERSION (GUROBIPY)", converted),
    ] {
        writeln!(w, "{RULE}\n{title}\n{RULE}\n")?;
        write!(w, "PROMPT:\n{}\n\nCOMPLETION:\n{}\n\n", rec.prompt, rec.completion)?;
    }
    w.flush()
}

pub fn save_comparison(path: &Path, original: &Record, converted: &Record) -> io::Result<()> {
    write_comparison(BufWriter::new(File::create(path)?), original, converted)
}

/// First `n` records of a JSONL file; a bad line among them is an error.
pub fn read_head(path: &Path, n: usize) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::with_capacity(n);
    for (idx, line) in reader.lines().take(n).enumerate() {
        records.push(Record::from_line(&line?, idx + 1)?);
    }
    Ok(records)
}

/// Record at 0-based `index`, or `None` when the file is shorter.
pub fn read_at(path: &Path, index: usize) -> Result<Option<Record>> {
    let reader = BufReader::new(File::open(path)?);
    match reader.lines().nth(index) {
        Some(line) => Ok(Some(Record::from_line(&line?, index + 1)?)),
        None => Ok(None),
    }
}

/// Up to `amount` distinct indices below `len`, in random order.
pub fn random_indices<R: Rng + ?Sized>(rng: &mut R, len: usize, amount: usize) -> Vec<usize> {
    rand::seq::index::sample(rng, len, amount.min(len)).into_vec()
}

pub fn file_size_mb(path: &Path) -> io::Result<f64> {
    Ok(fs::metadata(path)?.len() as f64 / (1024.0 * 1024.0))
}
