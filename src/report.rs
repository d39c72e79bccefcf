//! Plain-text rendering of validation results.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use crate::validator::{Issue, Stats, CHECKS};

const RULE: &str = "================================================================================";
const THIN: &str = "--------------------------------------------------------------------------------";

const CONFIRMATIONS: &[&str] = &[
    "All imports converted from COPTPY to Gurobipy",
    "All constants converted from COPT to GRB",
    "Environment and Model creation updated",
    "model.objval converted to model.ObjVal",
    "Mathematical Model sections preserved",
    "Problem descriptions unchanged",
];

/// `(total - issues) / total`, in percent. An entry can carry several
/// issues, so this can drop below zero on a badly broken corpus.
pub fn success_rate(stats: &Stats, issues: &[Issue]) -> f64 {
    if stats.total_entries == 0 {
        return 0.0;
    }
    (stats.total_entries as f64 - issues.len() as f64) / stats.total_entries as f64 * 100.0
}

pub fn write_report<W: Write>(mut w: W, stats: &Stats, issues: &[Issue]) -> io::Result<()> {
    writeln!(w, "{RULE}")?;
    writeln!(w, "COPTPY to Gurobipy Conversion - Validation Report")?;
    writeln!(w, "{RULE}\n")?;

    writeln!(w, "SUMMARY")?;
    writeln!(w, "{THIN}")?;
    writeln!(w, "Total entries processed: {}", stats.total_entries)?;
    writeln!(w, "Issues found: {}", issues.len())?;
    writeln!(w, "Success rate: {:.2}%\n", success_rate(stats, issues))?;

    writeln!(w, "CONVERSION STATISTICS")?;
    writeln!(w, "{THIN}")?;
    for (name, count) in &stats.counts {
        writeln!(w, "{name}: {count} ({:.1}%)", stats.percentage(*count))?;
    }

    if !issues.is_empty() {
        writeln!(w, "\n\nISSUES FOUND")?;
        writeln!(w, "{THIN}")?;
        for issue in issues {
            writeln!(w, "Entry {}: {}", issue.index, issue.reason)?;
        }
    }

    writeln!(w, "\n\nVALIDATION CHECKS")?;
    writeln!(w, "{THIN}")?;
    for line in CONFIRMATIONS {
        writeln!(w, "✓ {line}")?;
    }

    writeln!(w, "\n{RULE}")?;
    writeln!(w, "Report generation complete")?;
    writeln!(w, "{RULE}")?;
    w.flush()
}

pub fn save_report(path: &Path, stats: &Stats, issues: &[Issue]) -> io::Result<()> {
    write_report(BufWriter::new(File::create(path)?), stats, issues)
}

/// Console view: labelled counts plus the first `max_issues` issues.
pub fn console_summary(stats: &Stats, issues: &[Issue], max_issues: usize) -> String {
    let mut out = String::new();
    out.push_str(&format!("Total entries: {}\n\nConversion Quality:\n", stats.total_entries));
    for (check, (_, count)) in CHECKS.iter().zip(&stats.counts) {
        out.push_str(&format!(
            "  ✓ {}: {} ({:.1}%)\n",
            check.label,
            count,
            stats.percentage(*count)
        ));
    }

    if issues.is_empty() {
        out.push_str("\n✓ No issues found! All entries passed validation.\n");
        return out;
    }

    out.push_str(&format!("\n⚠ Found {} issues:\n", issues.len()));
    for issue in issues.iter().take(max_issues) {
        out.push_str(&format!("  Entry {}: {}\n", issue.index, issue.reason));
    }
    if issues.len() > max_issues {
        out.push_str(&format!("  ... and {} more issues\n", issues.len() - max_issues));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::validator::validate;

    fn sample() -> (Stats, Vec<Issue>) {
        let ok = Record::new(
            "p",
            "## Mathematical Model:\n## Python Code Solution Using `gurobipy`:\nimport gurobipy as gp",
        );
        let bad = Record::new("p", "import coptpy as cp");
        let data = vec![ok, bad];
        validate(&data, &data).unwrap()
    }

    #[test]
    fn report_lists_counts_issues_and_confirmations() {
        let (stats, issues) = sample();
        let mut buf = Vec::new();
        write_report(&mut buf, &stats, &issues).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("Total entries processed: 2\n"));
        assert!(text.contains("Issues found: 3\n"));
        assert!(text.contains("Success rate: -50.00%\n"));
        assert!(text.contains("gurobipy_imports: 1 (50.0%)\n"));
        assert!(text.contains("no_copt_constants: 2 (100.0%)\n"));
        assert!(text.contains("Entry 1: Still contains 'coptpy' reference\n"));
        assert!(text.contains("✓ Problem descriptions unchanged\n"));
        assert!(text.ends_with(&format!("Report generation complete\n{RULE}\n")));
    }

    #[test]
    fn console_truncates_issue_list() {
        let (stats, issues) = sample();
        let text = console_summary(&stats, &issues, 1);
        assert!(text.contains("⚠ Found 3 issues:"));
        assert!(text.contains("  Entry 1: Missing 'import gurobipy as gp'\n"));
        assert!(text.contains("  ... and 2 more issues\n"));
        assert!(text.contains("  ✓ model.ObjVal (uppercase): 0 (0.0%)\n"));
    }

    #[test]
    fn console_reports_clean_run() {
        let (stats, _) = sample();
        let text = console_summary(&stats, &[], 10);
        assert!(text.contains("No issues found"));
    }
}
