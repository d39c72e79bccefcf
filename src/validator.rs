//! Audit of a converted corpus against a fixed battery of substring checks.
//!
//! The validator only looks at the file format, never at the converter, so
//! it catches regressions in the rule table as well as corpus oddities.

use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
};

use log::info;

use crate::error::{Error, Result};
use crate::record::Record;
use crate::rules::TARGET_HEADER;

#[derive(Debug, Clone, Copy)]
enum Expect {
    Contains(&'static str),
    Lacks(&'static str),
    LacksIgnoreCase(&'static str),
}

impl Expect {
    fn holds(self, text: &str, lowered: &str) -> bool {
        match self {
            Expect::Contains(s) => text.contains(s),
            Expect::Lacks(s) => !text.contains(s),
            Expect::LacksIgnoreCase(s) => !lowered.contains(s),
        }
    }
}

/// One named check; `issue` is recorded when the check fails.
#[derive(Debug, Clone, Copy)]
pub struct Check {
    pub name: &'static str,
    pub label: &'static str,
    expect: Expect,
    issue: Option<&'static str>,
}

pub const CHECKS: &[Check] = &[
    Check {
        name: "gurobipy_imports",
        label: "Gurobipy imports (import gurobipy as gp)",
        expect: Expect::Contains("import gurobipy as gp"),
        issue: Some("Missing 'import gurobipy as gp'"),
    },
    Check {
        name: "grb_constants",
        label: "GRB constant imports",
        expect: Expect::Contains("from gurobipy import GRB"),
        issue: None,
    },
    Check {
        name: "gp_env_calls",
        label: "gp.Env() calls",
        expect: Expect::Contains("gp.Env()"),
        issue: None,
    },
    Check {
        name: "gp_model_calls",
        label: "gp.Model() calls",
        expect: Expect::Contains("gp.Model("),
        issue: None,
    },
    Check {
        name: "objval_uppercase",
        label: "model.ObjVal (uppercase)",
        expect: Expect::Contains("model.ObjVal"),
        issue: None,
    },
    Check {
        name: "math_model_preserved",
        label: "Mathematical Model preserved",
        expect: Expect::Contains("## Mathematical Model:"),
        issue: Some("Mathematical Model section missing"),
    },
    Check {
        name: "no_coptpy_in_code",
        label: "No 'coptpy' references",
        expect: Expect::LacksIgnoreCase("coptpy"),
        issue: Some("Still contains 'coptpy' reference"),
    },
    Check {
        name: "no_copt_constants",
        label: "No 'COPT.' constants",
        expect: Expect::Lacks("COPT."),
        issue: Some("Still contains 'COPT.' constant"),
    },
    Check {
        name: "gurobipy_text_refs",
        label: "Gurobipy text references",
        expect: Expect::Contains("gurobipy"),
        issue: None,
    },
    Check {
        name: "gurobipy_header",
        label: "Gurobipy code-section header",
        expect: Expect::Contains(TARGET_HEADER),
        issue: None,
    },
];

/// Per-check pass counts, in [`CHECKS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stats {
    pub total_entries: usize,
    pub counts: Vec<(&'static str, usize)>,
}

impl Stats {
    fn empty(total_entries: usize) -> Self {
        Self {
            total_entries,
            counts: CHECKS.iter().map(|c| (c.name, 0)).collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, count)| *count)
    }

    /// `count` as a percentage of all entries; 0 when there are none.
    pub fn percentage(&self, count: usize) -> f64 {
        percent(count, self.total_entries)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub index: usize,
    pub reason: String,
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Run every check on every converted record.
///
/// The original records are only used for the size precondition; on a
/// mismatch nothing is checked.
pub fn validate(converted: &[Record], original: &[Record]) -> Result<(Stats, Vec<Issue>)> {
    if converted.len() != original.len() {
        return Err(Error::DatasetSizeMismatch {
            original: original.len(),
            converted: converted.len(),
        });
    }

    let mut stats = Stats::empty(converted.len());
    let mut issues = Vec::new();

    for (index, record) in converted.iter().enumerate() {
        let text = record.completion.as_str();
        let lowered = text.to_lowercase();

        for (check, (_, count)) in CHECKS.iter().zip(stats.counts.iter_mut()) {
            if check.expect.holds(text, &lowered) {
                *count += 1;
            } else if let Some(reason) = check.issue {
                issues.push(Issue {
                    index,
                    reason: reason.to_owned(),
                });
            }
        }

        if (index + 1) % 500 == 0 {
            info!("Validated {} entries...", index + 1);
        }
    }

    info!(
        "Validated {} entries, {} issues",
        stats.total_entries,
        issues.len()
    );
    Ok((stats, issues))
}

/// Read a JSONL file strictly: any bad line fails the whole load.
pub fn load_records(path: &Path) -> Result<Vec<Record>> {
    let reader = BufReader::new(File::open(path)?);
    let mut records = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        records.push(Record::from_line(&line?, idx + 1)?);
    }
    Ok(records)
}

pub fn validate_files(converted: &Path, original: &Path) -> Result<(Stats, Vec<Issue>)> {
    let original = load_records(original)?;
    let converted = load_records(converted)?;
    info!(
        "Original dataset: {} entries, converted dataset: {} entries",
        original.len(),
        converted.len()
    );
    validate(&converted, &original)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good() -> Record {
        Record::new(
            "p",
            "## Mathematical Model:\nmax z\n## Python Code Solution Using `gurobipy`:\n```python\nimport gurobipy as gp\nfrom gurobipy import GRB\nenv = gp.Env()\nmodel = gp.Model(\"m\")\nprint(model.ObjVal)\n```",
        )
    }

    #[test]
    fn clean_record_passes_every_check() {
        let (stats, issues) = validate(&[good()], &[good()]).unwrap();
        assert!(issues.is_empty());
        assert_eq!(stats.total_entries, 1);
        for (name, count) in &stats.counts {
            assert_eq!(*count, 1, "{name}");
        }
    }

    #[test]
    fn residual_source_tokens_raise_issues() {
        let bad = Record::new("p", "import coptpy as cp\nx = COPT.INTEGER\nCOPTPY rocks");
        let (stats, issues) = validate(&[good(), bad.clone()], &[bad.clone(), bad]).unwrap();

        assert_eq!(stats.get("gurobipy_imports"), Some(1));
        assert_eq!(stats.get("no_coptpy_in_code"), Some(1));
        assert_eq!(stats.get("no_copt_constants"), Some(1));
        assert_eq!(stats.get("nonexistent"), None);

        let reasons: Vec<_> = issues.iter().map(|i| (i.index, i.reason.as_str())).collect();
        assert_eq!(
            reasons,
            [
                (1, "Missing 'import gurobipy as gp'"),
                (1, "Mathematical Model section missing"),
                (1, "Still contains 'coptpy' reference"),
                (1, "Still contains 'COPT.' constant"),
            ]
        );
    }

    #[test]
    fn coptpy_check_ignores_case() {
        let rec = Record::new("p", "import gurobipy as gp # was CoptPy");
        let (stats, issues) = validate(&[rec.clone()], &[rec]).unwrap();
        assert_eq!(stats.get("no_coptpy_in_code"), Some(0));
        assert!(issues.iter().any(|i| i.reason.contains("'coptpy'")));
    }

    #[test]
    fn size_mismatch_aborts() {
        let err = validate(&[good()], &[]).unwrap_err();
        assert!(matches!(
            err,
            Error::DatasetSizeMismatch { original: 0, converted: 1 }
        ));
    }

    #[test]
    fn empty_inputs_give_zero_percentages() {
        let (stats, issues) = validate(&[], &[]).unwrap();
        assert!(issues.is_empty());
        assert_eq!(stats.counts.len(), CHECKS.len());
        assert_eq!(stats.percentage(0), 0.0);
    }
}
