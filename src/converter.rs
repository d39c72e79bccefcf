//! Per-entry conversion: prompt fragment swap plus section-aware completion rewrite.

use clap::ValueEnum;
use log::debug;

use crate::record::Record;
use crate::rules::{RuleTable, PROMPT_SOURCE, PROMPT_TARGET, SOURCE_HEADERS, TARGET_HEADER};

/// How the header variants are walked when the canonical header does not
/// produce a clean two-part split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SplitPolicy {
    /// Stop at the first variant that occurs at all; it must occur exactly once.
    #[default]
    FirstPresent,
    /// Take the first variant that occurs exactly once.
    FirstStructured,
}

/// Result of locating the code-section header in a completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Split<'a> {
    Structured {
        header: &'static str,
        math_model: &'a str,
        code: &'a str,
    },
    Unsplit,
}

#[derive(Debug, Clone, Default)]
pub struct Converter {
    rules: RuleTable,
    policy: SplitPolicy,
}

impl Converter {
    pub fn new(rules: RuleTable, policy: SplitPolicy) -> Self {
        Self { rules, policy }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn policy(&self) -> SplitPolicy {
        self.policy
    }

    pub fn convert_prompt(&self, prompt: &str) -> String {
        prompt.replace(PROMPT_SOURCE, PROMPT_TARGET)
    }

    pub fn split_completion<'a>(&self, completion: &'a str) -> Split<'a> {
        match self.policy {
            SplitPolicy::FirstPresent => SOURCE_HEADERS
                .iter()
                .copied()
                .find(|header| completion.contains(*header))
                .and_then(|header| split_exact(completion, header))
                .unwrap_or(Split::Unsplit),
            SplitPolicy::FirstStructured => SOURCE_HEADERS
                .iter()
                .copied()
                .find_map(|header| split_exact(completion, header))
                .unwrap_or(Split::Unsplit),
        }
    }

    /// Rewrite the code section and header; the math model before the header
    /// is copied through untouched. Without a header only text rules run.
    pub fn convert_completion(&self, completion: &str) -> String {
        match self.split_completion(completion) {
            Split::Structured {
                header,
                math_model,
                code,
            } => {
                debug!("split on {header:?}");
                let code = self.rules.apply_text(&self.rules.apply_code(code));
                let mut out =
                    String::with_capacity(math_model.len() + TARGET_HEADER.len() + code.len());
                out.push_str(math_model);
                out.push_str(TARGET_HEADER);
                out.push_str(&code);
                out
            }
            Split::Unsplit => {
                debug!("no code-section header, applying text rules to whole completion");
                self.rules.apply_text(completion)
            }
        }
    }

    pub fn convert_entry(&self, record: &Record) -> Record {
        Record {
            prompt: self.convert_prompt(&record.prompt),
            completion: self.convert_completion(&record.completion),
        }
    }
}

fn split_exact<'a>(text: &'a str, header: &'static str) -> Option<Split<'a>> {
    let mut parts = text.splitn(3, header);
    let math_model = parts.next()?;
    let code = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    Some(Split::Structured {
        header,
        math_model,
        code,
    })
}
