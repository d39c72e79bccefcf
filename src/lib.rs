//! Rewrites the OR-Instruct corpus from the COPT Python API (`coptpy`) to the
//! Gurobi Python API (`gurobipy`), and audits the result.
//!
//! The rewrite is textual: an ordered regex table ([`rules`]) applied to the
//! code section of each completion ([`converter`]), streamed over a JSONL file
//! ([`pipeline`]). [`validator`] re-reads the output and counts what made it.

pub mod converter;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod pipeline;
pub mod record;
pub mod report;
pub mod rules;
pub mod validator;

pub use converter::{Converter, Split, SplitPolicy};
pub use error::{Error, Result};
pub use pipeline::{convert_dataset, convert_stream, ConversionSummary};
pub use record::Record;
pub use rules::{Rule, RuleSpec, RuleTable, Scope};
pub use validator::{validate, validate_files, Issue, Stats};
