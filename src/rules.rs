//! Substitution table mapping `coptpy` surface text onto `gurobipy`.
//!
//! The table is plain data: an ordered list of `(scope, pattern, replacement)`
//! rows. Code rules only ever run on the code section of a completion, text
//! rules run on prose and on the code section after the code rules.

use std::{borrow::Cow, fs, path::Path};

use log::warn;
use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Instruction fragment every corpus prompt carries.
pub const PROMPT_SOURCE: &str =
    "Build a mathematical model and corresponding python code using `coptpy`";
pub const PROMPT_TARGET: &str =
    "Build a mathematical model and corresponding python code using `gurobipy`";

/// Section headers separating the math model from the code, in the order
/// they are tried. The first one is canonical.
pub const SOURCE_HEADERS: [&str; 4] = [
    "## Python Code Solution Using `coptpy`:",
    "## Python Code Solution Using `coptpy`",
    "Python Code Solution Using `coptpy`:",
    "Python Code Solution Using `coptpy`",
];
pub const SOURCE_HEADER: &str = SOURCE_HEADERS[0];
pub const TARGET_HEADER: &str = "## Python Code Solution Using `gurobipy`:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Code,
    Text,
}

// (scope, regex, literal replacement)
const DEFAULT_RULES: &[(Scope, &str, &str)] = &[
    // imports
    (Scope::Code, r"import coptpy as cp", "import gurobipy as gp"),
    (Scope::Code, r"from coptpy import COPT", "from gurobipy import GRB"),
    // environment and model
    (Scope::Code, r"cp\.Envr\(\)", "gp.Env()"),
    (Scope::Code, r"env\.createModel\(", "gp.Model("),
    // variable types
    (Scope::Code, r"COPT\.INTEGER", "GRB.INTEGER"),
    (Scope::Code, r"COPT\.CONTINUOUS", "GRB.CONTINUOUS"),
    (Scope::Code, r"COPT\.BINARY", "GRB.BINARY"),
    // objective sense
    (Scope::Code, r"COPT\.MAXIMIZE", "GRB.MAXIMIZE"),
    (Scope::Code, r"COPT\.MINIMIZE", "GRB.MINIMIZE"),
    // status
    (Scope::Code, r"COPT\.OPTIMAL", "GRB.OPTIMAL"),
    // attributes and helpers
    (Scope::Code, r"model\.objval", "model.ObjVal"),
    (Scope::Code, r"cp\.quicksum\(", "gp.quicksum("),
    // prose
    (Scope::Text, r"using `coptpy`", "using `gurobipy`"),
    (Scope::Text, r"`coptpy` library", "`gurobipy` library"),
    (Scope::Text, r"the `coptpy`", "the `gurobipy`"),
    (
        Scope::Text,
        r"## Python Code Solution Using `coptpy`:",
        "## Python Code Solution Using `gurobipy`:",
    ),
    (Scope::Text, r"COPT environment", "Gurobi environment"),
    (Scope::Text, r"COPT model", "Gurobi model"),
    (Scope::Text, r"Create a COPT", "Create a Gurobi"),
    (Scope::Text, r"create a COPT", "create a Gurobi"),
    (Scope::Text, r"Create COPT", "Create Gurobi"),
    (Scope::Text, r"Creates a COPT", "Creates a Gurobi"),
    // installation
    (Scope::Text, r"pip install coptpy", "pip install gurobipy"),
    (Scope::Text, r"install coptpy", "install gurobipy"),
    (Scope::Text, r"installed coptpy", "installed gurobipy"),
    // one-off phrasings seen in the corpus
    (Scope::Text, r"CPLEX or Gurobi", "optimization solvers"),
    (Scope::Text, r"such as CPLEX or Gurobi", "such as Gurobi"),
    (Scope::Text, r"importing the `coptpy`", "importing the `gurobipy`"),
    (Scope::Text, r"Imports the `coptpy`", "Imports the `gurobipy`"),
    (Scope::Text, r"COPTPY libraries", "Gurobipy libraries"),
    (Scope::Text, r"necessary COPTPY", "necessary Gurobipy"),
    (Scope::Text, r"the COPTPY", "the Gurobipy"),
    (Scope::Text, r"import COPTPY", "import Gurobipy"),
];

static STANDARD: Lazy<RuleTable> = Lazy::new(|| {
    RuleTable::from_specs(DEFAULT_RULES.iter().map(|&(scope, pattern, replacement)| RuleSpec {
        scope,
        pattern: pattern.to_owned(),
        replacement: replacement.to_owned(),
    }))
    .expect("built-in rule patterns compile")
});

/// Serialized form of a rule, as found in a `--rules` override file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RuleSpec {
    pub scope: Scope,
    pub pattern: String,
    pub replacement: String,
}

#[derive(Debug, Clone)]
pub struct Rule {
    scope: Scope,
    pattern: Regex,
    replacement: String,
}

impl Rule {
    pub fn new(spec: RuleSpec) -> Result<Self> {
        let pattern = Regex::new(&spec.pattern).map_err(|source| Error::InvalidRule {
            pattern: spec.pattern.clone(),
            source,
        })?;
        Ok(Self {
            scope: spec.scope,
            pattern,
            replacement: spec.replacement,
        })
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match, case-sensitively. `$` in the replacement is literal.
    pub fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
    }
}

#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl Default for RuleTable {
    fn default() -> Self {
        STANDARD.clone()
    }
}

impl RuleTable {
    pub fn from_specs(specs: impl IntoIterator<Item = RuleSpec>) -> Result<Self> {
        let rules = specs
            .into_iter()
            .map(Rule::new)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Load a JSON array of [`RuleSpec`]. Ordering conflicts are logged, not rejected.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let specs: Vec<RuleSpec> = serde_json::from_str(&fs::read_to_string(path)?)?;
        let table = Self::from_specs(specs)?;
        for (earlier, later) in table.ordering_conflicts() {
            warn!(
                "rule {:?} rewrites output of rule {:?} in {:?}",
                later.pattern(),
                earlier.pattern(),
                path
            );
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn code_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.scope == Scope::Code)
    }

    pub fn text_rules(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(|r| r.scope == Scope::Text)
    }

    /// Rules in the order a code section sees them: code rules, then text rules.
    pub fn application_order(&self) -> impl Iterator<Item = &Rule> {
        self.code_rules().chain(self.text_rules())
    }

    pub fn apply_code(&self, text: &str) -> String {
        fold(self.code_rules(), text)
    }

    pub fn apply_text(&self, text: &str) -> String {
        fold(self.text_rules(), text)
    }

    /// Pairs `(earlier, later)` where `later`'s pattern matches the text
    /// `earlier` produces, i.e. a rule would re-rewrite a previous rule's output.
    pub fn ordering_conflicts(&self) -> Vec<(&Rule, &Rule)> {
        let ordered: Vec<&Rule> = self.application_order().collect();
        let mut conflicts = Vec::new();
        for (i, earlier) in ordered.iter().enumerate() {
            for later in &ordered[i + 1..] {
                if later.pattern.is_match(&earlier.replacement) {
                    conflicts.push((*earlier, *later));
                }
            }
        }
        conflicts
    }
}

fn fold<'a>(rules: impl Iterator<Item = &'a Rule>, text: &str) -> String {
    let mut out = text.to_owned();
    for rule in rules {
        let next = match rule.apply(&out) {
            Cow::Borrowed(_) => continue,
            Cow::Owned(s) => s,
        };
        out = next;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn default_table_has_both_scopes() {
        let table = RuleTable::default();
        assert_eq!(table.code_rules().count(), 12);
        assert_eq!(table.text_rules().count(), 21);
        assert_eq!(table.len(), DEFAULT_RULES.len());
    }

    #[test]
    fn default_table_has_no_ordering_conflicts() {
        let table = RuleTable::default();
        let conflicts: Vec<_> = table
            .ordering_conflicts()
            .into_iter()
            .map(|(a, b)| (a.pattern().to_owned(), b.pattern().to_owned()))
            .collect();
        assert!(conflicts.is_empty(), "{conflicts:?}");
    }

    #[test]
    fn conflicting_table_is_detected() {
        let table = RuleTable::from_specs([
            RuleSpec {
                scope: Scope::Code,
                pattern: "a".into(),
                replacement: "b".into(),
            },
            RuleSpec {
                scope: Scope::Text,
                pattern: "b".into(),
                replacement: "c".into(),
            },
        ])
        .unwrap();
        assert_eq!(table.ordering_conflicts().len(), 1);
    }

    #[rstest]
    #[case("import coptpy as cp", "import gurobipy as gp")]
    #[case("from coptpy import COPT", "from gurobipy import GRB")]
    #[case("env = cp.Envr()", "env = gp.Env()")]
    #[case("model = env.createModel(\"diet\")", "model = gp.Model(\"diet\")")]
    #[case("vtype=COPT.INTEGER", "vtype=GRB.INTEGER")]
    #[case("vtype=COPT.CONTINUOUS", "vtype=GRB.CONTINUOUS")]
    #[case("vtype=COPT.BINARY", "vtype=GRB.BINARY")]
    #[case("sense=COPT.MAXIMIZE", "sense=GRB.MAXIMIZE")]
    #[case("sense=COPT.MINIMIZE", "sense=GRB.MINIMIZE")]
    #[case("if model.status == COPT.OPTIMAL:", "if model.status == GRB.OPTIMAL:")]
    #[case("print(model.objval)", "print(model.ObjVal)")]
    #[case("cp.quicksum(x[i] for i in I)", "gp.quicksum(x[i] for i in I)")]
    fn code_rule_rewrites(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(RuleTable::default().apply_code(input), expected);
    }

    #[rstest]
    #[case("solved using `coptpy` here", "solved using `gurobipy` here")]
    #[case("# Create a COPT environment", "# Create a Gurobi environment")]
    #[case("# create a COPT model", "# create a Gurobi model")]
    #[case("# Create COPT model", "# Create Gurobi model")]
    #[case("Creates a COPT model", "Creates a Gurobi model")]
    #[case("Run `pip install coptpy` first", "Run `pip install gurobipy` first")]
    #[case("you have installed coptpy", "you have installed gurobipy")]
    #[case("solvers such as CPLEX or Gurobi", "solvers such as optimization solvers")]
    #[case("Imports the `coptpy` library", "Imports the `gurobipy` library")]
    #[case("Import the necessary COPTPY libraries", "Import the necessary Gurobipy libraries")]
    #[case("we import COPTPY", "we import Gurobipy")]
    fn text_rule_rewrites(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(RuleTable::default().apply_text(input), expected);
    }

    #[test]
    fn text_rules_leave_code_tokens_alone() {
        let code = "import coptpy as cp\nx = COPT.INTEGER\n";
        assert_eq!(RuleTable::default().apply_text(code), code);
    }

    #[test]
    fn substitution_is_case_sensitive() {
        let table = RuleTable::default();
        assert_eq!(table.apply_code("print(model.ObjVal)"), "print(model.ObjVal)");
        assert_eq!(table.apply_code("copt.integer"), "copt.integer");
    }

    #[test]
    fn replacement_is_literal() {
        let table = RuleTable::from_specs([RuleSpec {
            scope: Scope::Text,
            pattern: "(price)".into(),
            replacement: "$1 in $USD".into(),
        }])
        .unwrap();
        assert_eq!(table.apply_text("the price"), "the $1 in $USD");
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = Rule::new(RuleSpec {
            scope: Scope::Code,
            pattern: "cp\\.Envr(".into(),
            replacement: "gp.Env(".into(),
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidRule { .. }));
    }

    #[test]
    fn application_is_deterministic() {
        let table = RuleTable::default();
        let input = "import coptpy as cp\n# Create a COPT model\nmodel.objval";
        let first = table.apply_text(&table.apply_code(input));
        let second = table.apply_text(&table.apply_code(input));
        assert_eq!(first, second);
    }
}
