//! Report — aggregated verification outcome
//!
//! A verification run produces one `Report`: the ordered violation list
//! plus the count of rules evaluated. The verdict is binary (pass iff
//! the list is empty) with no severity tiering; every violation fails
//! the gate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of structural finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    PathMissing,
    PropertyMissing,
    ComponentMissing,
    ReferenceMismatch,
    DanglingReference,
    CyclicReference,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            ViolationKind::PathMissing => "path_missing",
            ViolationKind::PropertyMissing => "property_missing",
            ViolationKind::ComponentMissing => "component_missing",
            ViolationKind::ReferenceMismatch => "reference_mismatch",
            ViolationKind::DanglingReference => "dangling_reference",
            ViolationKind::CyclicReference => "cyclic_reference",
        };
        write!(f, "{}", name)
    }
}

/// One failed structural assertion
///
/// Immutable value record carrying enough context (path, expected vs.
/// actual) to diagnose the finding without re-running verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub rule_id: String,
    pub kind: ViolationKind,
    /// Path of the offending node, or the expected-but-absent path
    pub path: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.rule_id, self.kind, self.path, self.message
        )
    }
}

/// Binary outcome of a verification run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
        }
    }
}

/// Ordered violation sequence plus the total rule count evaluated
///
/// Constructed once per verification run and discarded after the
/// invoker consumes it. Two runs over the same document and rule list
/// yield equal reports; there is no hidden state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    violations: Vec<Violation>,
    rules_evaluated: usize,
}

impl Report {
    pub fn verdict(&self) -> Verdict {
        if self.violations.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn rules_evaluated(&self) -> usize {
        self.rules_evaluated
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for violation in &self.violations {
            writeln!(f, "{}", violation)?;
        }
        write!(
            f,
            "{}: {} rules evaluated, {} violations",
            self.verdict(),
            self.rules_evaluated,
            self.violations.len()
        )
    }
}

/// Concatenate violations in the order given and derive the verdict.
///
/// Ordering is rule-declaration order for rule findings, then document
/// order for reference-health findings; it affects only how the report
/// reads, never the verdict.
pub fn aggregate(
    rules_evaluated: usize,
    violations: impl IntoIterator<Item = Violation>,
) -> Report {
    Report {
        violations: violations.into_iter().collect(),
        rules_evaluated,
    }
}
