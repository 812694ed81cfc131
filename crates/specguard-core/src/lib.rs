//! Specguard Core - structural contract verification for OpenAPI documents
//!
//! Specguard asserts that a specification document honors a declared
//! API contract (required endpoints exist, required schemas carry
//! required fields, cross-references point at the correct targets)
//! before any server implementation exists. Spec drift becomes a
//! build-time gate instead of a runtime failure.
//!
//! # Architecture
//!
//! ```text
//! Raw JSON → Document Model → arena of nodes + pointer index
//!                  ↓
//!            Reference Resolver → resolved | dangling | cyclic
//!                  ↓
//!            Rule Engine → per-rule pass / Violation
//!                  ↓
//!            Report → ordered violations + pass/fail verdict
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic**: same document and rule list always produce an
//!   identical report
//! - **Complete**: every rule is evaluated; the engine never stops at
//!   the first violation
//! - **Total**: absent data is a reportable finding, never a panic
//! - **Bounded**: alias-chain resolution terminates on any input,
//!   cycles included
//!
//! The core is pure: no I/O, no shared mutable state. Reading document
//! bytes and rendering reports belong to the invoking collaborator.

pub mod document;
pub mod error;
pub mod pointer;
pub mod report;
pub mod resolver;
pub mod rules;

pub use document::{Document, Node, NodeId, NodeValue, Path, Segment};
pub use error::{Error, Result};
pub use report::{Report, Verdict, Violation, ViolationKind};
pub use resolver::{Reference, ReferenceSet, Resolution};
pub use rules::{Assertion, ComponentCategory, Rule};

/// Run the full verification pipeline over a loaded document.
///
/// Resolves every reference, evaluates every rule in declaration
/// order, and aggregates the findings into one report.
pub fn verify(document: &Document, rules: &[Rule]) -> Report {
    let references = resolver::resolve_all(document);
    rules::evaluate(document, &references, rules)
}
