//! Reference Resolver — resolves pointer aliases over the document index
//!
//! Walks every mapping node carrying a `$ref` key with a string value
//! (the document's convention for "this node is an alias for another
//! location") and resolves the authored pointer against the document
//! index. Each occurrence yields one `Reference` with one of three
//! outcomes: resolved, dangling, or cyclic.
//!
//! Resolution never fails the run: unhealthy references become report
//! violations, and cycle detection terminates in time proportional to
//! the chain length via a visited set keyed by canonical pointer.

use std::collections::BTreeSet;

use crate::document::{Document, NodeId, Path};
use crate::pointer;
use crate::report::{Violation, ViolationKind};

/// Mapping key marking a node as an alias for another location
pub const REF_KEY: &str = "$ref";

/// Rule id under which dangling-reference findings are reported
pub const DANGLING_RULE_ID: &str = "references.dangling";
/// Rule id under which cyclic-reference findings are reported
pub const CYCLIC_RULE_ID: &str = "references.cyclic";

/// Outcome of resolving one reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Target node found; the transitive alias chain is acyclic
    Resolved(NodeId),
    /// No node at the authored pointer, or not an in-document pointer
    Dangling,
    /// The transitive alias chain revisits a pointer already on it;
    /// the chain starts at the reference's own source
    Cyclic { chain: Vec<String> },
}

/// A directed edge from a `$ref`-holding node to its designated target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub source: NodeId,
    pub source_path: Path,
    /// Raw pointer expression as authored
    pub target_pointer: String,
    pub resolution: Resolution,
}

impl Reference {
    pub fn is_resolved(&self) -> bool {
        matches!(self.resolution, Resolution::Resolved(_))
    }
}

/// All references discovered in a document, in document order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReferenceSet {
    references: Vec<Reference>,
}

impl ReferenceSet {
    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.references.iter()
    }

    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    /// Reference whose source node sits at the given canonical pointer
    pub fn at_source(&self, pointer_expr: &str) -> Option<&Reference> {
        let canonical = pointer::canonicalize(pointer_expr)?;
        self.references
            .iter()
            .find(|r| r.source_path.pointer() == canonical)
    }

    /// Reference-health findings: one violation per unhealthy reference,
    /// in document order
    pub fn violations(&self) -> Vec<Violation> {
        let mut violations = Vec::new();
        for reference in &self.references {
            match &reference.resolution {
                Resolution::Resolved(_) => {}
                Resolution::Dangling => violations.push(Violation {
                    rule_id: DANGLING_RULE_ID.to_string(),
                    kind: ViolationKind::DanglingReference,
                    path: reference.source_path.to_string(),
                    message: format!(
                        "'$ref' points at '{}', which designates no node in this document",
                        reference.target_pointer
                    ),
                }),
                Resolution::Cyclic { chain } => violations.push(Violation {
                    rule_id: CYCLIC_RULE_ID.to_string(),
                    kind: ViolationKind::CyclicReference,
                    path: reference.source_path.to_string(),
                    message: format!("'$ref' chain is cyclic: {}", chain.join(" -> ")),
                }),
            }
        }
        violations
    }
}

/// Resolve every pointer expression in the document.
///
/// Walks the arena in document order (parents before children), so the
/// resulting set is deterministic for a given document.
pub fn resolve_all(document: &Document) -> ReferenceSet {
    let mut references = Vec::new();
    for (id, node) in document.iter() {
        let Some(ref_node) = node.value.key(REF_KEY) else {
            continue;
        };
        let Some(target_pointer) = document.node(ref_node).value.as_str() else {
            // A non-string `$ref` value is not a recognized pointer
            // expression; it is plain data, not an alias.
            continue;
        };
        references.push(resolve_one(document, id, target_pointer));
    }
    ReferenceSet { references }
}

fn resolve_one(document: &Document, source: NodeId, target_pointer: &str) -> Reference {
    let source_path = document.node(source).path.clone();

    let reference = |resolution| Reference {
        source,
        source_path: source_path.clone(),
        target_pointer: target_pointer.to_string(),
        resolution,
    };

    // Direct target first: a pointer that does not canonicalize, or has
    // no node behind it, dangles regardless of anything downstream.
    let Some(direct) = pointer::canonicalize(target_pointer) else {
        return reference(Resolution::Dangling);
    };
    let Some(target) = document.lookup(&direct) else {
        return reference(Resolution::Dangling);
    };

    // Transitive chain: follow aliases-of-aliases until a terminal node,
    // recording every pointer visited on this resolution path. A repeat
    // (including the source itself) is a cycle; a broken downstream hop
    // is that reference's own finding, not this one's.
    let mut visited = BTreeSet::new();
    let mut chain = vec![source_path.pointer()];
    visited.insert(source_path.pointer());

    let mut current_pointer = direct;
    let mut current = target;
    loop {
        if !visited.insert(current_pointer.clone()) {
            chain.push(current_pointer);
            return reference(Resolution::Cyclic { chain });
        }
        chain.push(current_pointer);

        let node = document.node(current);
        let Some(next_node) = node.value.key(REF_KEY) else {
            break;
        };
        let Some(next_pointer) = document.node(next_node).value.as_str() else {
            break;
        };
        let Some(next_canonical) = pointer::canonicalize(next_pointer) else {
            break;
        };
        let Some(next) = document.lookup(&next_canonical) else {
            break;
        };
        current_pointer = next_canonical;
        current = next;
    }

    reference(Resolution::Resolved(target))
}
