//! Document Model — a specification document as an addressable node tree
//!
//! `Document::load` parses a JSON specification document into an arena
//! of nodes. Every node carries its canonical path from the root, and
//! the document indexes every pointer-addressable location by canonical
//! pointer string, so aliasing references are plain arena indices with
//! no ownership entanglement.
//!
//! # Guarantees
//!
//! - **Immutable**: the document never changes after `load`; all
//!   downstream consumers share it read-only
//! - **Unique paths**: no two nodes share a canonical path or pointer
//! - **Total lookups**: `get` and `at` return `None` for absent
//!   locations; absence is a queryable state, not an error

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::pointer;

/// Index of a node in the document arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId(usize);

/// One step in a canonical path: a mapping key or a sequence index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Segment::Key(key) => write!(f, "{}", key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Canonical path of a node: the ordered key sequence from the root
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Canonical pointer string designating this path
    pub fn pointer(&self) -> String {
        let keys: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        pointer::encode(&keys)
    }

    fn child_key(&self, key: &str) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Key(key.to_string()));
        Path { segments }
    }

    fn child_index(&self, index: usize) -> Path {
        let mut segments = self.segments.clone();
        segments.push(Segment::Index(index));
        Path { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.segments.is_empty() {
            return write!(f, "(root)");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// A node's value: tagged union over the document tree shapes
#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    /// Mapping from key to child node, keys in deterministic order
    Mapping(Vec<(String, NodeId)>),
    /// Ordered sequence of child nodes
    Sequence(Vec<NodeId>),
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    Null,
}

impl NodeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(String, NodeId)]> {
        match self {
            NodeValue::Mapping(entries) => Some(entries),
            _ => None,
        }
    }

    /// Child under `key`, when this node is a mapping holding it
    pub fn key(&self, key: &str) -> Option<NodeId> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, id)| *id)
    }

    /// Shape name for diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            NodeValue::Mapping(_) => "mapping",
            NodeValue::Sequence(_) => "sequence",
            NodeValue::String(_) => "string",
            NodeValue::Number(_) => "number",
            NodeValue::Bool(_) => "boolean",
            NodeValue::Null => "null",
        }
    }
}

/// A position in the document tree
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub path: Path,
    pub value: NodeValue,
}

/// A loaded specification document: node arena plus pointer index
///
/// Created once at load time, immutable thereafter. References between
/// locations are represented as `NodeId` arena indices, never nested
/// owning structures, so shared targets and cycles are representable
/// without ownership issues.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    index: BTreeMap<String, NodeId>,
}

impl Document {
    /// Load a specification document from its serialized text.
    ///
    /// # Errors
    /// Returns `MalformedDocument` when the input is not valid JSON or
    /// the root is not an object. Loading is pure: no I/O, no side
    /// effects.
    pub fn load(raw: &str) -> Result<Document> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| Error::MalformedDocument(e.to_string()))?;
        if !value.is_object() {
            return Err(Error::MalformedDocument(format!(
                "expected an object at the document root, found {}",
                json_kind(&value)
            )));
        }

        let mut document = Document {
            nodes: Vec::new(),
            index: BTreeMap::new(),
        };
        document.build(&value, Path::default());
        Ok(document)
    }

    /// Exact lookup by canonical pointer string.
    ///
    /// The argument is canonicalized before lookup, so only genuine
    /// in-document pointer expressions resolve. Returns `None` for
    /// absent locations and for expressions that are not in-document
    /// pointers.
    pub fn get(&self, pointer_expr: &str) -> Option<&Node> {
        self.lookup(pointer_expr).map(|id| self.node(id))
    }

    /// Arena id of the node a pointer expression designates, if any
    pub fn lookup(&self, pointer_expr: &str) -> Option<NodeId> {
        let canonical = pointer::canonicalize(pointer_expr)?;
        self.index.get(&canonical).copied()
    }

    /// Structural lookup by path segments from the root.
    ///
    /// Mapping children are addressed by key, sequence elements by
    /// decimal index. Returns `None` as soon as a step is absent.
    pub fn at(&self, segments: &[&str]) -> Option<&Node> {
        let mut current = self.root();
        for segment in segments {
            let node = self.node(current);
            current = match &node.value {
                NodeValue::Mapping(_) => node.value.key(segment)?,
                NodeValue::Sequence(items) => {
                    let index: usize = segment.parse().ok()?;
                    *items.get(index)?
                }
                _ => return None,
            };
        }
        Some(self.node(current))
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes in the document
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in document order (parents before children)
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    /// SHA-256 hex digest of the canonical serialization.
    ///
    /// Mapping keys are sorted and scalars formatted deterministically,
    /// so two documents with equal content hash equally regardless of
    /// key order in the source text.
    pub fn fingerprint(&self) -> String {
        let mut canonical = String::new();
        self.write_canonical(self.root(), &mut canonical);
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn build(&mut self, value: &Value, path: Path) -> NodeId {
        // Reserve the slot first so ids are assigned parents-first.
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            path: Path::default(),
            value: NodeValue::Null,
        });

        let node_value = match value {
            Value::Object(map) => {
                let mut entries = Vec::with_capacity(map.len());
                for (key, child) in map {
                    let child_id = self.build(child, path.child_key(key));
                    entries.push((key.clone(), child_id));
                }
                NodeValue::Mapping(entries)
            }
            Value::Array(items) => {
                let mut children = Vec::with_capacity(items.len());
                for (index, child) in items.iter().enumerate() {
                    children.push(self.build(child, path.child_index(index)));
                }
                NodeValue::Sequence(children)
            }
            Value::String(s) => NodeValue::String(s.clone()),
            Value::Number(n) => NodeValue::Number(n.clone()),
            Value::Bool(b) => NodeValue::Bool(*b),
            Value::Null => NodeValue::Null,
        };

        self.index.insert(path.pointer(), id);
        self.nodes[id.0] = Node {
            path,
            value: node_value,
        };
        id
    }

    fn write_canonical(&self, id: NodeId, out: &mut String) {
        match &self.node(id).value {
            NodeValue::Mapping(entries) => {
                let mut sorted: Vec<&(String, NodeId)> = entries.iter().collect();
                sorted.sort_by(|a, b| a.0.cmp(&b.0));
                out.push('{');
                for (i, (key, child)) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    write_json_string(key, out);
                    out.push(':');
                    self.write_canonical(*child, out);
                }
                out.push('}');
            }
            NodeValue::Sequence(items) => {
                out.push('[');
                for (i, child) in items.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    self.write_canonical(*child, out);
                }
                out.push(']');
            }
            NodeValue::String(s) => write_json_string(s, out),
            NodeValue::Number(n) => out.push_str(&n.to_string()),
            NodeValue::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
            NodeValue::Null => out.push_str("null"),
        }
    }
}

fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                out.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => out.push(ch),
        }
    }
    out.push('"');
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r##"{
        "openapi": "3.0.3",
        "paths": {
            "/analysis/run": { "post": { "summary": "Run analysis" } }
        },
        "components": {
            "schemas": {
                "Scope": { "type": "object" },
                "AnalysisRunRequest": {
                    "properties": {
                        "scope": { "$ref": "#/components/schemas/Scope" }
                    }
                }
            }
        },
        "tags": ["analysis", "reporting"]
    }"##;

    #[test]
    fn test_load_valid_document() {
        let document = Document::load(SPEC).expect("fixture should load");
        assert!(!document.is_empty());
        assert!(document.len() > 10, "every tree position becomes a node");
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        let err = Document::load("{ not json").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument(_)));
    }

    #[test]
    fn test_load_rejects_non_object_root() {
        let err = Document::load("[1, 2, 3]").unwrap_err();
        let Error::MalformedDocument(message) = err else {
            panic!("expected MalformedDocument");
        };
        assert!(message.contains("array"), "message names the found shape");
    }

    #[test]
    fn test_get_by_canonical_pointer() {
        let document = Document::load(SPEC).unwrap();
        let node = document
            .get("#/components/schemas/Scope")
            .expect("Scope exists");
        assert_eq!(node.path.to_string(), "components.schemas.Scope");
    }

    #[test]
    fn test_get_with_escaped_key() {
        let document = Document::load(SPEC).unwrap();
        let node = document
            .get("#/paths/~1analysis~1run")
            .expect("escaped path key resolves");
        assert!(matches!(node.value, NodeValue::Mapping(_)));
    }

    #[test]
    fn test_get_absent_is_none_not_error() {
        let document = Document::load(SPEC).unwrap();
        assert!(document.get("#/components/schemas/Missing").is_none());
        assert!(document.get("not-a-pointer").is_none());
    }

    #[test]
    fn test_at_structural_lookup() {
        let document = Document::load(SPEC).unwrap();
        let node = document
            .at(&["paths", "/analysis/run", "post", "summary"])
            .expect("nested key exists");
        assert_eq!(node.value.as_str(), Some("Run analysis"));
    }

    #[test]
    fn test_at_indexes_sequences() {
        let document = Document::load(SPEC).unwrap();
        let node = document.at(&["tags", "1"]).expect("second tag exists");
        assert_eq!(node.value.as_str(), Some("reporting"));
        assert!(document.at(&["tags", "7"]).is_none());
    }

    #[test]
    fn test_at_absent_key_is_none() {
        let document = Document::load(SPEC).unwrap();
        assert!(document.at(&["paths", "/analysis/save"]).is_none());
        // Descending into a scalar is absence, not a panic.
        assert!(document.at(&["openapi", "anything"]).is_none());
    }

    #[test]
    fn test_every_node_has_unique_pointer() {
        let document = Document::load(SPEC).unwrap();
        let pointers: std::collections::BTreeSet<String> =
            document.iter().map(|(_, n)| n.path.pointer()).collect();
        assert_eq!(pointers.len(), document.len());
    }

    #[test]
    fn test_sequence_paths_carry_indices() {
        let document = Document::load(SPEC).unwrap();
        let node = document.at(&["tags", "0"]).unwrap();
        assert_eq!(node.path.to_string(), "tags.0");
        assert_eq!(node.path.pointer(), "#/tags/0");
    }

    #[test]
    fn test_fingerprint_ignores_key_order() {
        let a = Document::load(r#"{"a": 1, "b": {"c": true, "d": null}}"#).unwrap();
        let b = Document::load(r#"{"b": {"d": null, "c": true}, "a": 1}"#).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_detects_content_change() {
        let a = Document::load(r#"{"a": 1}"#).unwrap();
        let b = Document::load(r#"{"a": 2}"#).unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 64, "SHA-256 hex digest");
    }
}
