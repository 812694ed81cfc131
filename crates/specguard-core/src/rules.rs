//! Rule Engine — declarative structural assertions over a document
//!
//! The rule catalog is data, not control flow: each rule pairs an id
//! with one of four parameterized assertion kinds, and catalogs
//! deserialize from JSON supplied by the invoker. Every check is a
//! total function (absent data is a violation, never a panic) and
//! the engine never aborts early, so one run surfaces every contract
//! gap at once.
//!
//! Rules are stateless and mutually independent: evaluation order
//! affects report ordering only, never the verdict.

use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::pointer;
use crate::report::{self, Report, Violation, ViolationKind};
use crate::resolver::{ReferenceSet, REF_KEY};

/// Component categories addressable by `ComponentExists`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ComponentCategory {
    Schemas,
    Responses,
    Parameters,
    RequestBodies,
    Headers,
    SecuritySchemes,
}

impl ComponentCategory {
    /// Key of the category's collection under `components`
    pub fn section(&self) -> &'static str {
        match self {
            ComponentCategory::Schemas => "schemas",
            ComponentCategory::Responses => "responses",
            ComponentCategory::Parameters => "parameters",
            ComponentCategory::RequestBodies => "requestBodies",
            ComponentCategory::Headers => "headers",
            ComponentCategory::SecuritySchemes => "securitySchemes",
        }
    }
}

/// One parameterized structural assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "assert", rename_all = "kebab-case")]
pub enum Assertion {
    /// An endpoint key is present under the `paths` collection
    PathExists { path: String },
    /// A field is present under a schema's `properties` collection
    PropertyExists { schema: String, property: String },
    /// The `$ref` at a schema property equals the expected pointer
    /// exactly, by canonical pointer string, never by target content
    ReferenceEquals {
        schema: String,
        property: String,
        expected: String,
    },
    /// A named component is present under its category collection
    ComponentExists {
        category: ComponentCategory,
        name: String,
    },
}

/// A named, declarative assertion over the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub assertion: Assertion,
}

/// Parse a rule catalog from its serialized text (a JSON rule array).
///
/// # Errors
/// Returns `MalformedCatalog` when the input is not a valid rule list;
/// the catalog is external configuration and can be garbage the same
/// way the document can.
pub fn parse_catalog(raw: &str) -> Result<Vec<Rule>> {
    serde_json::from_str(raw).map_err(|e| Error::MalformedCatalog(e.to_string()))
}

/// Evaluate every rule in declaration order, then append the
/// resolver's reference-health findings.
///
/// Never aborts on the first violation: all rules always run, so the
/// report shows every gap in one pass.
pub fn evaluate(document: &Document, references: &ReferenceSet, rules: &[Rule]) -> Report {
    let mut violations: Vec<Violation> = rules
        .iter()
        .filter_map(|rule| check(document, rule))
        .collect();
    violations.extend(references.violations());
    report::aggregate(rules.len(), violations)
}

fn check(document: &Document, rule: &Rule) -> Option<Violation> {
    match &rule.assertion {
        Assertion::PathExists { path } => check_path_exists(document, rule, path),
        Assertion::PropertyExists { schema, property } => {
            check_property_exists(document, rule, schema, property)
        }
        Assertion::ReferenceEquals {
            schema,
            property,
            expected,
        } => check_reference_equals(document, rule, schema, property, expected),
        Assertion::ComponentExists { category, name } => {
            check_component_exists(document, rule, *category, name)
        }
    }
}

fn check_path_exists(document: &Document, rule: &Rule, path: &str) -> Option<Violation> {
    if document.at(&["paths", path]).is_some() {
        return None;
    }
    Some(Violation {
        rule_id: rule.id.clone(),
        kind: ViolationKind::PathMissing,
        path: format!("paths.{}", path),
        message: format!("endpoint '{}' is not declared under 'paths'", path),
    })
}

fn check_property_exists(
    document: &Document,
    rule: &Rule,
    schema: &str,
    property: &str,
) -> Option<Violation> {
    if document
        .at(&["components", "schemas", schema, "properties", property])
        .is_some()
    {
        return None;
    }
    let message = if document.at(&["components", "schemas", schema]).is_none() {
        format!(
            "schema '{}' is not declared, so property '{}' cannot exist",
            schema, property
        )
    } else {
        format!("schema '{}' does not declare property '{}'", schema, property)
    };
    Some(Violation {
        rule_id: rule.id.clone(),
        kind: ViolationKind::PropertyMissing,
        path: format!("components.schemas.{}.properties.{}", schema, property),
        message,
    })
}

fn check_reference_equals(
    document: &Document,
    rule: &Rule,
    schema: &str,
    property: &str,
    expected: &str,
) -> Option<Violation> {
    let path = format!("components.schemas.{}.properties.{}", schema, property);
    let violation = |message| {
        Some(Violation {
            rule_id: rule.id.clone(),
            kind: ViolationKind::ReferenceMismatch,
            path: path.clone(),
            message,
        })
    };

    let Some(node) = document.at(&["components", "schemas", schema, "properties", property])
    else {
        return violation(format!(
            "expected '$ref' equal to '{}', but property '{}' is not declared on schema '{}'",
            expected, property, schema
        ));
    };
    let Some(actual) = node
        .value
        .key(REF_KEY)
        .and_then(|id| document.node(id).value.as_str())
    else {
        return violation(format!(
            "expected '$ref' equal to '{}', but the property declares no '$ref' ({} value)",
            expected,
            node.value.kind()
        ));
    };

    // Canonical-string comparison: equal-content-but-distinct schemas
    // never satisfy the rule, only the exact pointer does.
    let matches = match (pointer::canonicalize(actual), pointer::canonicalize(expected)) {
        (Some(a), Some(e)) => a == e,
        _ => actual == expected,
    };
    if matches {
        return None;
    }
    violation(format!("'$ref' is '{}', expected '{}'", actual, expected))
}

fn check_component_exists(
    document: &Document,
    rule: &Rule,
    category: ComponentCategory,
    name: &str,
) -> Option<Violation> {
    let section = category.section();
    if document.at(&["components", section, name]).is_some() {
        return None;
    }
    Some(Violation {
        rule_id: rule.id.clone(),
        kind: ViolationKind::ComponentMissing,
        path: format!("components.{}.{}", section, name),
        message: format!(
            "component '{}' is not declared under 'components.{}'",
            name, section
        ),
    })
}
