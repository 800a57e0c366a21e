//! # Core Type Definitions
//!
//! This module contains all core types shared by the PSS engine:
//! - Identifiers and property values (`Identity`, `PropertyValue`, `PropertyMap`)
//! - Raw input records as materialized by the graph-query layer
//!   (`RawNode`, `RawRelationship`, `RawReaction`, `RawReactionPattern`, `ForeignLink`)
//! - Output records handed to the downstream loader (`OutputNode`, `OutputEdge`)
//! - Error types (`PssError`)
//!
//! ## Determinism Guarantees
//!
//! Property maps are `BTreeMap`s so every emitted record serializes with a
//! stable key order.

use crate::diagnostics::DiagnosticKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

// =============================================================================
// IDENTITY
// =============================================================================

/// Stable external identifier of an entity (e.g. `chebi:15377`, `pss:ABA`).
///
/// Identities connect nodes and edges that reference the same entity by name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identity(pub String);

impl Identity {
    /// Create a new identity.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Build an identity from a namespace prefix and a local key.
    #[must_use]
    pub fn prefixed(prefix: &str, key: &str) -> Self {
        Self(format!("{prefix}:{key}"))
    }

    /// Get the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

/// A single property value.
///
/// Values are primitive or a list of strings, which is everything the graph
/// store hands us and everything the loader accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
}

impl PropertyValue {
    /// Get the value as a string slice, if it is a string.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as a list of strings, if it is a list.
    #[must_use]
    pub fn as_str_list(&self) -> Option<&[String]> {
        match self {
            Self::StrList(list) => Some(list),
            _ => None,
        }
    }

    /// Render scalar values as text. Lists yield `None`.
    ///
    /// Graph exports are not consistent about numeric vs string keys
    /// (`reaction_id`, `functional_cluster_id`), so key lookups go through here.
    #[must_use]
    pub fn to_key_string(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Int(i) => Some(i.to_string()),
            Self::Bool(b) => Some(b.to_string()),
            Self::Float(f) => Some(f.to_string()),
            Self::StrList(_) => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(list: Vec<String>) -> Self {
        Self::StrList(list)
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Property mapping with unique keys and deterministic ordering.
pub type PropertyMap = BTreeMap<String, PropertyValue>;

// =============================================================================
// RAW INPUT RECORDS
// =============================================================================

/// A labeled node as materialized by the graph-query layer.
///
/// Used both for node records and for relationship endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawNode {
    /// Label set of the node (e.g. `["Metabolite"]`).
    #[serde(default)]
    pub labels: Vec<String>,
    /// Raw node properties.
    #[serde(default)]
    pub properties: PropertyMap,
}

impl RawNode {
    /// Create a node with the given labels and no properties.
    #[must_use]
    pub fn new<L: Into<String>>(labels: impl IntoIterator<Item = L>) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            properties: PropertyMap::new(),
        }
    }

    /// Builder-style property setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// Check whether the node carries a label.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }

    /// Get a string property.
    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(PropertyValue::as_str)
    }

    /// Get a list-of-strings property. Absent keys yield an empty slice.
    #[must_use]
    pub fn str_list(&self, key: &str) -> &[String] {
        self.properties
            .get(key)
            .and_then(PropertyValue::as_str_list)
            .unwrap_or(&[])
    }

    /// The natural name of the node, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get_str("name")
    }

    /// Get a required string property.
    ///
    /// Returns `PssError::MissingAttribute` if absent and
    /// `PssError::InvalidAttribute` if present but not a string.
    pub fn require_str(&self, key: &str) -> Result<&str, PssError> {
        match self.properties.get(key) {
            Some(PropertyValue::Str(s)) => Ok(s),
            Some(_) => Err(PssError::InvalidAttribute {
                record: self.describe(),
                attribute: key.to_string(),
                expected: "string",
            }),
            None => Err(PssError::MissingAttribute {
                record: self.describe(),
                attribute: key.to_string(),
            }),
        }
    }

    /// Get a required scalar property rendered as text (string or number).
    pub fn require_key(&self, key: &str) -> Result<String, PssError> {
        match self.properties.get(key) {
            Some(value) => value.to_key_string().ok_or_else(|| PssError::InvalidAttribute {
                record: self.describe(),
                attribute: key.to_string(),
                expected: "scalar",
            }),
            None => Err(PssError::MissingAttribute {
                record: self.describe(),
                attribute: key.to_string(),
            }),
        }
    }

    /// Short human-readable description used in diagnostics.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.name() {
            Some(name) => format!("node '{}' [{}]", name, self.labels.join(",")),
            None => format!("node [{}]", self.labels.join(",")),
        }
    }
}

/// A typed relationship attached to a reaction node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRelationship {
    /// Relationship type label (e.g. `SUBSTRATE`, `INHIBITS`).
    pub edge_type: String,
    /// Edge-local attributes (`source_form`, `target_location`, ...).
    #[serde(default)]
    pub attributes: PropertyMap,
    /// Node the relationship starts at.
    pub start_node: RawNode,
    /// Node the relationship ends at.
    pub end_node: RawNode,
}

impl RawRelationship {
    /// Create a relationship with no attributes.
    #[must_use]
    pub fn new(edge_type: impl Into<String>, start_node: RawNode, end_node: RawNode) -> Self {
        Self {
            edge_type: edge_type.into(),
            attributes: PropertyMap::new(),
            start_node,
            end_node,
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.attributes.insert(key.to_string(), value.into());
        self
    }

    /// Get a string attribute.
    #[must_use]
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).and_then(PropertyValue::as_str)
    }
}

/// The central reaction record of a pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReaction {
    /// Reaction identifier as stored in the graph, numeric or text.
    #[serde(deserialize_with = "key_string")]
    pub reaction_id: String,
    /// Reaction category label (e.g. `catalysis`).
    pub reaction_type: String,
    /// `key:value` cross references, e.g. `doi:10.1000/xyz`.
    #[serde(default)]
    pub external_links: Option<Vec<String>>,
}

impl RawReaction {
    /// Create a reaction record without external links.
    #[must_use]
    pub fn new(reaction_id: impl Into<String>, reaction_type: impl Into<String>) -> Self {
        Self {
            reaction_id: reaction_id.into(),
            reaction_type: reaction_type.into(),
            external_links: None,
        }
    }
}

/// Read a scalar key, string or number, as text.
fn key_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    PropertyValue::deserialize(deserializer)?
        .to_key_string()
        .ok_or_else(|| serde::de::Error::custom("expected a string or number key"))
}

/// One reaction node plus all of its directly attached relationships.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReactionPattern {
    pub reaction: RawReaction,
    #[serde(default)]
    pub relationships: Vec<RawRelationship>,
}

impl RawReactionPattern {
    /// Create a pattern.
    #[must_use]
    pub fn new(reaction: RawReaction, relationships: Vec<RawRelationship>) -> Self {
        Self {
            reaction,
            relationships,
        }
    }
}

/// A foreign coding gene linked to the foreign entity it is an agent of.
///
/// Both ends are natural names, resolved through the identity table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignLink {
    pub source: String,
    pub target: String,
}

// =============================================================================
// OUTPUT RECORDS
// =============================================================================

/// A typed node produced by node classification or pathway aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputNode {
    pub id: Identity,
    pub node_type: String,
    pub properties: PropertyMap,
}

impl OutputNode {
    /// Create a node.
    #[must_use]
    pub fn new(id: Identity, node_type: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            id,
            node_type: node_type.into(),
            properties,
        }
    }
}

/// A typed directed edge.
///
/// `id` is never assigned by the engine; the loader assigns one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputEdge {
    pub id: Option<String>,
    pub source: Identity,
    pub target: Identity,
    pub edge_type: String,
    pub properties: PropertyMap,
}

impl OutputEdge {
    /// Create an edge without an explicit identifier.
    #[must_use]
    pub fn new(
        source: Identity,
        target: Identity,
        edge_type: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            id: None,
            source,
            target,
            edge_type: edge_type.into(),
            properties,
        }
    }

    /// Create a property-less incidental edge.
    #[must_use]
    pub fn incidental(source: Identity, target: Identity, edge_type: impl Into<String>) -> Self {
        Self::new(source, target, edge_type, PropertyMap::new())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while transforming graph records.
///
/// - No silent failures: every variant is reported on the diagnostic stream
/// - Record-level variants are recoverable; the run always continues
#[derive(Debug, Error)]
pub enum PssError {
    /// A reaction participant's name is absent from the identity table.
    #[error("participant '{name}' of reaction {reaction_id} not in identity table")]
    UnresolvedParticipant { name: String, reaction_id: String },

    /// A name lookup missed the identity table.
    #[error("no identity registered for '{0}'")]
    UnresolvedIdentity(String),

    /// One end of a foreign gene link is absent from the identity table.
    #[error("gene_of link '{gene}' -> '{entity}': no identity registered for '{missing}'")]
    UnresolvedLink {
        gene: String,
        entity: String,
        missing: String,
    },

    /// A node's label set matches no classification rule.
    #[error("unclassifiable node with labels [{}]", .labels.join(","))]
    UnclassifiableNode { labels: Vec<String> },

    /// A functional cluster lists a gene that has no annotation row.
    #[error("gene '{gene}' of functional cluster {cluster} has no annotation")]
    MissingAnnotation { gene: String, cluster: String },

    /// A record lacks an attribute required by the active rule.
    #[error("{record}: missing attribute '{attribute}'")]
    MissingAttribute { record: String, attribute: String },

    /// A record carries an attribute of the wrong type.
    #[error("{record}: attribute '{attribute}' is not a {expected}")]
    InvalidAttribute {
        record: String,
        attribute: String,
        expected: &'static str,
    },

    /// A name was classified twice with different identities.
    #[error("'{name}' already registered as {existing}, refusing {attempted}")]
    IdentityConflict {
        name: String,
        existing: Identity,
        attempted: Identity,
    },

    /// The edge pass was requested before the node pass was drained.
    #[error("node pass not exhausted; reactions need the complete identity table")]
    NodePassIncomplete,

    /// Run configuration is incomplete or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// An input could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl PssError {
    /// Classify the error for the diagnostic stream.
    #[must_use]
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::UnresolvedParticipant { .. }
            | Self::UnresolvedIdentity(_)
            | Self::UnresolvedLink { .. }
            | Self::UnclassifiableNode { .. }
            | Self::MissingAnnotation { .. } => DiagnosticKind::UnresolvedReference,
            Self::MissingAttribute { .. }
            | Self::InvalidAttribute { .. }
            | Self::IdentityConflict { .. }
            | Self::Parse(_) => DiagnosticKind::MalformedRecord,
            Self::NodePassIncomplete | Self::InvalidConfig(_) | Self::Io(_) => {
                DiagnosticKind::Fatal
            }
        }
    }
}

impl From<std::io::Error> for PssError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_prefixed() {
        let id = Identity::prefixed("pss", "ABA");
        assert_eq!(id.as_str(), "pss:ABA");
        assert_eq!(id.to_string(), "pss:ABA");
    }

    #[test]
    fn property_value_untagged_json() {
        let props: PropertyMap = serde_json::from_str(
            r#"{"name":"ABA","rank":3,"all_pathways":["ABA signalling"],"flag":true}"#,
        )
        .expect("parse");

        assert_eq!(props["name"], PropertyValue::from("ABA"));
        assert_eq!(props["rank"], PropertyValue::Int(3));
        assert_eq!(props["flag"], PropertyValue::Bool(true));
        assert_eq!(
            props["all_pathways"].as_str_list(),
            Some(&["ABA signalling".to_string()][..])
        );
    }

    #[test]
    fn require_str_distinguishes_missing_and_invalid() {
        let node = RawNode::new(["Metabolite"]).with("name", "ABA").with("rank", 3i64);

        assert_eq!(node.require_str("name").expect("name"), "ABA");
        assert!(matches!(
            node.require_str("description"),
            Err(PssError::MissingAttribute { .. })
        ));
        assert!(matches!(
            node.require_str("rank"),
            Err(PssError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn require_key_accepts_numbers() {
        let node = RawNode::new(["FunctionalCluster"]).with("functional_cluster_id", 42i64);
        assert_eq!(node.require_key("functional_cluster_id").expect("key"), "42");
    }

    #[test]
    fn reaction_id_accepts_numbers_and_text() {
        let numeric: RawReaction =
            serde_json::from_str(r#"{"reaction_id":101,"reaction_type":"catalysis"}"#)
                .expect("numeric id");
        assert_eq!(numeric.reaction_id, "101");

        let text: RawReaction =
            serde_json::from_str(r#"{"reaction_id":"r-7","reaction_type":"catalysis"}"#)
                .expect("text id");
        assert_eq!(text.reaction_id, "r-7");

        let list = serde_json::from_str::<RawReaction>(
            r#"{"reaction_id":["a"],"reaction_type":"catalysis"}"#,
        );
        assert!(list.is_err());
    }

    #[test]
    fn str_list_defaults_to_empty() {
        let node = RawNode::new(["Complex"]);
        assert!(node.str_list("all_pathways").is_empty());
    }

    #[test]
    fn error_kinds() {
        let unresolved = PssError::UnresolvedParticipant {
            name: "X".to_string(),
            reaction_id: "r1".to_string(),
        };
        assert_eq!(unresolved.kind(), DiagnosticKind::UnresolvedReference);

        let malformed = PssError::MissingAttribute {
            record: "r1".to_string(),
            attribute: "source_form".to_string(),
        };
        assert_eq!(malformed.kind(), DiagnosticKind::MalformedRecord);
        assert!(malformed.to_string().contains("source_form"));
    }

    #[test]
    fn output_edge_has_no_identifier() {
        let edge = OutputEdge::incidental(
            Identity::new("tair:AT1G01010"),
            Identity::new("skm:FC1"),
            "functional_cluster_member",
        );
        assert!(edge.id.is_none());
        assert!(edge.properties.is_empty());
    }
}
