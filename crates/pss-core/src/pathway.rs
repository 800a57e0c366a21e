//! # Pathway Aggregator
//!
//! Collects pathway memberships discovered while classifying nodes and turns
//! them into pathway nodes plus `in_pathway` edges at the end of the node pass.
//!
//! Membership grows monotonically. Re-recording a member is idempotent, so
//! the number of `in_pathway` edges for a pathway equals the number of
//! distinct member names ever recorded under it.

use crate::identity::IdentityTable;
use crate::primitives::{IN_PATHWAY, PATHWAY_NODE_TYPE, PSS_PREFIX};
use crate::{Identity, OutputEdge, OutputNode, PropertyMap, PropertyValue, RawNode};
use std::collections::{BTreeMap, BTreeSet};

/// Node property listing the pathways a node belongs to.
pub const PATHWAYS_PROPERTY: &str = "all_pathways";

/// Pathway name -> member natural names.
#[derive(Debug, Clone, Default)]
pub struct PathwayMembership {
    pathways: BTreeMap<String, BTreeSet<String>>,
}

impl PathwayMembership {
    /// Create an empty membership table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one membership fact.
    pub fn record(&mut self, pathway: &str, member: &str) {
        self.pathways
            .entry(pathway.to_string())
            .or_default()
            .insert(member.to_string());
    }

    /// Record every pathway a raw node declares. Nodes without a name are skipped.
    ///
    /// Returns the number of pathways listed on the node.
    pub fn record_node(&mut self, node: &RawNode) -> usize {
        let Some(name) = node.name() else {
            return 0;
        };
        let pathways = node.str_list(PATHWAYS_PROPERTY);
        for pathway in pathways {
            self.record(pathway, name);
        }
        pathways.len()
    }

    /// Members recorded under a pathway.
    #[must_use]
    pub fn members(&self, pathway: &str) -> Option<&BTreeSet<String>> {
        self.pathways.get(pathway)
    }

    /// Number of distinct pathways.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    /// Check if no membership has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    /// Emit one `pathway` node per pathway and one `in_pathway` edge per member.
    ///
    /// The edge source is the member's resolved identity, or its natural name
    /// when the member node was never classified.
    #[must_use]
    pub fn aggregate(&self, identities: &IdentityTable) -> (Vec<OutputNode>, Vec<OutputEdge>) {
        let mut nodes = Vec::with_capacity(self.pathways.len());
        let mut edges = Vec::new();

        for (pathway, members) in &self.pathways {
            let pathway_id = Identity::prefixed(PSS_PREFIX, pathway);

            for member in members {
                let source = identities
                    .resolve(member)
                    .cloned()
                    .unwrap_or_else(|_| Identity::new(member.as_str()));
                edges.push(OutputEdge::incidental(source, pathway_id.clone(), IN_PATHWAY));
            }

            let mut props = PropertyMap::new();
            props.insert("name".to_string(), PropertyValue::from(pathway.as_str()));
            nodes.push(OutputNode::new(pathway_id, PATHWAY_NODE_TYPE, props));
        }

        (nodes, edges)
    }
}

// =============================================================================
// TESTS
// =============================================================================
