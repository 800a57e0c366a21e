//! # Run Context
//!
//! Owns all state of one transformation run: the identity table, pathway
//! membership, gene annotations, the incidental-edge queue and the
//! diagnostic stream.
//!
//! A context is single-writer. It is moved into the node pass, then into the
//! edge pass, so two callers can never share it.

use crate::annotations::GeneAnnotations;
use crate::diagnostics::Diagnostics;
use crate::identity::IdentityTable;
use crate::nodes::{NodeKind, classify_node, expand_cluster_genes};
use crate::pass::NodePass;
use crate::pathway::PathwayMembership;
use crate::primitives::GENE_OF;
use crate::reaction::process_reaction;
use crate::{ForeignLink, OutputEdge, OutputNode, PssError, RawNode, RawReactionPattern};

/// State shared by the node and edge passes of one run.
#[derive(Debug, Default)]
pub struct RunContext {
    identities: IdentityTable,
    pathways: PathwayMembership,
    annotations: GeneAnnotations,
    incidental: Vec<OutputEdge>,
    diagnostics: Diagnostics,
}

impl RunContext {
    /// Create a context over a preloaded annotation table.
    #[must_use]
    pub fn new(annotations: GeneAnnotations) -> Self {
        Self {
            annotations,
            ..Self::default()
        }
    }

    /// Start the node pass. The context moves into the pass.
    pub fn classify_nodes<I>(self, records: I) -> NodePass<I::IntoIter>
    where
        I: IntoIterator<Item = RawNode>,
    {
        NodePass::new(self, records.into_iter())
    }

    /// The identity table built so far.
    #[must_use]
    pub fn identities(&self) -> &IdentityTable {
        &self.identities
    }

    /// Pathway memberships recorded so far.
    #[must_use]
    pub fn pathways(&self) -> &PathwayMembership {
        &self.pathways
    }

    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Incidental edges queued for the edge pass.
    #[must_use]
    pub fn incidental_edges(&self) -> &[OutputEdge] {
        &self.incidental
    }

    /// Report a recoverable failure on the diagnostic stream.
    pub fn report(&mut self, error: &PssError) {
        self.diagnostics.report(error);
    }

    pub(crate) fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    pub(crate) fn take_incidental(&mut self) -> Vec<OutputEdge> {
        std::mem::take(&mut self.incidental)
    }

    // =========================================================================
    // NODE PASS
    // =========================================================================

    /// Classify one node record.
    ///
    /// Pathway memberships are recorded before classification, so a node
    /// that fails to classify still counts as a pathway member. Returns the
    /// classified node followed by any cluster genes; empty on failure.
    pub fn classify_record(&mut self, record: &RawNode) -> Vec<OutputNode> {
        self.pathways.record_node(record);

        let classified = match classify_node(record) {
            Ok(classified) => classified,
            Err(e) => {
                self.diagnostics.report(&e);
                return Vec::new();
            }
        };

        if let Err(e) = self
            .identities
            .register(&classified.name, classified.node.id.clone())
        {
            self.diagnostics.report(&e);
        }

        let mut out = Vec::with_capacity(1);
        if classified.kind == NodeKind::FunctionalCluster {
            let (genes, edges) = expand_cluster_genes(
                record,
                &classified.node.id,
                &self.annotations,
                &mut self.diagnostics,
            );
            self.incidental.extend(edges);
            out.push(classified.node);
            out.extend(genes);
        } else {
            out.push(classified.node);
        }
        out
    }

    /// Turn recorded memberships into pathway nodes.
    ///
    /// The matching `in_pathway` edges are queued as incidental edges.
    pub fn aggregate_pathways(&mut self) -> Vec<OutputNode> {
        let (nodes, edges) = self.pathways.aggregate(&self.identities);
        self.incidental.extend(edges);
        nodes
    }

    // =========================================================================
    // EDGE PASS
    // =========================================================================

    /// Resolve a foreign gene link into a `gene_of` edge.
    ///
    /// Either end missing from the identity table is reported and yields `None`.
    pub fn foreign_edge(&mut self, link: &ForeignLink) -> Option<OutputEdge> {
        let source = self.identities.resolve(&link.source).ok().cloned();
        let target = self.identities.resolve(&link.target).ok().cloned();

        match (source, target) {
            (Some(source), Some(target)) => Some(OutputEdge::incidental(source, target, GENE_OF)),
            (source, _) => {
                let missing = if source.is_none() {
                    &link.source
                } else {
                    &link.target
                };
                self.diagnostics.report(&PssError::UnresolvedLink {
                    gene: link.source.clone(),
                    entity: link.target.clone(),
                    missing: missing.clone(),
                });
                None
            }
        }
    }

    /// Evaluate one reaction pattern against the identity table.
    ///
    /// A malformed pattern is reported and yields no edges.
    pub fn reaction_edges(&mut self, pattern: &RawReactionPattern) -> Vec<OutputEdge> {
        match process_reaction(pattern, &self.identities, &mut self.diagnostics) {
            Ok(edges) => edges,
            Err(e) => {
                self.diagnostics.report(&e);
                Vec::new()
            }
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
