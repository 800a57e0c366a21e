//! # Node and Edge Passes
//!
//! A run is two lazy, single-use passes over the input:
//!
//! 1. `NodePass` classifies node records one pull at a time, then yields the
//!    pathway nodes once the records run out.
//! 2. `EdgeStream` yields queued incidental edges, then `gene_of` edges, then
//!    reaction edges, evaluating one reaction per refill.
//!
//! Each pass consumes the `RunContext` of the one before it. Reactions can
//! only be evaluated against the complete identity table, so
//! `NodePass::into_edge_pass` refuses to hand over a context whose node pass
//! has not been drained. Neither pass can be restarted.

use crate::context::RunContext;
use crate::diagnostics::Diagnostics;
use crate::{ForeignLink, OutputEdge, OutputNode, PssError, RawNode, RawReactionPattern};
use std::collections::VecDeque;
use std::iter::FusedIterator;

// =============================================================================
// NODE PASS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeStage {
    Records,
    Done,
}

/// Lazy iterator over the nodes of a run.
#[derive(Debug)]
pub struct NodePass<I> {
    context: RunContext,
    records: I,
    pending: VecDeque<OutputNode>,
    stage: NodeStage,
    classified: usize,
}

impl<I> NodePass<I>
where
    I: Iterator<Item = RawNode>,
{
    pub(crate) fn new(context: RunContext, records: I) -> Self {
        Self {
            context,
            records,
            pending: VecDeque::new(),
            stage: NodeStage::Records,
            classified: 0,
        }
    }

    /// Run state accumulated so far.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        self.context.diagnostics()
    }

    /// Check if every node, pathway nodes included, has been yielded.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.stage == NodeStage::Done && self.pending.is_empty()
    }

    /// Hand the completed run state over to the edge pass.
    ///
    /// # Errors
    /// Returns `PssError::NodePassIncomplete` if nodes remain to be pulled.
    pub fn into_edge_pass(self) -> Result<EdgePass, PssError> {
        if !self.is_exhausted() {
            return Err(PssError::NodePassIncomplete);
        }
        Ok(EdgePass {
            context: self.context,
        })
    }
}

impl<I> Iterator for NodePass<I>
where
    I: Iterator<Item = RawNode>,
{
    type Item = OutputNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.pending.pop_front() {
                return Some(node);
            }

            match self.stage {
                NodeStage::Records => match self.records.next() {
                    Some(record) => {
                        self.classified += 1;
                        let nodes = self.context.classify_record(&record);
                        self.pending.extend(nodes);
                    }
                    None => {
                        let pathways = self.context.aggregate_pathways();
                        tracing::info!(
                            records = self.classified,
                            identities = self.context.identities().len(),
                            pathways = pathways.len(),
                            "node pass complete"
                        );
                        self.pending.extend(pathways);
                        self.stage = NodeStage::Done;
                    }
                },
                NodeStage::Done => return None,
            }
        }
    }
}

impl<I> FusedIterator for NodePass<I> where I: Iterator<Item = RawNode> {}

// =============================================================================
// EDGE PASS
// =============================================================================

/// Run state after a fully drained node pass.
#[derive(Debug)]
pub struct EdgePass {
    context: RunContext,
}

impl EdgePass {
    /// Run state the edges are generated against.
    #[must_use]
    pub fn context(&self) -> &RunContext {
        &self.context
    }

    /// Start the edge stream.
    pub fn edges<F, R>(self, foreign_links: F, reactions: R) -> EdgeStream<F::IntoIter, R::IntoIter>
    where
        F: IntoIterator<Item = ForeignLink>,
        R: IntoIterator<Item = RawReactionPattern>,
    {
        let mut context = self.context;
        let incidental = context.take_incidental().into_iter();
        EdgeStream {
            context,
            incidental,
            foreign_links: foreign_links.into_iter(),
            reactions: reactions.into_iter(),
            pending: VecDeque::new(),
            stage: EdgeStage::Incidental,
            reactions_seen: 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EdgeStage {
    Incidental,
    ForeignLinks,
    Reactions,
    Done,
}

/// Lazy iterator over the edges of a run.
#[derive(Debug)]
pub struct EdgeStream<F, R> {
    context: RunContext,
    incidental: std::vec::IntoIter<OutputEdge>,
    foreign_links: F,
    reactions: R,
    pending: VecDeque<OutputEdge>,
    stage: EdgeStage,
    reactions_seen: usize,
}

impl<F, R> EdgeStream<F, R> {
    /// Diagnostics reported so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        self.context.diagnostics()
    }

    /// Number of reaction patterns evaluated so far.
    #[must_use]
    pub fn reactions_seen(&self) -> usize {
        self.reactions_seen
    }

    /// Stop the run and return its diagnostics. Unpulled input is discarded.
    #[must_use]
    pub fn finish(self) -> Diagnostics {
        self.context.into_diagnostics()
    }
}

impl<F, R> Iterator for EdgeStream<F, R>
where
    F: Iterator<Item = ForeignLink>,
    R: Iterator<Item = RawReactionPattern>,
{
    type Item = OutputEdge;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(edge) = self.pending.pop_front() {
                return Some(edge);
            }

            match self.stage {
                EdgeStage::Incidental => match self.incidental.next() {
                    Some(edge) => return Some(edge),
                    None => self.stage = EdgeStage::ForeignLinks,
                },
                EdgeStage::ForeignLinks => match self.foreign_links.next() {
                    Some(link) => {
                        if let Some(edge) = self.context.foreign_edge(&link) {
                            return Some(edge);
                        }
                    }
                    None => self.stage = EdgeStage::Reactions,
                },
                EdgeStage::Reactions => match self.reactions.next() {
                    Some(pattern) => {
                        self.reactions_seen += 1;
                        let edges = self.context.reaction_edges(&pattern);
                        self.pending.extend(edges);
                    }
                    None => {
                        tracing::info!(
                            reactions = self.reactions_seen,
                            diagnostics = self.context.diagnostics().len(),
                            "edge pass complete"
                        );
                        self.stage = EdgeStage::Done;
                    }
                },
                EdgeStage::Done => return None,
            }
        }
    }
}

impl<F, R> FusedIterator for EdgeStream<F, R>
where
    F: Iterator<Item = ForeignLink>,
    R: Iterator<Item = RawReactionPattern>,
{
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathway::PATHWAYS_PROPERTY;
    use crate::{RawReaction, RawRelationship};

    fn records() -> Vec<RawNode> {
        vec![
            RawNode::new(["Metabolite"])
                .with("name", "A")
                .with(PATHWAYS_PROPERTY, vec!["P1".to_string()]),
            RawNode::new(["Metabolite"]).with("name", "B"),
        ]
    }

    fn metabolite(name: &str) -> RawNode {
        RawNode::new(["Metabolite"]).with("name", name)
    }

    fn substrate_product(reaction_type: &str) -> RawReactionPattern {
        let hub = RawNode::new(["Reaction"]);
        RawReactionPattern::new(
            RawReaction::new("r1", reaction_type),
            vec![
                RawRelationship::new("SUBSTRATE", metabolite("A"), hub.clone())
                    .with("source_form", "protein"),
                RawRelationship::new("PRODUCT", hub, metabolite("B"))
                    .with("target_form", "protein"),
            ],
        )
    }

    #[test]
    fn node_pass_yields_records_then_pathways() {
        let mut pass = RunContext::default().classify_nodes(records());
        let ids: Vec<String> = pass.by_ref().map(|n| n.id.0).collect();

        assert_eq!(ids, vec!["pss:A", "pss:B", "pss:P1"]);
        assert!(pass.is_exhausted());
        assert!(pass.next().is_none());
        assert!(pass.next().is_none());
    }

    #[test]
    fn node_pass_is_lazy() {
        let mut pass = RunContext::default().classify_nodes(records());
        assert_eq!(pass.next().map(|n| n.id.0), Some("pss:A".to_string()));
        assert_eq!(pass.context().identities().len(), 1);
    }

    #[test]
    fn edge_pass_requires_drained_node_pass() {
        let mut pass = RunContext::default().classify_nodes(records());
        pass.next();
        assert!(matches!(pass.into_edge_pass(), Err(PssError::NodePassIncomplete)));
    }

    #[test]
    fn empty_node_pass_can_hand_over() {
        let mut pass = RunContext::default().classify_nodes(Vec::new());
        assert!(pass.next().is_none());
        assert!(pass.into_edge_pass().is_ok());
    }

    #[test]
    fn edge_stream_order() {
        let mut pass = RunContext::default().classify_nodes(records());
        pass.by_ref().for_each(drop);
        let edge_pass = pass.into_edge_pass().expect("drained");

        let mut stream = edge_pass.edges(Vec::new(), vec![substrate_product("dissociation")]);
        let types: Vec<String> = stream.by_ref().map(|e| e.edge_type).collect();

        assert_eq!(types, vec!["in_pathway", "dissociation_product"]);
        assert_eq!(stream.reactions_seen(), 1);
        assert!(stream.next().is_none());
        assert!(stream.finish().is_empty());
    }

    #[test]
    fn edge_stream_pulls_one_reaction_at_a_time() {
        let mut pass = RunContext::default().classify_nodes(records());
        pass.by_ref().for_each(drop);
        let edge_pass = pass.into_edge_pass().expect("drained");

        let reactions = vec![substrate_product("dissociation"), substrate_product("dissociation")];
        let mut stream = edge_pass.edges(Vec::new(), reactions);

        stream.next();
        stream.next();
        assert_eq!(stream.reactions_seen(), 1);
    }

    #[test]
    fn malformed_reaction_does_not_stop_stream() {
        let mut pass = RunContext::default().classify_nodes(records());
        pass.by_ref().for_each(drop);
        let edge_pass = pass.into_edge_pass().expect("drained");

        let hub = RawNode::new(["Reaction"]);
        let broken = RawReactionPattern::new(
            RawReaction::new("bad", "dissociation"),
            vec![RawRelationship::new("SUBSTRATE", RawNode::new(["Metabolite"]), hub)],
        );

        let mut stream =
            edge_pass.edges(Vec::new(), vec![broken, substrate_product("dissociation")]);
        let count = stream.by_ref().filter(|e| e.edge_type == "dissociation_product").count();

        assert_eq!(count, 1);
        assert_eq!(stream.finish().len(), 1);
    }
}
