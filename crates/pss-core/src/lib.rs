//! # pss-core
//!
//! The reaction transformation engine for the Plant Stress Signalling
//! knowledge graph - THE LOGIC.
//!
//! Takes a labeled-graph representation of biological reactions (entities
//! connected by SUBSTRATE, PRODUCT, INHIBITS, ... relationships) and emits
//! typed nodes and typed directed edges for a downstream knowledge graph.
//!
//! ## Run Shape
//!
//! ```text
//! RunContext ──classify_nodes──▶ NodePass ──into_edge_pass──▶ EdgePass ──edges──▶ EdgeStream
//!    (annotations)               (nodes, pathway nodes)                     (incidental, gene_of, reactions)
//! ```
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no I/O beyond the annotation reader
//! - Deterministic: `BTreeMap`/`BTreeSet` only
//! - Pull-based: nothing is computed until the consumer asks for it
//! - Tolerant: record-level failures land on the diagnostic stream and the
//!   run continues

// =============================================================================
// MODULES
// =============================================================================

pub mod annotations;
pub mod context;
pub mod diagnostics;
pub mod identity;
pub mod nodes;
pub mod participant;
pub mod pass;
pub mod pathway;
pub mod primitives;
pub mod reaction;
pub mod rules;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    ForeignLink, Identity, OutputEdge, OutputNode, PropertyMap, PropertyValue, PssError, RawNode,
    RawReaction, RawReactionPattern, RawRelationship,
};

// =============================================================================
// RE-EXPORTS: Engine
// =============================================================================

pub use annotations::GeneAnnotations;
pub use context::RunContext;
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use identity::IdentityTable;
pub use nodes::{ClassifiedNode, NodeKind, classify_node};
pub use participant::{
    ClassifiedReaction, ParticipantRole, ReactionParticipant, classify_participants,
    reaction_properties,
};
pub use pass::{EdgePass, EdgeStream, NodePass};
pub use pathway::PathwayMembership;
pub use reaction::process_reaction;
pub use rules::{
    EdgeRule, Pairing, PropertyTransform, ReactionCategory, generate_edges, generate_for_label,
};
