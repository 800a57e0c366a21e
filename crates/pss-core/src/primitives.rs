//! # Primitives
//!
//! Hardcoded constants of the PSS transformation.
//!
//! These are compiled into the binary and immutable at runtime:
//! identifier namespaces, URL templates, and the literal labels the
//! classification rules match against.

// =============================================================================
// IDENTIFIER NAMESPACES
// =============================================================================

/// Namespace for entities without an external cross reference.
pub const PSS_PREFIX: &str = "pss";

/// Namespace for reactions and functional clusters.
pub const SKM_PREFIX: &str = "skm";

/// Namespace for Arabidopsis genes.
pub const TAIR_PREFIX: &str = "tair";

/// Cross-reference key preferred for metabolites.
pub const CHEBI_LINK: &str = "chebi";

/// Cross-reference key preferred for foreign entities.
pub const NCBITAXON_LINK: &str = "ncbitaxon";

/// Cross-reference key collected into the `references` edge property.
pub const DOI_LINK: &str = "doi";

// =============================================================================
// URL TEMPLATES
// =============================================================================

/// Reaction lookup URL; the reaction id is appended.
pub const REACTION_URL: &str = "https://skm.nib.si/biomine/?reaction_id=";

/// Functional cluster lookup URL; the cluster id is appended.
pub const FUNCTIONAL_CLUSTER_URL: &str = "https://skm.nib.si/biomine/?functional_cluster_id=";

/// Gene search URL; the TAIR locus is appended.
pub const GENE_SEARCH_URL: &str =
    "https://skm.nib.si/search?entity_type=functional_cluster&key=identifier&query=";

// =============================================================================
// PARTICIPANTS
// =============================================================================

/// Modifier form that marks an environmental condition rather than an agent.
///
/// Modifiers with this form are never treated as catalysts.
pub const CONDITION_FORM: &str = "condition";

/// Literal causal mechanism attached by transcriptional rules.
pub const TRANSCRIPTIONAL_REGULATION: &str = "transcriptional regulation";

// =============================================================================
// ANNOTATION DEFAULTS
// =============================================================================

/// Taxon of every annotated gene (Arabidopsis thaliana).
pub const ANNOTATION_TAXON: &str = "ncbitaxon:3702";

/// Species name of every annotated gene.
pub const ANNOTATION_SPECIES: &str = "Arabidopsis thaliana";

// =============================================================================
// INCIDENTAL EDGE TYPES
// =============================================================================

/// Member node -> pathway node.
pub const IN_PATHWAY: &str = "in_pathway";

/// Gene -> functional cluster.
pub const FUNCTIONAL_CLUSTER_MEMBER: &str = "functional_cluster_member";

/// Foreign coding gene -> foreign entity.
pub const GENE_OF: &str = "gene_of";

/// Node type of aggregated pathways.
pub const PATHWAY_NODE_TYPE: &str = "pathway";

/// Find the first `key:value` entry whose key matches.
#[must_use]
pub fn first_link<'a>(links: &'a [String], key: &str) -> Option<&'a str> {
    links.iter().map(String::as_str).find(|l| has_link_key(l, key))
}

/// Collect every `key:value` entry whose key matches, verbatim.
#[must_use]
pub fn all_links(links: &[String], key: &str) -> Vec<String> {
    links.iter().filter(|l| has_link_key(l, key)).cloned().collect()
}

fn has_link_key(link: &str, key: &str) -> bool {
    link.strip_prefix(key).is_some_and(|rest| rest.starts_with(':'))
}
