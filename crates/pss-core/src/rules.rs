//! # Edge-Generation Rules
//!
//! Reaction-category dispatch over a closed enumeration.
//!
//! Each category owns a fixed table of `EdgeRule`s. A rule pairs two
//! role-sets (Cartesian product) or one role-set with itself (ordered
//! 2-permutations), names the edge type, and optionally adds a literal
//! property. No pair is ever deduplicated: a participant holding two roles
//! yields every resulting edge.
//!
//! | Category | Rules |
//! |----------|-------|
//! | catalysis | S×P `downstream_metabolite`, M×S `enzyme_substrate`, M×P `enzyme_product` |
//! | degradation/secretion | M×S `enzyme_degradation` |
//! | translocation | M×S `transport_substrate` |
//! | binding/oligomerisation | perm(S) `protein_protein_interaction`, S×P `complex_subunits`, M×P `complex_formation_catalyst` |
//! | protein activation | M×S `protein_activation` |
//! | protein deactivation | M×S `protein_inhibition` |
//! | transcriptional/translational activation | M×S `transcriptional_activation` |
//! | transcriptional/translational repression | M×S `transcriptional_inhibition` + causal mechanism |
//! | dissociation | S×P `dissociation_product`, S×M `dissociation_catalyst` |
//! | unknown, cleavage/auto-cleavage | none |

use crate::participant::{ClassifiedReaction, ParticipantRole, ReactionParticipant};
use crate::primitives::TRANSCRIPTIONAL_REGULATION;
use crate::{OutputEdge, PropertyMap, PropertyValue};

use ParticipantRole::{Modifier, Product, Substrate};

// =============================================================================
// RULE DEFINITIONS
// =============================================================================

/// How two role-sets are combined into endpoint pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Every `(source, target)` in `source_set × target_set`.
    Cross(ParticipantRole, ParticipantRole),
    /// Every ordered pair of distinct positions within one role-set.
    Permutations(ParticipantRole),
}

impl Pairing {
    /// Number of pairs this pairing yields for a classified reaction.
    #[must_use]
    pub fn pair_count(&self, reaction: &ClassifiedReaction) -> usize {
        match *self {
            Self::Cross(source, target) => reaction
                .role_set(source)
                .len()
                .saturating_mul(reaction.role_set(target).len()),
            Self::Permutations(role) => {
                let n = reaction.role_set(role).len();
                n.saturating_mul(n.saturating_sub(1))
            }
        }
    }

    /// Visit every `(source, target)` pair in deterministic order.
    fn for_each_pair<'a>(
        &self,
        reaction: &'a ClassifiedReaction,
        mut visit: impl FnMut(&'a ReactionParticipant, &'a ReactionParticipant),
    ) {
        match *self {
            Self::Cross(source, target) => {
                for s in reaction.role_set(source) {
                    for t in reaction.role_set(target) {
                        visit(s, t);
                    }
                }
            }
            Self::Permutations(role) => {
                let set = reaction.role_set(role);
                for (i, s) in set.iter().enumerate() {
                    for (j, t) in set.iter().enumerate() {
                        if i != j {
                            visit(s, t);
                        }
                    }
                }
            }
        }
    }
}

/// Extra properties a rule adds on top of the reaction's shared properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyTransform {
    /// Shared reaction properties only.
    Shared,
    /// Shared properties plus a literal `causal_mechanism`.
    CausalMechanism(&'static str),
}

impl PropertyTransform {
    fn apply(&self, base: &PropertyMap) -> PropertyMap {
        let mut props = base.clone();
        if let Self::CausalMechanism(mechanism) = self {
            props.insert(
                "causal_mechanism".to_string(),
                PropertyValue::Str((*mechanism).to_string()),
            );
        }
        props
    }
}

/// One declarative edge-generation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeRule {
    pub pairing: Pairing,
    pub edge_type: &'static str,
    pub transform: PropertyTransform,
}

impl EdgeRule {
    const fn cross(
        source: ParticipantRole,
        target: ParticipantRole,
        edge_type: &'static str,
    ) -> Self {
        Self {
            pairing: Pairing::Cross(source, target),
            edge_type,
            transform: PropertyTransform::Shared,
        }
    }

    const fn permutations(role: ParticipantRole, edge_type: &'static str) -> Self {
        Self {
            pairing: Pairing::Permutations(role),
            edge_type,
            transform: PropertyTransform::Shared,
        }
    }

    const fn with_causal_mechanism(self, mechanism: &'static str) -> Self {
        Self {
            transform: PropertyTransform::CausalMechanism(mechanism),
            ..self
        }
    }

    /// Append this rule's edges for one reaction to `out`.
    pub fn apply(
        &self,
        reaction: &ClassifiedReaction,
        base: &PropertyMap,
        out: &mut Vec<OutputEdge>,
    ) {
        let props = self.transform.apply(base);
        self.pairing.for_each_pair(reaction, |source, target| {
            out.push(OutputEdge::new(
                source.identity.clone(),
                target.identity.clone(),
                self.edge_type,
                props.clone(),
            ));
        });
    }
}

// =============================================================================
// RULE TABLES
// =============================================================================

const CATALYSIS: &[EdgeRule] = &[
    EdgeRule::cross(Substrate, Product, "downstream_metabolite"),
    EdgeRule::cross(Modifier, Substrate, "enzyme_substrate"),
    EdgeRule::cross(Modifier, Product, "enzyme_product"),
];

const DEGRADATION: &[EdgeRule] = &[EdgeRule::cross(Modifier, Substrate, "enzyme_degradation")];

const TRANSLOCATION: &[EdgeRule] = &[EdgeRule::cross(Modifier, Substrate, "transport_substrate")];

const BINDING: &[EdgeRule] = &[
    EdgeRule::permutations(Substrate, "protein_protein_interaction"),
    EdgeRule::cross(Substrate, Product, "complex_subunits"),
    EdgeRule::cross(Modifier, Product, "complex_formation_catalyst"),
];

const PROTEIN_ACTIVATION: &[EdgeRule] =
    &[EdgeRule::cross(Modifier, Substrate, "protein_activation")];

const PROTEIN_DEACTIVATION: &[EdgeRule] =
    &[EdgeRule::cross(Modifier, Substrate, "protein_inhibition")];

// TODO: confirm with the SKM curators whether activation edges should carry
// causal_mechanism like repression edges do; emitted without it for now.
const TRANSCRIPTIONAL_ACTIVATION: &[EdgeRule] =
    &[EdgeRule::cross(Modifier, Substrate, "transcriptional_activation")];

const TRANSCRIPTIONAL_INHIBITION: EdgeRule =
    EdgeRule::cross(Modifier, Substrate, "transcriptional_inhibition")
        .with_causal_mechanism(TRANSCRIPTIONAL_REGULATION);

const TRANSCRIPTIONAL_REPRESSION: &[EdgeRule] = &[TRANSCRIPTIONAL_INHIBITION];

const DISSOCIATION: &[EdgeRule] = &[
    EdgeRule::cross(Substrate, Product, "dissociation_product"),
    EdgeRule::cross(Substrate, Modifier, "dissociation_catalyst"),
];

const NO_RULES: &[EdgeRule] = &[];

// =============================================================================
// REACTION CATEGORY
// =============================================================================

/// Closed set of reaction categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReactionCategory {
    Catalysis,
    DegradationSecretion,
    Translocation,
    BindingOligomerisation,
    ProteinActivation,
    ProteinDeactivation,
    TranscriptionalActivation,
    TranscriptionalRepression,
    Dissociation,
    Unknown,
    Cleavage,
}

impl ReactionCategory {
    /// Every category, in table order.
    pub const ALL: [Self; 11] = [
        Self::Catalysis,
        Self::DegradationSecretion,
        Self::Translocation,
        Self::BindingOligomerisation,
        Self::ProteinActivation,
        Self::ProteinDeactivation,
        Self::TranscriptionalActivation,
        Self::TranscriptionalRepression,
        Self::Dissociation,
        Self::Unknown,
        Self::Cleavage,
    ];

    /// Parse a `reaction_type` label. Unrecognized labels yield `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label)
    }

    /// The `reaction_type` label of this category.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Catalysis => "catalysis",
            Self::DegradationSecretion => "degradation/secretion",
            Self::Translocation => "translocation",
            Self::BindingOligomerisation => "binding/oligomerisation",
            Self::ProteinActivation => "protein activation",
            Self::ProteinDeactivation => "protein deactivation",
            Self::TranscriptionalActivation => "transcriptional/translational activation",
            Self::TranscriptionalRepression => "transcriptional/translational repression",
            Self::Dissociation => "dissociation",
            Self::Unknown => "unknown",
            Self::Cleavage => "cleavage/auto-cleavage",
        }
    }

    /// The rule table of this category.
    #[must_use]
    pub fn rules(&self) -> &'static [EdgeRule] {
        match self {
            Self::Catalysis => CATALYSIS,
            Self::DegradationSecretion => DEGRADATION,
            Self::Translocation => TRANSLOCATION,
            Self::BindingOligomerisation => BINDING,
            Self::ProteinActivation => PROTEIN_ACTIVATION,
            Self::ProteinDeactivation => PROTEIN_DEACTIVATION,
            Self::TranscriptionalActivation => TRANSCRIPTIONAL_ACTIVATION,
            Self::TranscriptionalRepression => TRANSCRIPTIONAL_REPRESSION,
            Self::Dissociation => DISSOCIATION,
            Self::Unknown | Self::Cleavage => NO_RULES,
        }
    }

    /// Exact number of edges `generate_edges` will produce.
    #[must_use]
    pub fn edge_count(&self, reaction: &ClassifiedReaction) -> usize {
        self.rules()
            .iter()
            .map(|rule| rule.pairing.pair_count(reaction))
            .fold(0usize, usize::saturating_add)
    }
}

impl std::fmt::Display for ReactionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// GENERATION
// =============================================================================

/// Apply a category's rule table to classified participants.
///
/// Every edge carries `base_props`, plus the rule's literal property if any.
#[must_use]
pub fn generate_edges(
    category: ReactionCategory,
    reaction: &ClassifiedReaction,
    base_props: &PropertyMap,
) -> Vec<OutputEdge> {
    let mut edges = Vec::with_capacity(category.edge_count(reaction));
    for rule in category.rules() {
        rule.apply(reaction, base_props, &mut edges);
    }
    edges
}

/// Generate the edges of a reaction from its raw category label.
///
/// An unrecognized label yields no edges and is not an error.
pub fn generate_for_label(
    label: &str,
    reaction: &ClassifiedReaction,
    base_props: &PropertyMap,
) -> Vec<OutputEdge> {
    match ReactionCategory::from_label(label) {
        Some(category) => generate_edges(category, reaction, base_props),
        None => {
            tracing::debug!(reaction_type = label, "unrecognized reaction category, no edges");
            Vec::new()
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Identity;

    fn participant(name: &str) -> ReactionParticipant {
        ReactionParticipant {
            name: name.to_string(),
            identity: Identity::prefixed("pss", name),
            form: "protein".to_string(),
            location: None,
        }
    }

    fn reaction(s: &[&str], p: &[&str], m: &[&str]) -> ClassifiedReaction {
        ClassifiedReaction {
            substrates: s.iter().map(|n| participant(n)).collect(),
            products: p.iter().map(|n| participant(n)).collect(),
            modifiers: m.iter().map(|n| participant(n)).collect(),
        }
    }

    fn base() -> PropertyMap {
        let mut props = PropertyMap::new();
        props.insert("reaction_identifier".to_string(), PropertyValue::from("skm:r1"));
        props
    }

    fn triples(edges: &[OutputEdge]) -> Vec<(String, String, String)> {
        edges
            .iter()
            .map(|e| {
                (
                    e.edge_type.clone(),
                    e.source.as_str().to_string(),
                    e.target.as_str().to_string(),
                )
            })
            .collect()
    }

    fn t(edge_type: &str, source: &str, target: &str) -> (String, String, String) {
        (
            edge_type.to_string(),
            format!("pss:{source}"),
            format!("pss:{target}"),
        )
    }

    #[test]
    fn labels_round_trip() {
        for category in ReactionCategory::ALL {
            assert_eq!(ReactionCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(ReactionCategory::from_label("Catalysis"), None);
        assert_eq!(ReactionCategory::from_label("phosphorylation"), None);
    }

    #[test]
    fn catalysis_rules() {
        let r = reaction(&["S"], &["P"], &["E"]);
        let edges = generate_edges(ReactionCategory::Catalysis, &r, &base());

        assert_eq!(
            triples(&edges),
            vec![
                t("downstream_metabolite", "S", "P"),
                t("enzyme_substrate", "E", "S"),
                t("enzyme_product", "E", "P"),
            ]
        );
    }

    #[test]
    fn label_dispatch() {
        let r = reaction(&["S"], &["P"], &["E"]);

        assert_eq!(
            generate_for_label("catalysis", &r, &base()),
            generate_edges(ReactionCategory::Catalysis, &r, &base())
        );
        assert!(generate_for_label("phosphorylation", &r, &base()).is_empty());
        assert!(generate_for_label("unknown", &r, &base()).is_empty());
    }

    #[test]
    fn catalysis_cross_product_size() {
        let r = reaction(&["S1", "S2"], &["P1", "P2", "P3"], &[]);
        let edges = generate_edges(ReactionCategory::Catalysis, &r, &base());

        assert_eq!(edges.len(), 6);
        assert!(edges.iter().all(|e| e.edge_type == "downstream_metabolite"));
    }

    #[test]
    fn binding_permutations_and_products() {
        let r = reaction(&["A", "B"], &["C"], &[]);
        let edges = generate_edges(ReactionCategory::BindingOligomerisation, &r, &base());

        assert_eq!(
            triples(&edges),
            vec![
                t("protein_protein_interaction", "A", "B"),
                t("protein_protein_interaction", "B", "A"),
                t("complex_subunits", "A", "C"),
                t("complex_subunits", "B", "C"),
            ]
        );
    }

    #[test]
    fn binding_with_catalyst() {
        let r = reaction(&["A"], &["C"], &["K"]);
        let edges = generate_edges(ReactionCategory::BindingOligomerisation, &r, &base());
        assert_eq!(
            triples(&edges),
            vec![t("complex_subunits", "A", "C"), t("complex_formation_catalyst", "K", "C")]
        );
    }

    #[test]
    fn single_rule_categories() {
        let r = reaction(&["S"], &["P"], &["M"]);
        let cases = [
            (ReactionCategory::DegradationSecretion, "enzyme_degradation"),
            (ReactionCategory::Translocation, "transport_substrate"),
            (ReactionCategory::ProteinActivation, "protein_activation"),
            (ReactionCategory::ProteinDeactivation, "protein_inhibition"),
            (ReactionCategory::TranscriptionalActivation, "transcriptional_activation"),
            (ReactionCategory::TranscriptionalRepression, "transcriptional_inhibition"),
        ];

        for (category, edge_type) in cases {
            let edges = generate_edges(category, &r, &base());
            assert_eq!(triples(&edges), vec![t(edge_type, "M", "S")], "{category}");
        }
    }

    #[test]
    fn dissociation_rules() {
        let r = reaction(&["S"], &["P"], &["M"]);
        let edges = generate_edges(ReactionCategory::Dissociation, &r, &base());
        assert_eq!(
            triples(&edges),
            vec![t("dissociation_product", "S", "P"), t("dissociation_catalyst", "S", "M")]
        );
    }

    #[test]
    fn no_op_categories() {
        let r = reaction(&["S"], &["P"], &["M"]);
        assert!(generate_edges(ReactionCategory::Unknown, &r, &base()).is_empty());
        assert!(generate_edges(ReactionCategory::Cleavage, &r, &base()).is_empty());
    }

    #[test]
    fn repression_attaches_causal_mechanism() {
        let r = reaction(&["G"], &[], &["TF"]);
        let edges = generate_edges(ReactionCategory::TranscriptionalRepression, &r, &base());
        assert_eq!(
            edges[0].properties.get("causal_mechanism"),
            Some(&PropertyValue::from("transcriptional regulation"))
        );
        assert_eq!(
            edges[0].properties.get("reaction_identifier"),
            Some(&PropertyValue::from("skm:r1"))
        );
    }

    #[test]
    fn activation_carries_shared_properties_only() {
        let r = reaction(&["G"], &[], &["TF"]);
        let edges = generate_edges(ReactionCategory::TranscriptionalActivation, &r, &base());
        assert_eq!(edges[0].properties, base());
    }

    #[test]
    fn participant_in_two_roles_is_not_deduplicated() {
        let r = reaction(&["X", "Y"], &["X"], &[]);
        let edges = generate_edges(ReactionCategory::Catalysis, &r, &base());
        assert_eq!(
            triples(&edges),
            vec![t("downstream_metabolite", "X", "X"), t("downstream_metabolite", "Y", "X")]
        );
    }

    #[test]
    fn edge_count_matches_generation() {
        let r = reaction(&["A", "B", "C"], &["P", "Q"], &["M", "N"]);
        for category in ReactionCategory::ALL {
            let edges = generate_edges(category, &r, &base());
            assert_eq!(edges.len(), category.edge_count(&r), "{category}");
        }
    }

    #[test]
    fn engine_never_assigns_edge_ids() {
        let r = reaction(&["A", "B"], &["C"], &["M"]);
        let edges = generate_edges(ReactionCategory::BindingOligomerisation, &r, &base());
        assert!(edges.iter().all(|e| e.id.is_none()));
    }
}
