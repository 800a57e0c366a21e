//! # Property-Based Tests
//!
//! Counting and exclusion invariants of edge generation and pathway
//! aggregation, checked with proptest.

use pss_core::{
    Diagnostics, Identity, IdentityTable, PathwayMembership, RawNode, RawReaction,
    RawReactionPattern, RawRelationship, ReactionCategory, process_reaction,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// HELPERS
// =============================================================================

fn relationship(edge_type: &str, name: &str, form: &str) -> RawRelationship {
    let entity = RawNode::new(["Protein"]).with("name", name);
    let hub = RawNode::new(["Reaction"]);
    let (start, end, side) = match edge_type {
        "PRODUCT" => (hub, entity, "target"),
        _ => (entity, hub, "source"),
    };
    RawRelationship::new(edge_type, start, end).with(&format!("{side}_form"), form)
}

/// A pattern with `s` substrates, `p` products and `m` modifiers, all resolvable.
fn pattern(category: &str, s: usize, p: usize, m: usize) -> (RawReactionPattern, IdentityTable) {
    let mut relationships = Vec::new();
    let mut names = Vec::new();
    for (prefix, edge_type, count) in [
        ("s", "SUBSTRATE", s),
        ("p", "PRODUCT", p),
        ("m", "INHIBITS", m),
    ] {
        for i in 0..count {
            let name = format!("{prefix}{i}");
            relationships.push(relationship(edge_type, &name, "protein"));
            names.push(name);
        }
    }
    let table = names
        .iter()
        .map(|n| (n.as_str(), Identity::prefixed("pss", n)))
        .collect();
    (
        RawReactionPattern::new(RawReaction::new("r", category), relationships),
        table,
    )
}

fn count_by_type(edges: &[pss_core::OutputEdge]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for edge in edges {
        *counts.entry(edge.edge_type.as_str()).or_insert(0) += 1;
    }
    counts
}

fn any_category() -> impl Strategy<Value = ReactionCategory> {
    (0..ReactionCategory::ALL.len()).prop_map(|i| ReactionCategory::ALL[i])
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Emitted edges match the rule table's predicted count for every category.
    #[test]
    fn edge_count_matches_role_set_sizes(
        category in any_category(),
        s in 0usize..5,
        p in 0usize..5,
        m in 0usize..5,
    ) {
        let (pattern, table) = pattern(category.label(), s, p, m);
        let mut diagnostics = Diagnostics::new();
        let edges = process_reaction(&pattern, &table, &mut diagnostics).expect("process");

        let classified = pss_core::classify_participants(&pattern, &table, &mut Diagnostics::new())
            .expect("classify");
        prop_assert_eq!(edges.len(), category.edge_count(&classified));
        prop_assert!(diagnostics.is_empty());
    }

    /// Catalysis emits |S|x|P| downstream_metabolite edges and |M|x(|S|+|P|) enzyme edges.
    #[test]
    fn catalysis_products(s in 0usize..6, p in 0usize..6, m in 0usize..4) {
        let (pattern, table) = pattern("catalysis", s, p, m);
        let edges = process_reaction(&pattern, &table, &mut Diagnostics::new()).expect("process");
        let counts = count_by_type(&edges);

        prop_assert_eq!(counts.get("downstream_metabolite").copied().unwrap_or(0), s * p);
        prop_assert_eq!(counts.get("enzyme_substrate").copied().unwrap_or(0), m * s);
        prop_assert_eq!(counts.get("enzyme_product").copied().unwrap_or(0), m * p);
    }

    /// Binding emits n(n-1) ordered substrate pairs, never a self-pair.
    #[test]
    fn binding_permutations(s in 0usize..7) {
        let (pattern, table) = pattern("binding/oligomerisation", s, 0, 0);
        let edges = process_reaction(&pattern, &table, &mut Diagnostics::new()).expect("process");

        prop_assert_eq!(edges.len(), s * s.saturating_sub(1));
        prop_assert!(edges.iter().all(|e| e.source != e.target));
    }

    /// Condition modifiers never appear as an endpoint.
    #[test]
    fn condition_modifiers_never_appear(
        category in any_category(),
        s in 1usize..4,
        p in 1usize..4,
        conditions in 1usize..4,
    ) {
        let (mut pattern, mut table) = pattern(category.label(), s, p, 1);
        for i in 0..conditions {
            let name = format!("cond{i}");
            pattern.relationships.push(relationship("ACTIVATES", &name, "condition"));
            table.register(&name, Identity::prefixed("pss", &name)).expect("register");
        }

        let edges = process_reaction(&pattern, &table, &mut Diagnostics::new()).expect("process");
        prop_assert!(edges.iter().all(|e|
            !e.source.as_str().starts_with("pss:cond") && !e.target.as_str().starts_with("pss:cond")
        ));
    }

    /// Unresolved participants contribute nothing and block nobody.
    #[test]
    fn unresolved_participants_are_skipped(s in 1usize..4, p in 1usize..4, ghosts in 1usize..4) {
        let (mut pattern, table) = pattern("catalysis", s, p, 0);
        for i in 0..ghosts {
            pattern.relationships.push(relationship("SUBSTRATE", &format!("ghost{i}"), "protein"));
        }

        let mut diagnostics = Diagnostics::new();
        let edges = process_reaction(&pattern, &table, &mut diagnostics).expect("process");

        prop_assert_eq!(edges.len(), s * p);
        prop_assert_eq!(diagnostics.len(), ghosts);
        prop_assert!(edges.iter().all(|e| !e.source.as_str().contains("ghost")));
    }

    /// Unknown and cleavage never emit edges.
    #[test]
    fn empty_categories(s in 1usize..5, p in 1usize..5, m in 1usize..5) {
        for label in ["unknown", "cleavage/auto-cleavage"] {
            let (pattern, table) = pattern(label, s, p, m);
            let edges =
                process_reaction(&pattern, &table, &mut Diagnostics::new()).expect("process");
            prop_assert!(edges.is_empty());
        }
    }

    /// in_pathway edges per pathway equal the distinct members ever recorded.
    #[test]
    fn pathway_edges_count_distinct_members(
        records in vec((0u8..4, 0u8..12), 0..60)
    ) {
        let mut membership = PathwayMembership::new();
        let mut expected: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (pathway, member) in &records {
            let (pathway, member) = (format!("P{pathway}"), format!("m{member}"));
            membership.record(&pathway, &member);
            expected.entry(pathway).or_default().insert(member);
        }

        let (nodes, edges) = membership.aggregate(&IdentityTable::new());

        prop_assert_eq!(nodes.len(), expected.len());
        for (pathway, members) in &expected {
            let target = Identity::prefixed("pss", pathway);
            let count = edges.iter().filter(|e| e.target == target).count();
            prop_assert_eq!(count, members.len());
        }
    }

    /// Identities are write-once: the first registration survives any later attempt.
    #[test]
    fn identity_table_is_write_once(names in btree_set("[a-z]{1,6}", 1..20)) {
        let mut table = IdentityTable::new();
        for name in &names {
            table.register(name, Identity::prefixed("pss", name)).expect("first");
        }
        for name in &names {
            prop_assert!(table.register(name, Identity::prefixed("chebi", name)).is_err());
            prop_assert_eq!(
                table.resolve(name).expect("resolve"),
                &Identity::prefixed("pss", name)
            );
        }
    }
}
