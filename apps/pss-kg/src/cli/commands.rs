//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::config::RunPlan;
use crate::io::{InputTally, JsonlWriter, load_annotations, read_jsonl};
use pss_core::{
    DiagnosticKind, ForeignLink, GeneAnnotations, Pairing, PropertyTransform, PssError, RawNode,
    RawReactionPattern, ReactionCategory, RunContext,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Node output file name inside the output directory.
pub const NODES_FILE: &str = "nodes.jsonl";

/// Edge output file name inside the output directory.
pub const EDGES_FILE: &str = "edges.jsonl";

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Counters collected over one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub output_dir: PathBuf,
    pub nodes_written: usize,
    pub edges_written: usize,
    pub reactions: usize,
    pub skipped_lines: usize,
    pub nodes_by_type: BTreeMap<String, usize>,
    pub edges_by_type: BTreeMap<String, usize>,
    pub diagnostics: BTreeMap<DiagnosticKind, usize>,
    #[serde(skip)]
    pub diagnostic_messages: Vec<String>,
}

fn bump(counts: &mut BTreeMap<String, usize>, key: &str) {
    let count = counts.entry(key.to_string()).or_insert(0);
    *count = count.saturating_add(1);
}

/// Run both passes over the planned inputs and write the output files.
pub fn run_pipeline(plan: &RunPlan) -> Result<RunSummary, PssError> {
    let annotations = match &plan.annotations {
        Some(path) => load_annotations(path)?,
        None => GeneAnnotations::new(),
    };
    tracing::info!(genes = annotations.len(), "annotations ready");

    std::fs::create_dir_all(&plan.output_dir).map_err(|e| {
        PssError::Io(format!(
            "Cannot create output directory '{}': {}",
            plan.output_dir.display(),
            e
        ))
    })?;

    let tally = InputTally::new();
    let mut summary = RunSummary {
        output_dir: plan.output_dir.clone(),
        ..RunSummary::default()
    };

    // Node pass
    let node_records = read_jsonl::<RawNode>(&plan.nodes)?.filter_map(|item| tally.admit(item));
    let mut node_writer = JsonlWriter::create(&plan.output_dir.join(NODES_FILE))?;
    let mut nodes = RunContext::new(annotations).classify_nodes(node_records);
    for node in nodes.by_ref() {
        bump(&mut summary.nodes_by_type, &node.node_type);
        node_writer.write(&node)?;
    }
    tally.check()?;
    summary.nodes_written = node_writer.written();
    node_writer.finish()?;

    // Edge pass
    let edge_pass = nodes.into_edge_pass()?;
    let foreign_links = plan
        .foreign_links
        .as_deref()
        .map(read_jsonl::<ForeignLink>)
        .transpose()?
        .into_iter()
        .flatten()
        .filter_map(|item| tally.admit(item));
    let reactions =
        read_jsonl::<RawReactionPattern>(&plan.reactions)?.filter_map(|item| tally.admit(item));

    let mut edge_writer = JsonlWriter::create(&plan.output_dir.join(EDGES_FILE))?;
    let mut edges = edge_pass.edges(foreign_links, reactions);
    for edge in edges.by_ref() {
        bump(&mut summary.edges_by_type, &edge.edge_type);
        edge_writer.write(&edge)?;
    }
    tally.check()?;
    summary.edges_written = edge_writer.written();
    edge_writer.finish()?;

    summary.reactions = edges.reactions_seen();
    let diagnostics = edges.finish();
    summary.diagnostics = diagnostics.counts();
    summary.diagnostic_messages = diagnostics
        .into_entries()
        .into_iter()
        .map(|d| format!("[{}] {}", d.kind.as_str(), d.message))
        .collect();
    summary.skipped_lines = tally.skipped();

    tracing::info!(
        nodes = summary.nodes_written,
        edges = summary.edges_written,
        skipped_lines = summary.skipped_lines,
        "run complete"
    );
    Ok(summary)
}

/// Run the transformation and report the summary.
pub fn cmd_run(
    plan: &RunPlan,
    json_mode: bool,
    quiet: bool,
    verbose: bool,
) -> Result<(), PssError> {
    let summary = run_pipeline(plan)?;

    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).unwrap_or_default()
        );
        return Ok(());
    }

    if quiet {
        return Ok(());
    }

    println!("PSS Knowledge Graph Run");
    println!("=======================");
    println!("Output:    {:?}", summary.output_dir);
    println!("Reactions: {}", summary.reactions);
    println!();
    println!("Nodes: {}", summary.nodes_written);
    for (node_type, count) in &summary.nodes_by_type {
        println!("  {:<28} {}", node_type, count);
    }
    println!();
    println!("Edges: {}", summary.edges_written);
    for (edge_type, count) in &summary.edges_by_type {
        println!("  {:<28} {}", edge_type, count);
    }
    println!();
    println!("Diagnostics:");
    if summary.diagnostics.is_empty() && summary.skipped_lines == 0 {
        println!("  none");
    }
    for (kind, count) in &summary.diagnostics {
        println!("  {:<28} {}", kind.as_str(), count);
    }
    if summary.skipped_lines > 0 {
        println!("  {:<28} {}", "skipped_input_lines", summary.skipped_lines);
    }

    if verbose {
        println!();
        for message in &summary.diagnostic_messages {
            println!("  {}", message);
        }
    }

    Ok(())
}

// =============================================================================
// RULES COMMAND
// =============================================================================

/// Human-readable form of a rule's pairing, e.g. `modifier x substrate`.
pub fn describe_pairing(pairing: &Pairing) -> String {
    match pairing {
        Pairing::Cross(source, target) => format!("{} x {}", source.as_str(), target.as_str()),
        Pairing::Permutations(role) => format!("perm({})", role.as_str()),
    }
}

/// Every reaction category and its rule table as JSON.
pub fn rules_json() -> serde_json::Value {
    let categories: Vec<_> = ReactionCategory::ALL
        .iter()
        .map(|category| {
            let rules: Vec<_> = category
                .rules()
                .iter()
                .map(|rule| {
                    let causal_mechanism = match rule.transform {
                        PropertyTransform::CausalMechanism(m) => Some(m),
                        PropertyTransform::Shared => None,
                    };
                    serde_json::json!({
                        "pairing": describe_pairing(&rule.pairing),
                        "edge_type": rule.edge_type,
                        "causal_mechanism": causal_mechanism
                    })
                })
                .collect();
            serde_json::json!({
                "category": category.label(),
                "rules": rules
            })
        })
        .collect();
    serde_json::Value::Array(categories)
}

/// Show every reaction category and its rule table.
pub fn cmd_rules(json_mode: bool) -> Result<(), PssError> {
    if json_mode {
        println!(
            "{}",
            serde_json::to_string_pretty(&rules_json()).unwrap_or_default()
        );
        return Ok(());
    }

    println!("Reaction Categories");
    println!("===================");
    for category in ReactionCategory::ALL {
        println!();
        println!("{}", category);
        if category.rules().is_empty() {
            println!("  (no edges)");
        }
        for rule in category.rules() {
            let extra = match rule.transform {
                PropertyTransform::CausalMechanism(m) => format!("  [causal_mechanism = {}]", m),
                PropertyTransform::Shared => String::new(),
            };
            println!(
                "  {:<24} -> {}{}",
                describe_pairing(&rule.pairing),
                rule.edge_type,
                extra
            );
        }
    }

    Ok(())
}
