//! `cmdb impact` command implementation.

use anyhow::Result;
use cmdb_graph::{compute_impact, DependencyGraph, ImpactAnalysis, ImpactedNode, NodeId, NodeKind};
use colored::Colorize;
use serde::Serialize;

use super::display::{node_label, print_nodes};
use super::output::print_json;
use super::{parse_node_id, Context};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImpactReport<'a> {
    source: NodeId,
    in_graph: bool,
    affected_count: usize,
    impacted: Vec<ImpactedEntry<'a>>,
}

#[derive(Serialize)]
struct ImpactedEntry<'a> {
    id: NodeId,
    kind: NodeKind,
    name: Option<&'a str>,
    depth: usize,
}

/// Run the impact command.
pub fn run(ctx: &Context, node: &str) -> Result<()> {
    let source = parse_node_id(node)?;
    let graph = ctx.build_graph();
    let impact = compute_impact(&graph, &source);

    if ctx.output.json {
        return print_json(&report(&graph, &impact));
    }

    if !graph.contains(&source) {
        println!(
            "{}: {} is not in the graph (unknown, or excluded by the filter)",
            "note".yellow(),
            source.to_string().cyan().bold()
        );
        return Ok(());
    }

    println!(
        "Impact analysis for {}:",
        node_label(&graph, &source).cyan().bold()
    );
    println!();

    let affected = impact.impacted().iter().filter(|node| node.id != source);
    let (services, cis): (Vec<&ImpactedNode>, Vec<&ImpactedNode>) =
        affected.partition(|node| node.id.kind() == NodeKind::Service);

    println!(
        "  {} ({}):",
        "Affected services".white().bold(),
        services.len().to_string().red()
    );
    print_nodes(
        &graph,
        services.iter().map(|node| (&node.id, node.depth)),
        "(none)",
    );
    println!();

    println!(
        "  {} ({}):",
        "Affected configuration items".white().bold(),
        cis.len().to_string().yellow()
    );
    print_nodes(&graph, cis.iter().map(|node| (&node.id, node.depth)), "(none)");
    println!();

    println!(
        "  {}: {}",
        "Total affected".white().bold(),
        impact.affected_count().to_string().green()
    );

    Ok(())
}

fn report<'a>(graph: &'a DependencyGraph, impact: &ImpactAnalysis) -> ImpactReport<'a> {
    ImpactReport {
        source: impact.source(),
        in_graph: graph.contains(&impact.source()),
        affected_count: impact.affected_count(),
        impacted: impact
            .impacted()
            .iter()
            .map(|node| ImpactedEntry {
                id: node.id,
                kind: node.id.kind(),
                name: graph.node(&node.id).map(cmdb_graph::Node::name),
                depth: node.depth,
            })
            .collect(),
    }
}
