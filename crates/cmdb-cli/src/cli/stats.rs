//! `cmdb stats` command implementation.

use std::collections::BTreeMap;

use anyhow::Result;
use cmdb_graph::{EdgeKind, Node};
use colored::Colorize;
use serde::Serialize;

use super::output::print_json;
use super::Context;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Stats {
    records: RecordCounts,
    services: usize,
    cis: usize,
    cis_by_type: BTreeMap<String, usize>,
    edges_by_kind: BTreeMap<&'static str, usize>,
    dependency_cycles: usize,
    load_warnings: usize,
    graph_warnings: usize,
}

#[derive(Serialize)]
struct RecordCounts {
    services: usize,
    cis: usize,
    mappings: usize,
    relationships: usize,
}

fn edge_kind_name(kind: EdgeKind) -> &'static str {
    match kind {
        EdgeKind::ServiceUsesCi => "ServiceUsesCi",
        EdgeKind::CiDependsOn => "CiDependsOn",
        EdgeKind::CiAssociation => "CiAssociation",
    }
}

/// Run the stats command.
pub fn run(ctx: &Context) -> Result<()> {
    let graph = ctx.build_graph();
    let snapshot = &ctx.snapshot;

    let mut services = 0usize;
    let mut cis_by_type: BTreeMap<String, usize> = BTreeMap::new();
    for node in graph.nodes() {
        match node {
            Node::Service(_) => services += 1,
            Node::Ci(ci) => *cis_by_type.entry(ci.ci_type.to_string()).or_default() += 1,
        }
    }

    let mut edges_by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for edge in graph.edges() {
        *edges_by_kind.entry(edge_kind_name(edge.kind)).or_default() += 1;
    }

    let stats = Stats {
        records: RecordCounts {
            services: snapshot.services.len(),
            cis: snapshot.cis.len(),
            mappings: snapshot.mappings.len(),
            relationships: snapshot.relationships.len(),
        },
        services,
        cis: cis_by_type.values().sum(),
        cis_by_type,
        edges_by_kind,
        dependency_cycles: graph.dependency_cycles().len(),
        load_warnings: ctx.load_warnings.len(),
        graph_warnings: graph.warnings().len(),
    };

    if ctx.output.json {
        return print_json(&stats);
    }

    print_stats(&stats);
    Ok(())
}

fn print_stats(stats: &Stats) {
    println!("{}", "CMDB Snapshot Statistics".cyan().bold());
    println!();

    let records = &stats.records;
    println!(
        "  {}: {} services, {} CIs, {} mappings, {} relationships",
        "Records".white().bold(),
        records.services,
        records.cis,
        records.mappings,
        records.relationships
    );
    println!();

    println!(
        "  {}: {} services, {} CIs",
        "Graph nodes".white().bold(),
        stats.services.to_string().green(),
        stats.cis.to_string().green()
    );
    // Sort by count descending, then by type for deterministic output
    let mut by_type: Vec<_> = stats.cis_by_type.iter().collect();
    by_type.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    for (ci_type, count) in by_type {
        println!("    {}: {count}", ci_type.dimmed());
    }
    println!();

    let total_edges: usize = stats.edges_by_kind.values().sum();
    println!(
        "  {}: {} total",
        "Graph edges".white().bold(),
        total_edges.to_string().green()
    );
    for (kind, count) in &stats.edges_by_kind {
        println!("    {}: {count}", kind.dimmed());
    }
    println!();

    let cycles = if stats.dependency_cycles == 0 {
        "0".green()
    } else {
        stats.dependency_cycles.to_string().yellow()
    };
    println!("  {}: {cycles}", "Dependency cycles".white().bold());

    if stats.load_warnings > 0 || stats.graph_warnings > 0 {
        println!();
        println!(
            "  {}: {} skipped lines, {} dangling or duplicate records",
            "Warning".yellow().bold(),
            stats.load_warnings.to_string().yellow(),
            stats.graph_warnings.to_string().yellow()
        );
    }
}
