//! `cmdb layout` command implementation.

use anyhow::{Context as _, Result};
use cmdb_graph::{Direction, LayoutResult, Pipeline};
use colored::Colorize;

use super::display::print_warnings;
use super::output::print_json;
use super::{parse_node_id, Context};

/// Run the layout command.
pub fn run(ctx: &Context, source: Option<&str>, direction: Option<&str>) -> Result<()> {
    let source = source.map(parse_node_id).transpose()?;

    let mut config = ctx.config.clone();
    if let Some(direction) = direction {
        config.direction = direction
            .parse::<Direction>()
            .context("invalid --direction")?;
    }

    let pipeline = Pipeline::new(config)?;
    let output = pipeline.run(ctx.snapshot.records(), source.as_ref());
    print_warnings(&ctx.load_warnings, output.graph.warnings());

    if ctx.output.json {
        return print_json(&output.layout);
    }

    print_layout(&output.layout, pipeline.config().direction);
    Ok(())
}

fn print_layout(layout: &LayoutResult, direction: Direction) {
    println!(
        "{} ({direction}, {:.0} x {:.0})",
        "Layout".cyan().bold(),
        layout.width,
        layout.height
    );
    println!();

    if layout.nodes.is_empty() {
        println!("  {}", "(empty graph)".dimmed());
        return;
    }

    let mut nodes: Vec<_> = layout.nodes.iter().collect();
    nodes.sort_by_key(|node| (node.rank, node.order));

    let mut current_rank = None;
    for node in nodes {
        if current_rank != Some(node.rank) {
            current_rank = Some(node.rank);
            println!("  {} {}:", "Rank".white().bold(), node.rank);
        }

        let label = format!("{} ({})", node.node.label, node.node.id);
        let label = if node.node.is_source {
            label.red().bold()
        } else if node.node.is_impacted {
            label.yellow()
        } else {
            label.normal()
        };
        println!(
            "    {} {label} {}",
            "•".dimmed(),
            format!("at ({:.0}, {:.0})", node.x, node.y).dimmed()
        );
    }
    println!();

    let stats = layout.stats;
    println!(
        "  {}: {} ranks, {} crossings, {} reversed edges, {} virtual nodes",
        "Stats".white().bold(),
        stats.ranks,
        stats.crossings,
        stats.reversed_edges,
        stats.virtual_nodes
    );
}
