//! Common display utilities for CLI commands.

use cmdb_graph::{DependencyGraph, GraphWarning, NodeId};
use colored::Colorize;

use super::LoadWarning;

const MAX_DISPLAY_ITEMS: usize = 10;

/// Print load and graph warnings on stderr.
///
/// Shows up to `MAX_DISPLAY_ITEMS` of each kind, then a count of the rest.
pub fn print_warnings(load: &[LoadWarning], graph: &[GraphWarning]) {
    print_truncated_warnings(load);
    print_truncated_warnings(graph);
}

fn print_truncated_warnings<W: std::fmt::Display>(warnings: &[W]) {
    for warning in warnings.iter().take(MAX_DISPLAY_ITEMS) {
        eprintln!("{}: {warning}", "warning".yellow().bold());
    }
    if warnings.len() > MAX_DISPLAY_ITEMS {
        eprintln!(
            "{}: ... and {} more",
            "warning".yellow().bold(),
            warnings.len() - MAX_DISPLAY_ITEMS
        );
    }
}

/// Human-readable label for a node: its name and id.
pub fn node_label(graph: &DependencyGraph, id: &NodeId) -> String {
    match graph.node(id) {
        Some(node) => format!("{} ({id})", node.name()),
        None => id.to_string(),
    }
}

/// Display a list of nodes with optional truncation.
///
/// Shows up to `MAX_DISPLAY_ITEMS` nodes with bullet points. If there are
/// more, shows "... and N more". If empty, shows the provided `empty_message`.
pub fn print_nodes<'a>(
    graph: &DependencyGraph,
    nodes: impl ExactSizeIterator<Item = (&'a NodeId, usize)>,
    empty_message: &str,
) {
    let total = nodes.len();
    if total == 0 {
        println!("    {}", empty_message.dimmed());
        return;
    }

    for (id, depth) in nodes.take(MAX_DISPLAY_ITEMS) {
        println!(
            "    {} {} {}",
            "•".dimmed(),
            node_label(graph, id),
            format!("[depth {depth}]").dimmed()
        );
    }

    if total > MAX_DISPLAY_ITEMS {
        println!(
            "    {} ... and {} more",
            "•".dimmed(),
            total - MAX_DISPLAY_ITEMS
        );
    }
}
