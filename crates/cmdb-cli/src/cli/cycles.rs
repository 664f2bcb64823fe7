//! `cmdb cycles` command implementation.

use anyhow::Result;
use colored::Colorize;

use super::display::node_label;
use super::output::print_json;
use super::Context;

/// Run the cycles command.
pub fn run(ctx: &Context) -> Result<()> {
    let graph = ctx.build_graph();
    let cycles = graph.dependency_cycles();

    if ctx.output.json {
        return print_json(&cycles);
    }

    if cycles.is_empty() {
        println!("{}", "No circular dependencies detected.".green());
        return Ok(());
    }

    println!(
        "Found {} circular dependencies:",
        cycles.len().to_string().red().bold()
    );
    println!();

    for (i, cycle) in cycles.iter().enumerate() {
        let members = cycle
            .iter()
            .map(|id| node_label(&graph, id))
            .collect::<Vec<_>>()
            .join(", ");
        let relation = if cycle.len() == 1 {
            "depends on itself"
        } else {
            "depend on each other"
        };

        println!("  {} {}:", "Cycle".yellow().bold(), i + 1);
        println!("    {} {}", members.dimmed(), relation);
    }

    Ok(())
}
