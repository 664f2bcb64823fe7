//! Layered (Sugiyama-style) graph layout.
//!
//! The engine turns view nodes and edges into positioned nodes in four
//! explicit stages, each testable on its own:
//!
//! 1. [`acyclic`]: reverse DFS back edges so dependency cycles can be ranked
//! 2. [`rank`]: longest-path layering, then split long edges with virtual nodes
//! 3. [`order`]: barycenter sweeps to reduce crossings between adjacent ranks
//! 4. [`coords`]: convert (rank, order) into (x, y) using node sizes and gaps
//!
//! The result is deterministic: the same nodes and edges in the same order
//! always produce the same positions. It is readable, not crossing-minimal.
//!
//! Layout is independent of impact analysis. Impact flags ride along on the
//! view nodes and never influence placement.

mod acyclic;
mod coords;
mod order;
mod rank;

use crate::error::{Error, Result};
use crate::graph::{NodeId, NodeKind};
use crate::view::{ViewEdge, ViewNode};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Flow direction of the layout: where rank 0 sits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Rank 0 at the top
    #[default]
    TopToBottom,
    /// Rank 0 at the bottom
    BottomToTop,
    /// Rank 0 on the left
    LeftToRight,
    /// Rank 0 on the right
    RightToLeft,
}

impl Direction {
    /// Ranks are stacked vertically.
    #[must_use]
    pub fn is_vertical(self) -> bool {
        matches!(self, Self::TopToBottom | Self::BottomToTop)
    }

    /// Rank 0 is drawn last along the rank axis.
    #[must_use]
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
        };
        f.write_str(label)
    }
}

impl FromStr for Direction {
    type Err = Error;

    /// Accepts the long names and the short `TB`/`BT`/`LR`/`RL` forms.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tb" | "td" | "top-to-bottom" => Ok(Self::TopToBottom),
            "bt" | "bottom-to-top" => Ok(Self::BottomToTop),
            "lr" | "left-to-right" => Ok(Self::LeftToRight),
            "rl" | "right-to-left" => Ok(Self::RightToLeft),
            _ => Err(Error::Config(format!("unknown layout direction: {s:?}"))),
        }
    }
}

/// Width and height of a node box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f64,
    /// Vertical extent
    pub height: f64,
}

impl Size {
    /// Create a size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are finite and positive.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Default node box.
pub const DEFAULT_NODE_SIZE: Size = Size::new(172.0, 56.0);

/// Default gap between neighbors within a rank.
pub const DEFAULT_NODE_GAP: f64 = 40.0;

/// Default gap between ranks.
pub const DEFAULT_RANK_GAP: f64 = 80.0;

/// Default number of crossing-reduction sweeps.
pub const DEFAULT_MAX_SWEEPS: usize = 12;

/// Spacing and sizing constants for the layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutConfig {
    /// Box size for CI nodes (and services without an override)
    pub node_size: Size,
    /// Box size for service nodes, if different
    pub service_node_size: Option<Size>,
    /// Gap between neighbors within a rank
    pub node_gap: f64,
    /// Gap between adjacent ranks
    pub rank_gap: f64,
    /// Left and right margin
    pub margin_x: f64,
    /// Top and bottom margin
    pub margin_y: f64,
    /// Space reserved along a rank for each long edge passing through it
    pub virtual_node_width: f64,
    /// Upper bound on barycenter sweeps
    pub max_sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_size: DEFAULT_NODE_SIZE,
            service_node_size: None,
            node_gap: DEFAULT_NODE_GAP,
            rank_gap: DEFAULT_RANK_GAP,
            margin_x: 20.0,
            margin_y: 20.0,
            virtual_node_width: 8.0,
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

impl LayoutConfig {
    /// Box size for a node of the given kind.
    #[must_use]
    pub fn size_for(&self, kind: NodeKind) -> Size {
        match kind {
            NodeKind::Service => self.service_node_size.unwrap_or(self.node_size),
            NodeKind::Ci => self.node_size,
        }
    }

    /// Box size for a specific node: its own drawable size if set, else the
    /// size for its kind.
    #[must_use]
    pub fn size_of(&self, node: &ViewNode) -> Size {
        match node.size {
            Some(size) if size.is_drawable() => size,
            _ => self.size_for(node.kind),
        }
    }

    /// Check that every dimension is finite and non-negative, and that node
    /// boxes have a positive size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let sizes = [
            Some(("node-size", self.node_size)),
            self.service_node_size.map(|size| ("service-node-size", size)),
        ];
        for (field, size) in sizes.into_iter().flatten() {
            if !size.is_drawable() {
                return Err(Error::Config(format!(
                    "{field} must be positive, got {}x{}",
                    size.width, size.height
                )));
            }
        }

        let spacings = [
            ("node-gap", self.node_gap),
            ("rank-gap", self.rank_gap),
            ("margin-x", self.margin_x),
            ("margin-y", self.margin_y),
            ("virtual-node-width", self.virtual_node_width),
        ];
        for (field, value) in spacings {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::Config(format!(
                    "{field} must be a non-negative number, got {value}"
                )));
            }
        }

        Ok(())
    }
}

/// A view node with its computed placement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    /// The node's identity and view data
    #[serde(flatten)]
    pub node: ViewNode,
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Box width
    pub width: f64,
    /// Box height
    pub height: f64,
    /// Layer index (0 = sources)
    pub rank: usize,
    /// Position within the layer
    pub order: usize,
}

impl PositionedNode {
    /// Center point of the node box.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Diagnostics about a layout run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutStats {
    /// Number of ranks
    pub ranks: usize,
    /// Edges reversed to break cycles
    pub reversed_edges: usize,
    /// Virtual nodes inserted on long edges
    pub virtual_nodes: usize,
    /// Remaining edge crossings (counted on the normalized graph)
    pub crossings: usize,
    /// Barycenter sweeps performed
    pub sweeps: usize,
}

/// Positioned nodes plus the edges they connect.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LayoutResult {
    /// Positioned nodes in input order
    pub nodes: Vec<PositionedNode>,
    /// Edges, passed through unchanged
    pub edges: Vec<ViewEdge>,
    /// Drawing width including margins
    pub width: f64,
    /// Drawing height including margins
    pub height: f64,
    /// Run diagnostics
    pub stats: LayoutStats,
}

impl LayoutResult {
    /// Look up a positioned node by id.
    #[must_use]
    pub fn node(&self, id: &NodeId) -> Option<&PositionedNode> {
        self.nodes.iter().find(|node| node.node.id == *id)
    }
}

/// Layered layout engine.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    config: LayoutConfig,
}

impl LayoutEngine {
    /// Create an engine with the given constants.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration is invalid.
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The engine's configuration.
    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Position `nodes` in layers consistent with `edges`.
    ///
    /// Edges whose endpoints are not among `nodes`, self-loops, and repeated
    /// edges between the same pair do not affect placement, but every edge is
    /// passed through to the result unchanged.
    #[must_use]
    pub fn layout(&self, nodes: &[ViewNode], edges: &[ViewEdge], direction: Direction) -> LayoutResult {
        if nodes.is_empty() {
            return LayoutResult {
                edges: edges.to_vec(),
                ..LayoutResult::default()
            };
        }

        let index: HashMap<NodeId, usize> = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id, i))
            .collect();

        let mut seen = HashSet::new();
        let links: Vec<(usize, usize)> = edges
            .iter()
            .filter_map(|edge| Some((*index.get(&edge.source)?, *index.get(&edge.target)?)))
            .filter(|&(from, to)| from != to && seen.insert((from, to)))
            .collect();

        let (acyclic, reversed_edges) = acyclic::break_cycles(nodes.len(), &links);
        let ranks = rank::assign_ranks(nodes.len(), &acyclic);
        let layering = rank::normalize(nodes.len(), ranks, &acyclic);
        let ordering = order::order_ranks(&layering, self.config.max_sweeps);

        let sizes: Vec<Size> = nodes
            .iter()
            .map(|node| self.config.size_of(node))
            .collect();
        let coordinates =
            coords::assign_coordinates(&ordering.ranks, &layering, &sizes, direction, &self.config);

        let mut order_of = vec![0usize; layering.node_count()];
        for rank in &ordering.ranks {
            for (position, &node) in rank.iter().enumerate() {
                order_of[node] = position;
            }
        }

        let positioned = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let (x, y) = coordinates.positions[i];
                PositionedNode {
                    node: node.clone(),
                    x,
                    y,
                    width: sizes[i].width,
                    height: sizes[i].height,
                    rank: layering.ranks[i],
                    order: order_of[i],
                }
            })
            .collect();

        let stats = LayoutStats {
            ranks: layering.rank_count(),
            reversed_edges,
            virtual_nodes: layering.virtual_count(),
            crossings: ordering.crossings,
            sweeps: ordering.sweeps,
        };
        tracing::debug!(
            nodes = nodes.len(),
            edges = links.len(),
            ranks = stats.ranks,
            reversed = stats.reversed_edges,
            virtual_nodes = stats.virtual_nodes,
            crossings = stats.crossings,
            sweeps = stats.sweeps,
            %direction,
            "Computed layered layout"
        );

        LayoutResult {
            nodes: positioned,
            edges: edges.to_vec(),
            width: coordinates.width,
            height: coordinates.height,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("TB", Direction::TopToBottom)]
    #[case("top-to-bottom", Direction::TopToBottom)]
    #[case("lr", Direction::LeftToRight)]
    #[case("RL", Direction::RightToLeft)]
    #[case("bottom-to-top", Direction::BottomToTop)]
    fn direction_parses(#[case] text: &str, #[case] expected: Direction) {
        assert_eq!(text.parse::<Direction>().unwrap(), expected);
    }

    #[test]
    fn unknown_direction_is_a_config_error() {
        assert!(matches!("diagonal".parse::<Direction>(), Err(Error::Config(_))));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case(LayoutConfig { node_gap: -1.0, ..LayoutConfig::default() }, "node-gap")]
    #[case(LayoutConfig { rank_gap: f64::NAN, ..LayoutConfig::default() }, "rank-gap")]
    #[case(LayoutConfig { node_size: Size::new(0.0, 10.0), ..LayoutConfig::default() }, "node-size")]
    #[case(
        LayoutConfig { service_node_size: Some(Size::new(10.0, -5.0)), ..LayoutConfig::default() },
        "service-node-size"
    )]
    fn invalid_config_names_the_field(#[case] config: LayoutConfig, #[case] field: &str) {
        let error = LayoutEngine::new(config).unwrap_err();
        assert!(error.to_string().contains(field), "{error}");
    }

    #[test]
    fn service_size_override_applies_to_services_only() {
        let config = LayoutConfig {
            service_node_size: Some(Size::new(220.0, 70.0)),
            ..LayoutConfig::default()
        };

        assert_eq!(config.size_for(NodeKind::Service), Size::new(220.0, 70.0));
        assert_eq!(config.size_for(NodeKind::Ci), DEFAULT_NODE_SIZE);
    }

    #[test]
    fn node_size_override_wins_when_drawable() {
        let config = LayoutConfig::default();
        let node = ViewNode::from_node(&crate::graph::Node::Ci(
            crate::domain::ConfigurationItem::new(1, "db", "Database"),
        ));

        assert_eq!(config.size_of(&node), DEFAULT_NODE_SIZE);
        assert_eq!(
            config.size_of(&node.clone().with_size(Size::new(300.0, 40.0))),
            Size::new(300.0, 40.0)
        );
        assert_eq!(
            config.size_of(&node.with_size(Size::new(0.0, 40.0))),
            DEFAULT_NODE_SIZE
        );
    }

    #[test]
    fn config_deserializes_from_kebab_case_yaml_with_defaults() {
        let config: LayoutConfig = serde_yaml::from_str(
            "node-gap: 12\nservice-node-size:\n  width: 200\n  height: 60\n",
        )
        .unwrap();

        assert_eq!(config.node_gap, 12.0);
        assert_eq!(config.service_node_size, Some(Size::new(200.0, 60.0)));
        assert_eq!(config.rank_gap, DEFAULT_RANK_GAP);
    }
}
