//! Coordinate assignment: (rank, order) to (x, y).
//!
//! Two axes are involved. The *rank axis* runs across ranks (y for vertical
//! layouts, x for horizontal ones) and the *order axis* runs along a rank.
//! Each rank is as thick as its thickest node, with nodes centered within
//! it. Along the order axis nodes are packed with a fixed gap and each rank
//! is centered against the longest one. Virtual nodes take up
//! `virtual_node_width` along the order axis so long edges keep clear of
//! real nodes, but they are never emitted.

use super::rank::Layering;
use super::{Direction, LayoutConfig, Size};

/// Top-left positions of real nodes plus the overall drawing size.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Coordinates {
    /// `(x, y)` of each real node, indexed like the input nodes
    pub positions: Vec<(f64, f64)>,
    /// Drawing width including margins
    pub width: f64,
    /// Drawing height including margins
    pub height: f64,
}

#[allow(clippy::cast_precision_loss)]
pub(super) fn assign_coordinates(
    ranks: &[Vec<usize>],
    layering: &Layering,
    sizes: &[Size],
    direction: Direction,
    config: &LayoutConfig,
) -> Coordinates {
    let vertical = direction.is_vertical();

    let extent = |node: usize| -> f64 {
        if layering.is_virtual(node) {
            config.virtual_node_width
        } else if vertical {
            sizes[node].width
        } else {
            sizes[node].height
        }
    };
    let thickness = |node: usize| -> f64 {
        if layering.is_virtual(node) {
            0.0
        } else if vertical {
            sizes[node].height
        } else {
            sizes[node].width
        }
    };

    let rank_lengths: Vec<f64> = ranks
        .iter()
        .map(|rank| {
            let nodes: f64 = rank.iter().map(|&node| extent(node)).sum();
            nodes + config.node_gap * rank.len().saturating_sub(1) as f64
        })
        .collect();
    let longest = rank_lengths.iter().copied().fold(0.0_f64, f64::max);

    let rank_thickness: Vec<f64> = ranks
        .iter()
        .map(|rank| rank.iter().map(|&node| thickness(node)).fold(0.0_f64, f64::max))
        .collect();

    // Offsets along the rank axis, in drawing order
    let mut rank_offsets = vec![0.0; ranks.len()];
    let mut cursor = 0.0;
    for step in 0..ranks.len() {
        let r = if direction.is_reversed() {
            ranks.len() - 1 - step
        } else {
            step
        };
        rank_offsets[r] = cursor;
        cursor += rank_thickness[r] + config.rank_gap;
    }
    let rank_span = if ranks.is_empty() {
        0.0
    } else {
        cursor - config.rank_gap
    };

    let mut positions = vec![(0.0, 0.0); layering.real_count];
    for (r, rank) in ranks.iter().enumerate() {
        let mut along = (longest - rank_lengths[r]) / 2.0;
        for &node in rank {
            if !layering.is_virtual(node) {
                let across = rank_offsets[r] + (rank_thickness[r] - thickness(node)) / 2.0;
                let (x, y) = if vertical {
                    (along, across)
                } else {
                    (across, along)
                };
                positions[node] = (config.margin_x + x, config.margin_y + y);
            }
            along += extent(node) + config.node_gap;
        }
    }

    let (content_width, content_height) = if vertical {
        (longest, rank_span)
    } else {
        (rank_span, longest)
    };

    Coordinates {
        positions,
        width: content_width + 2.0 * config.margin_x,
        height: content_height + 2.0 * config.margin_y,
    }
}
