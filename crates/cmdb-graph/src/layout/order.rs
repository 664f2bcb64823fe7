//! Ordering within ranks: barycenter crossing reduction.
//!
//! Each sweep reorders one rank at a time by the mean position of each
//! node's neighbors in the adjacent, already-ordered rank: top-down using
//! predecessors, then bottom-up using successors. Nodes without neighbors
//! in the reference rank keep their current position as their key, and the
//! sort is stable, so ties never reshuffle nodes. The best ordering seen
//! (fewest crossings) is kept.

use super::rank::Layering;

/// Result of crossing reduction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Ordering {
    /// `ranks[r]` lists the nodes of rank `r` from first to last
    pub ranks: Vec<Vec<usize>>,
    /// Edge crossings in the chosen ordering
    pub crossings: usize,
    /// Sweeps performed (one sweep = down pass + up pass)
    pub sweeps: usize,
}

/// Order nodes within their ranks.
///
/// The initial order is node index order, which is the caller's input
/// order with virtual nodes last.
pub(super) fn order_ranks(layering: &Layering, max_sweeps: usize) -> Ordering {
    let node_count = layering.node_count();
    let mut ranks: Vec<Vec<usize>> = vec![Vec::new(); layering.rank_count()];
    for node in 0..node_count {
        ranks[layering.ranks[node]].push(node);
    }

    let mut predecessors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for &(from, to) in &layering.segments {
        successors[from].push(to);
        predecessors[to].push(from);
    }

    let mut best_crossings = total_crossings(&ranks, &successors, node_count);
    let mut best = ranks.clone();
    let mut sweeps = 0;

    while sweeps < max_sweeps && best_crossings > 0 {
        sweeps += 1;

        for r in 1..ranks.len() {
            reorder(&mut ranks, r, r - 1, &predecessors, node_count);
        }
        for r in (0..ranks.len().saturating_sub(1)).rev() {
            reorder(&mut ranks, r, r + 1, &successors, node_count);
        }

        let crossings = total_crossings(&ranks, &successors, node_count);
        if crossings < best_crossings {
            best_crossings = crossings;
            best.clone_from(&ranks);
        } else {
            break;
        }
    }

    Ordering {
        ranks: best,
        crossings: best_crossings,
        sweeps,
    }
}

/// Sort rank `target` by barycenter relative to rank `reference`.
#[allow(clippy::cast_precision_loss)]
fn reorder(
    ranks: &mut [Vec<usize>],
    target: usize,
    reference: usize,
    neighbors: &[Vec<usize>],
    node_count: usize,
) {
    let position = positions(&ranks[reference], node_count);

    let mut keyed: Vec<(f64, usize)> = ranks[target]
        .iter()
        .enumerate()
        .map(|(current, &node)| {
            let placed: Vec<usize> = neighbors[node]
                .iter()
                .filter_map(|&n| position[n])
                .collect();
            let key = if placed.is_empty() {
                current as f64
            } else {
                placed.iter().sum::<usize>() as f64 / placed.len() as f64
            };
            (key, node)
        })
        .collect();

    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranks[target] = keyed.into_iter().map(|(_, node)| node).collect();
}

/// Position of each node within `rank`, `None` for nodes elsewhere.
fn positions(rank: &[usize], node_count: usize) -> Vec<Option<usize>> {
    let mut position = vec![None; node_count];
    for (index, &node) in rank.iter().enumerate() {
        position[node] = Some(index);
    }
    position
}

/// Total crossings over all adjacent rank pairs.
pub(super) fn total_crossings(
    ranks: &[Vec<usize>],
    successors: &[Vec<usize>],
    node_count: usize,
) -> usize {
    ranks
        .windows(2)
        .map(|pair| count_crossings(&pair[0], &pair[1], successors, node_count))
        .sum()
}

/// Count crossings between two adjacent ranks.
///
/// Edges are sorted by upper position, then lower position; a crossing is
/// an inversion in the lower positions, counted with a Fenwick tree in
/// O(E log V).
fn count_crossings(
    upper: &[usize],
    lower: &[usize],
    successors: &[Vec<usize>],
    node_count: usize,
) -> usize {
    let lower_position = positions(lower, node_count);

    let mut edges: Vec<(usize, usize)> = Vec::new();
    for (upper_index, &node) in upper.iter().enumerate() {
        for &next in &successors[node] {
            if let Some(lower_index) = lower_position[next] {
                edges.push((upper_index, lower_index));
            }
        }
    }
    edges.sort_unstable();

    let mut tree = vec![0usize; lower.len() + 1];
    let mut inserted = 0usize;
    let mut crossings = 0usize;

    for &(_, lower_index) in &edges {
        // edges already inserted that land strictly right of this one
        let mut at_or_before = 0usize;
        let mut i = lower_index + 1;
        while i > 0 {
            at_or_before += tree[i];
            i &= i - 1;
        }
        crossings += inserted - at_or_before;

        let mut i = lower_index + 1;
        while i < tree.len() {
            tree[i] += 1;
            i += i & i.wrapping_neg();
        }
        inserted += 1;
    }

    crossings
}
