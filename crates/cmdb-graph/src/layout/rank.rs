//! Rank (layer) assignment and long-edge normalization.

use std::collections::VecDeque;

/// Assign ranks by longest-path layering.
///
/// Nodes without predecessors get rank 0; every other node gets one more
/// than its highest-ranked predecessor, so `rank[to] > rank[from]` for every
/// edge. `edges` must be acyclic.
pub(super) fn assign_ranks(node_count: usize, edges: &[(usize, usize)]) -> Vec<usize> {
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    let mut in_degree = vec![0usize; node_count];
    for &(from, to) in edges {
        successors[from].push(to);
        in_degree[to] += 1;
    }

    let mut ranks = vec![0usize; node_count];
    let mut queue: VecDeque<usize> = (0..node_count).filter(|&n| in_degree[n] == 0).collect();
    let mut processed = 0usize;

    while let Some(node) = queue.pop_front() {
        processed += 1;
        for &next in &successors[node] {
            ranks[next] = ranks[next].max(ranks[node] + 1);
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    debug_assert_eq!(processed, node_count, "rank assignment requires a DAG");
    ranks
}

/// The layered graph after long edges are split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Layering {
    /// Rank of every node; real nodes first, then virtual nodes
    pub ranks: Vec<usize>,
    /// Edges that each span exactly one rank
    pub segments: Vec<(usize, usize)>,
    /// Number of real (caller-supplied) nodes
    pub real_count: usize,
}

impl Layering {
    /// Total nodes including virtual ones.
    pub fn node_count(&self) -> usize {
        self.ranks.len()
    }

    /// Number of ranks.
    pub fn rank_count(&self) -> usize {
        self.ranks.iter().max().map_or(0, |&max| max + 1)
    }

    /// Number of virtual nodes inserted.
    pub fn virtual_count(&self) -> usize {
        self.ranks.len() - self.real_count
    }

    /// Returns `true` if `node` is a virtual placeholder.
    pub fn is_virtual(&self, node: usize) -> bool {
        node >= self.real_count
    }
}

/// Split every edge spanning more than one rank into a chain of unit-span
/// segments through new virtual nodes.
pub(super) fn normalize(real_count: usize, mut ranks: Vec<usize>, edges: &[(usize, usize)]) -> Layering {
    let mut segments = Vec::with_capacity(edges.len());

    for &(from, to) in edges {
        let (from_rank, to_rank) = (ranks[from], ranks[to]);
        let mut previous = from;
        for rank in (from_rank + 1)..to_rank {
            let virtual_node = ranks.len();
            ranks.push(rank);
            segments.push((previous, virtual_node));
            previous = virtual_node;
        }
        segments.push((previous, to));
    }

    Layering {
        ranks,
        segments,
        real_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sources_start_at_rank_zero() {
        let ranks = assign_ranks(4, &[(0, 1), (2, 1), (1, 3)]);

        assert_eq!(ranks, vec![0, 1, 0, 2]);
    }

    #[test]
    fn longest_path_wins() {
        // 0 -> 1 -> 2 and 0 -> 2 directly
        let ranks = assign_ranks(3, &[(0, 2), (0, 1), (1, 2)]);

        assert_eq!(ranks, vec![0, 1, 2]);
    }

    #[test]
    fn isolated_nodes_sit_on_rank_zero() {
        assert_eq!(assign_ranks(3, &[]), vec![0, 0, 0]);
    }

    #[test]
    fn long_edges_get_virtual_nodes() {
        let edges = [(0, 1), (1, 2), (0, 2)];
        let ranks = assign_ranks(3, &edges);

        let layering = normalize(3, ranks, &edges);

        assert_eq!(layering.virtual_count(), 1);
        assert_eq!(layering.ranks[3], 1);
        assert!(layering.is_virtual(3));
        assert!(layering.segments.contains(&(0, 3)));
        assert!(layering.segments.contains(&(3, 2)));
        assert!(layering
            .segments
            .iter()
            .all(|&(a, b)| layering.ranks[b] == layering.ranks[a] + 1));
    }

    #[test]
    fn rank_count_of_empty_layering() {
        let layering = normalize(0, Vec::new(), &[]);
        assert_eq!(layering.rank_count(), 0);
        assert_eq!(layering.node_count(), 0);
    }
}
