//! Cycle breaking before rank assignment.
//!
//! `CiDependsOn` edges may form cycles, which have no valid layering. A
//! depth-first search in input order finds back edges (edges into a node
//! that is still on the DFS stack); reversing exactly those edges leaves an
//! acyclic graph. The reversal only affects ranking, the caller's edges are
//! never modified.

/// DFS visitation state of a node.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    OnStack,
    Done,
}

/// Return the edge list with every DFS back edge reversed, plus the number
/// of reversed edges.
///
/// Self-loops must already be removed. Roots are tried in node index order
/// and outgoing edges in input order, so the result is deterministic.
pub(super) fn break_cycles(node_count: usize, edges: &[(usize, usize)]) -> (Vec<(usize, usize)>, usize) {
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); node_count];
    for (index, &(from, _)) in edges.iter().enumerate() {
        outgoing[from].push(index);
    }

    let mut state = vec![Visit::New; node_count];
    let mut reversed = vec![false; edges.len()];

    for root in 0..node_count {
        if state[root] != Visit::New {
            continue;
        }

        // (node, position in its outgoing list)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        state[root] = Visit::OnStack;

        while let Some(frame) = stack.last_mut() {
            let (node, cursor) = *frame;
            let Some(&edge) = outgoing[node].get(cursor) else {
                state[node] = Visit::Done;
                stack.pop();
                continue;
            };
            frame.1 += 1;

            let next = edges[edge].1;
            match state[next] {
                Visit::New => {
                    state[next] = Visit::OnStack;
                    stack.push((next, 0));
                }
                Visit::OnStack => reversed[edge] = true,
                Visit::Done => {}
            }
        }
    }

    let count = reversed.iter().filter(|&&r| r).count();
    let acyclic = edges
        .iter()
        .zip(&reversed)
        .map(|(&(from, to), &flip)| if flip { (to, from) } else { (from, to) })
        .collect();

    (acyclic, count)
}
