//! Blast-radius proximity computation.
//!
//! Forward BFS from each entry node; a node's proximity is
//! `exp(-beta * hops)` to its nearest entry. The closest entry wins when a
//! node is reachable from several.

use crate::graph::TopologyGraph;

/// Compute per-node proximity, parallel to the graph's node vector.
///
/// Unreachable nodes keep 0.0; each entry node itself gets 1.0.
pub fn compute(graph: &TopologyGraph, entries: &[usize], beta: f64) -> Vec<f64> {
    let mut proximity = vec![0.0; graph.node_count()];

    for &entry in entries {
        let distances = graph.bfs_distances(entry);
        for (node, dist) in distances.iter().enumerate() {
            if let Some(d) = dist {
                let decayed = (-beta * *d as f64).exp();
                if decayed > proximity[node] {
                    proximity[node] = decayed;
                }
            }
        }
    }

    proximity
}
