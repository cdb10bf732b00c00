//! Minimal-hop attack path extraction.
//!
//! For each (entry, critical) pair, every shortest directed path is
//! enumerated, not just one: equally short alternatives are independent
//! exploitation routes of equal cost. BFS layering restricts the search to
//! edges that advance the hop distance by exactly one, so every enumerated
//! path is simple and minimal by construction.

use crate::graph::TopologyGraph;
use crate::types::AttackPath;

/// Enumerate all minimal-hop paths for every entry/critical pair.
///
/// Pairs with no directed path are skipped silently. Output is ordered by
/// entry id, then critical id, then lexicographic node-id sequence.
pub fn extract(graph: &TopologyGraph, entries: &[usize], criticals: &[usize]) -> Vec<AttackPath> {
    let mut paths = Vec::new();

    for &entry in entries {
        let distances = graph.bfs_distances(entry);
        for &critical in criticals {
            if distances[critical].is_none() {
                continue;
            }
            let mut pair_paths = enumerate_shortest(graph, &distances, entry, critical);
            pair_paths.sort();
            for indices in pair_paths {
                paths.push(to_attack_path(graph, &indices, entry, critical));
            }
        }
    }

    paths
}

/// DFS over the BFS-layered DAG: only edges with `dist[v] == dist[u] + 1`
/// are followed, so every root-to-target walk is a shortest path.
fn enumerate_shortest(
    graph: &TopologyGraph,
    distances: &[Option<usize>],
    entry: usize,
    critical: usize,
) -> Vec<Vec<String>> {
    let mut results = Vec::new();
    let mut current = vec![entry];
    walk(graph, distances, critical, &mut current, &mut results);
    results
}

fn walk(
    graph: &TopologyGraph,
    distances: &[Option<usize>],
    critical: usize,
    current: &mut Vec<usize>,
    results: &mut Vec<Vec<String>>,
) {
    let node = *current.last().unwrap_or(&critical);
    if node == critical {
        results.push(current.iter().map(|&i| graph.nodes[i].id.clone()).collect());
        return;
    }

    let next_depth = distances[node].map(|d| d + 1);
    for &target in &graph.adjacency[node] {
        if distances[target] == next_depth {
            current.push(target);
            walk(graph, distances, critical, current, results);
            current.pop();
        }
    }
}

fn to_attack_path(
    graph: &TopologyGraph,
    node_ids: &[String],
    entry: usize,
    critical: usize,
) -> AttackPath {
    let labels = node_ids
        .iter()
        .map(|id| {
            graph
                .node_index
                .get(id)
                .map(|&i| graph.nodes[i].label.clone())
                .unwrap_or_default()
        })
        .collect();
    AttackPath {
        node_ids: node_ids.to_vec(),
        labels,
        entry_node: graph.nodes[entry].id.clone(),
        critical_node: graph.nodes[critical].id.clone(),
        hops: node_ids.len().saturating_sub(1),
    }
}
