//! In-memory topology graph built from the diagram descriptor.
//!
//! Converts `NodeDescriptor`/`EdgeDescriptor` records into a compact
//! adjacency list with dense indices for cache-friendly traversal.

use std::collections::{HashMap, VecDeque};

use chainsight_core::types::TopologyDescriptor;

use crate::error::{EngineError, Result};

/// Compact node metadata stored in the in-memory graph.
#[derive(Debug, Clone)]
pub struct TopologyNode {
    /// Dense index (0..N-1) for O(1) lookup.
    pub index: usize,
    /// Original node id from the diagram.
    pub id: String,
    /// Display label ("unknown" when the diagram omitted it).
    pub label: String,
}

/// Directed topology graph with adjacency-list storage.
#[derive(Debug)]
pub struct TopologyGraph {
    /// All nodes, indexed by dense index.
    pub nodes: Vec<TopologyNode>,
    /// `adjacency[i]` = target indices of outgoing edges from node `i`.
    pub adjacency: Vec<Vec<usize>>,
    /// `in_degree[i]` = number of incoming edges at node `i`.
    pub in_degree: Vec<usize>,
    /// Map from original node id → dense index.
    pub node_index: HashMap<String, usize>,
}

impl TopologyGraph {
    /// Build from a topology descriptor.
    ///
    /// Duplicate node ids are rejected: a diagram export that repeats an id
    /// is corrupt and silently overwriting would hide it. Edges referencing
    /// unknown node ids are skipped with a warning.
    pub fn from_descriptor(descriptor: &TopologyDescriptor) -> Result<Self> {
        let mut node_index = HashMap::with_capacity(descriptor.nodes.len());
        let mut nodes = Vec::with_capacity(descriptor.nodes.len());

        for (i, record) in descriptor.nodes.iter().enumerate() {
            if node_index.insert(record.id.clone(), i).is_some() {
                return Err(EngineError::DuplicateNode {
                    node_id: record.id.clone(),
                });
            }
            nodes.push(TopologyNode {
                index: i,
                id: record.id.clone(),
                label: record.label.clone(),
            });
        }

        let mut adjacency = vec![Vec::new(); nodes.len()];
        let mut in_degree = vec![0usize; nodes.len()];

        for edge in &descriptor.edges {
            match (node_index.get(&edge.source), node_index.get(&edge.target)) {
                (Some(&src), Some(&tgt)) => {
                    adjacency[src].push(tgt);
                    in_degree[tgt] += 1;
                }
                _ => {
                    tracing::warn!(
                        source = %edge.source,
                        target = %edge.target,
                        "edge references unknown node id, skipping"
                    );
                }
            }
        }

        Ok(Self {
            nodes,
            adjacency,
            in_degree,
            node_index,
        })
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|targets| targets.len()).sum()
    }

    /// Forward BFS hop distances from `start`. `None` = unreachable.
    pub fn bfs_distances(&self, start: usize) -> Vec<Option<usize>> {
        let mut dist = vec![None; self.node_count()];
        dist[start] = Some(0);

        let mut queue = VecDeque::new();
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            let d = dist[node].unwrap_or(0);
            for &target in &self.adjacency[node] {
                if dist[target].is_none() {
                    dist[target] = Some(d + 1);
                    queue.push_back(target);
                }
            }
        }

        dist
    }

    /// Resolve node ids to dense indices, dropping ids absent from the
    /// graph with a warning. Output is deduplicated and ordered by node id
    /// so callers iterate deterministically.
    pub fn resolve_ids(&self, ids: &[String]) -> Vec<usize> {
        let mut indices: Vec<usize> = ids
            .iter()
            .filter_map(|id| {
                let idx = self.node_index.get(id).copied();
                if idx.is_none() {
                    tracing::warn!(node_id = %id, "node id not present in topology, skipping");
                }
                idx
            })
            .collect();
        self.sort_by_node_id(&mut indices);
        indices
    }

    /// Order dense indices by their node id and drop duplicates. Duplicate
    /// ids share an index, so they end up adjacent and `dedup` removes them.
    pub fn sort_by_node_id(&self, indices: &mut Vec<usize>) {
        indices.sort_by(|&a, &b| self.nodes[a].id.cmp(&self.nodes[b].id));
        indices.dedup();
    }
}
