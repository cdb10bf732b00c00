//! Static importance weighting from label keywords.

use crate::config::EngineConfig;
use crate::graph::TopologyGraph;

/// Assign per-node importance, parallel to the graph's node vector.
///
/// Keywords are tested in the config's fixed priority order (weight
/// descending, then keyword ascending); the first keyword contained in the
/// lowercased label wins. Labels matching nothing get the default weight.
pub fn assign(graph: &TopologyGraph, config: &EngineConfig) -> Vec<f64> {
    let priority = config.importance_priority();
    graph
        .nodes
        .iter()
        .map(|node| {
            let lower = node.label.to_lowercase();
            priority
                .iter()
                .find(|(keyword, _)| lower.contains(keyword.as_str()))
                .map(|(_, weight)| *weight)
                .unwrap_or(config.default_importance)
        })
        .collect()
}
