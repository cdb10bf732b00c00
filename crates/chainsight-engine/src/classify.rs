//! Entry and critical node classification.
//!
//! Explicit id lists from the caller always win; auto-detection only runs
//! for a list the caller left out.

use crate::graph::TopologyGraph;

/// Resolved entry and critical node indices, deduplicated and ordered by
/// node id.
#[derive(Debug, Clone)]
pub struct Classification {
    pub entries: Vec<usize>,
    pub criticals: Vec<usize>,
}

/// Resolve both node sets.
///
/// Empty results are a valid outcome: with no entries every proximity (and
/// so every risk score) collapses to zero, and with no criticals there are
/// no attack paths. Neither is an error.
pub fn resolve(
    graph: &TopologyGraph,
    explicit_entries: Option<&[String]>,
    explicit_criticals: Option<&[String]>,
    entry_keywords: &[String],
    critical_keywords: &[String],
) -> Classification {
    let entries = match explicit_entries {
        Some(ids) => graph.resolve_ids(ids),
        None => detect_entries(graph, entry_keywords),
    };
    let criticals = match explicit_criticals {
        Some(ids) => graph.resolve_ids(ids),
        None => detect_criticals(graph, critical_keywords),
    };

    if entries.is_empty() {
        tracing::warn!("no entry nodes resolved; all proximities will be zero");
    }
    if criticals.is_empty() {
        tracing::warn!("no critical nodes resolved; no attack paths will be produced");
    }

    Classification { entries, criticals }
}

/// Entry nodes: zero in-degree, or an entry keyword in the label.
pub fn detect_entries(graph: &TopologyGraph, keywords: &[String]) -> Vec<usize> {
    let mut entries: Vec<usize> = graph
        .nodes
        .iter()
        .filter(|n| graph.in_degree[n.index] == 0 || label_matches(&n.label, keywords))
        .map(|n| n.index)
        .collect();
    graph.sort_by_node_id(&mut entries);
    entries
}

/// Critical nodes: a critical keyword in the label.
pub fn detect_criticals(graph: &TopologyGraph, keywords: &[String]) -> Vec<usize> {
    let mut criticals: Vec<usize> = graph
        .nodes
        .iter()
        .filter(|n| label_matches(&n.label, keywords))
        .map(|n| n.index)
        .collect();
    graph.sort_by_node_id(&mut criticals);
    criticals
}

fn label_matches(label: &str, keywords: &[String]) -> bool {
    let lower = label.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use chainsight_core::types::{EdgeDescriptor, NodeDescriptor, TopologyDescriptor};

    fn graph(nodes: &[(&str, &str)], edges: &[(&str, &str)]) -> TopologyGraph {
        let desc = TopologyDescriptor {
            nodes: nodes
                .iter()
                .map(|(id, label)| NodeDescriptor {
                    id: id.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            edges: edges
                .iter()
                .map(|(s, t)| EdgeDescriptor {
                    source: s.to_string(),
                    target: t.to_string(),
                })
                .collect(),
        };
        TopologyGraph::from_descriptor(&desc).unwrap()
    }

    #[test]
    fn test_zero_indegree_and_keyword_union() {
        let config = EngineConfig::default();
        // "scanner" has zero in-degree but no keyword; "web-frontend" has a
        // keyword and an incoming edge; "db" is neither.
        let g = graph(
            &[("s", "scanner"), ("w", "web-frontend"), ("d", "db-primary")],
            &[("s", "w"), ("w", "d")],
        );
        let entries = detect_entries(&g, &config.entry_keywords);
        assert_eq!(entries, vec![0, 1]);
    }

    #[test]
    fn test_critical_keyword_detection() {
        let config = EngineConfig::default();
        let g = graph(
            &[("a", "web"), ("b", "redis-cache"), ("c", "Admin-UI")],
            &[("a", "b"), ("a", "c")],
        );
        let criticals = detect_criticals(&g, &config.critical_keywords);
        assert_eq!(criticals, vec![1, 2]);
    }

    #[test]
    fn test_explicit_lists_skip_detection() {
        let config = EngineConfig::default();
        let g = graph(&[("a", "web"), ("b", "db")], &[("a", "b")]);
        let entries = vec!["b".to_string()];
        let criticals = vec!["a".to_string()];
        let c = resolve(
            &g,
            Some(&entries),
            Some(&criticals),
            &config.entry_keywords,
            &config.critical_keywords,
        );
        assert_eq!(c.entries, vec![1]);
        assert_eq!(c.criticals, vec![0]);
    }

    #[test]
    fn test_detected_sets_ordered_by_node_id() {
        let config = EngineConfig::default();
        // Descriptor lists the "z" nodes first; output must be id-ordered.
        let g = graph(
            &[("z1", "web-two"), ("a1", "web-one"), ("z0", "db-two"), ("a0", "db-one")],
            &[],
        );
        let entries = detect_entries(&g, &config.entry_keywords);
        let entry_ids: Vec<&str> = entries.iter().map(|&i| g.nodes[i].id.as_str()).collect();
        assert_eq!(entry_ids, vec!["a0", "a1", "z0", "z1"]);

        let criticals = detect_criticals(&g, &config.critical_keywords);
        let critical_ids: Vec<&str> = criticals.iter().map(|&i| g.nodes[i].id.as_str()).collect();
        assert_eq!(critical_ids, vec!["a0", "z0"]);
    }

    #[test]
    fn test_degenerate_empty_sets_are_ok() {
        let config = EngineConfig::default();
        let g = graph(&[("a", "thing"), ("b", "gadget")], &[("a", "b"), ("b", "a")]);
        let c = resolve(&g, None, None, &config.entry_keywords, &config.critical_keywords);
        // Cycle: no zero in-degree, no keywords anywhere.
        assert!(c.entries.is_empty());
        assert!(c.criticals.is_empty());
    }
}
