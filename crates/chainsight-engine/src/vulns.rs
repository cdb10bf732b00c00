//! Vulnerability source merging and attachment to topology nodes.
//!
//! Attachment is manual-mapping-first: an operator-supplied label → host-key
//! entry always wins. Nodes without a manual entry fall back to the ranked
//! matcher over lexicographically ordered host keys.

use chainsight_core::types::{ManualMapping, VulnAggregate};

use crate::error::Result;
use crate::graph::TopologyGraph;
use crate::matcher::{self, normalize};
use crate::types::UnmappedNode;

/// Vulnerability volume and mean severity copied onto one node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VulnStats {
    pub vuln_count: u32,
    pub severity: f64,
}

/// Per-node attachment output plus the nodes nothing matched.
#[derive(Debug, Clone)]
pub struct AttachOutcome {
    /// Parallel to the graph's node vector.
    pub stats: Vec<VulnStats>,
    pub unmapped: Vec<UnmappedNode>,
}

/// Additively merge several scan sources into one aggregate.
///
/// Same host key in two sources → finding lists concatenated and the
/// derived count/severity recomputed, so the result is independent of
/// source order. Every finding is validated against the severity scale.
pub fn merge_sources(sources: Vec<VulnAggregate>) -> Result<VulnAggregate> {
    let mut merged = VulnAggregate::new();
    for source in sources {
        for (key, report) in source {
            report.validate()?;
            match merged.get_mut(&key) {
                Some(existing) => existing.merge(report),
                None => {
                    merged.insert(key, report);
                }
            }
        }
    }
    Ok(merged)
}

/// Attach vulnerability data to every graph node.
///
/// Each node starts from zeroed stats. The manual tier is consulted first;
/// the ranked matcher is the fallback. Nodes with no match at either tier
/// keep zeros and are reported as unmapped.
pub fn attach(
    graph: &TopologyGraph,
    aggregate: &VulnAggregate,
    mapping: &ManualMapping,
    match_threshold: f64,
) -> AttachOutcome {
    let mut stats = vec![VulnStats::default(); graph.node_count()];
    let mut unmapped = Vec::new();

    for node in &graph.nodes {
        if let Some(report) = manual_lookup(&node.label, mapping, aggregate) {
            stats[node.index] = VulnStats {
                vuln_count: report.vuln_count,
                severity: report.severity,
            };
            continue;
        }

        match matcher::best_match(&node.label, aggregate.keys(), match_threshold) {
            Some(m) => {
                let report = &aggregate[&m.key];
                tracing::debug!(
                    node_id = %node.id,
                    label = %node.label,
                    host_key = %m.key,
                    confidence = m.confidence,
                    "matched node to vulnerability host"
                );
                stats[node.index] = VulnStats {
                    vuln_count: report.vuln_count,
                    severity: report.severity,
                };
            }
            None => {
                tracing::info!(
                    node_id = %node.id,
                    label = %node.label,
                    "no vulnerability host matched, node keeps zero stats"
                );
                unmapped.push(UnmappedNode {
                    node_id: node.id.clone(),
                    label: node.label.clone(),
                });
            }
        }
    }

    AttachOutcome { stats, unmapped }
}

/// Manual tier: find a mapping entry whose label matches the node label
/// under normalization and whose host key exists in the aggregate.
fn manual_lookup<'a>(
    label: &str,
    mapping: &ManualMapping,
    aggregate: &'a VulnAggregate,
) -> Option<&'a chainsight_core::types::HostReport> {
    let wanted = normalize(label);
    if wanted.is_empty() {
        return None;
    }
    for (mapped_label, host_key) in mapping {
        if normalize(mapped_label) == wanted {
            if let Some(report) = aggregate.get(host_key) {
                return Some(report);
            }
            tracing::warn!(
                label = %mapped_label,
                host_key = %host_key,
                "manual mapping points at a host key absent from the aggregate"
            );
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainsight_core::types::{
        EdgeDescriptor, Finding, HostReport, NodeDescriptor, TopologyDescriptor,
    };

    fn finding(host: &str, severity: u8) -> Finding {
        Finding {
            tool: "nuclei".to_string(),
            host: host.to_string(),
            port: 80,
            url: format!("http://{host}/"),
            title: "t".to_string(),
            severity,
        }
    }

    fn graph(nodes: &[(&str, &str)]) -> TopologyGraph {
        let desc = TopologyDescriptor {
            nodes: nodes
                .iter()
                .map(|(id, label)| NodeDescriptor {
                    id: id.to_string(),
                    label: label.to_string(),
                })
                .collect(),
            edges: Vec::<EdgeDescriptor>::new(),
        };
        TopologyGraph::from_descriptor(&desc).unwrap()
    }

    #[test]
    fn test_merge_concatenates_same_key() {
        let mut a = VulnAggregate::new();
        a.insert("x:80".to_string(), HostReport::from_findings(vec![finding("x", 2)]));
        let mut b = VulnAggregate::new();
        b.insert("x:80".to_string(), HostReport::from_findings(vec![finding("x", 4)]));

        let merged = merge_sources(vec![a.clone(), b.clone()]).unwrap();
        let report = &merged["x:80"];
        assert_eq!(report.vuln_count, 2);
        assert_eq!(report.severity, 3.0);

        let reversed = merge_sources(vec![b, a]).unwrap();
        assert_eq!(reversed["x:80"].severity, report.severity);
    }

    #[test]
    fn test_merge_rejects_invalid_severity() {
        let mut a = VulnAggregate::new();
        a.insert("x:80".to_string(), HostReport::from_findings(vec![finding("x", 7)]));
        assert!(merge_sources(vec![a]).is_err());
    }

    #[test]
    fn test_manual_tier_wins_over_automatic() {
        let g = graph(&[("n1", "web-frontend")]);

        let mut aggregate = VulnAggregate::new();
        // The automatic tier would pick this key ("webfrontend" substring).
        aggregate.insert(
            "old-web-frontend:80".to_string(),
            HostReport::from_findings(vec![finding("old", 5)]),
        );
        aggregate.insert(
            "10.0.0.7:443".to_string(),
            HostReport::from_findings(vec![finding("10.0.0.7", 2)]),
        );

        let mut mapping = ManualMapping::new();
        mapping.insert("Web Frontend".to_string(), "10.0.0.7:443".to_string());

        let outcome = attach(&g, &aggregate, &mapping, 0.5);
        assert_eq!(outcome.stats[0].vuln_count, 1);
        assert_eq!(outcome.stats[0].severity, 2.0);
        assert!(outcome.unmapped.is_empty());
    }

    #[test]
    fn test_manual_entry_with_missing_key_falls_back() {
        let g = graph(&[("n1", "juice-shop")]);

        let mut aggregate = VulnAggregate::new();
        aggregate.insert(
            "juice-shop:3000".to_string(),
            HostReport::from_findings(vec![finding("juice-shop", 3)]),
        );

        let mut mapping = ManualMapping::new();
        mapping.insert("juice-shop".to_string(), "gone:80".to_string());

        let outcome = attach(&g, &aggregate, &mapping, 0.5);
        assert_eq!(outcome.stats[0].vuln_count, 1);
        assert_eq!(outcome.stats[0].severity, 3.0);
    }

    #[test]
    fn test_unmatched_node_reported_not_fatal() {
        let g = graph(&[("n1", "printer")]);
        let mut aggregate = VulnAggregate::new();
        aggregate.insert(
            "web:80".to_string(),
            HostReport::from_findings(vec![finding("web", 3)]),
        );

        let outcome = attach(&g, &aggregate, &ManualMapping::new(), 0.5);
        assert_eq!(outcome.stats[0], VulnStats::default());
        assert_eq!(outcome.unmapped.len(), 1);
        assert_eq!(outcome.unmapped[0].node_id, "n1");
        assert_eq!(outcome.unmapped[0].label, "printer");
    }

    #[test]
    fn test_attachment_is_deterministic_over_keys() {
        let g = graph(&[("n1", "api")]);
        let mut aggregate = VulnAggregate::new();
        aggregate.insert(
            "api-gw:80".to_string(),
            HostReport::from_findings(vec![finding("api-gw", 4)]),
        );
        aggregate.insert(
            "api-gw:443".to_string(),
            HostReport::from_findings(vec![finding("api-gw", 2)]),
        );

        // BTreeMap iteration is lexicographic: "api-gw:443" < "api-gw:80".
        let outcome = attach(&g, &aggregate, &ManualMapping::new(), 0.5);
        assert_eq!(outcome.stats[0].severity, 2.0);
    }
}
