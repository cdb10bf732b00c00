//! chainsight-engine: Attack-graph enrichment and risk scoring.
//!
//! Builds a directed graph from a topology descriptor, attaches
//! vulnerability scan aggregates to matching nodes, classifies entry and
//! critical nodes, computes blast-radius proximity and importance weights,
//! derives a composite risk score per node, and enumerates every
//! minimal-hop attack path from entries to criticals.

pub mod classify;
pub mod config;
pub mod error;
pub mod graph;
pub mod importance;
pub mod matcher;
pub mod paths;
pub mod proximity;
pub mod scoring;
pub mod types;
pub mod vulns;

pub use config::EngineConfig;
pub use error::EngineError;
pub use types::{AnalysisResult, AnalyzeRequest};

use chrono::Utc;
use uuid::Uuid;

use crate::graph::TopologyGraph;
use crate::types::{EnrichedNode, GraphStats};

/// The analysis pipeline. Stateless apart from configuration; one engine
/// can serve any number of analyses, concurrently if desired.
pub struct AnalysisEngine {
    config: EngineConfig,
}

impl AnalysisEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create an engine with a custom configuration, rejecting values that
    /// would corrupt scoring monotonicity.
    pub fn with_config(config: EngineConfig) -> error::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run the full pipeline.
    ///
    /// Load graph → merge sources → attach vulns → resolve entry/critical
    /// sets → proximity → importance → risk → paths. Each stage is a pure
    /// function producing a per-node vector; this method composes them into
    /// the result envelope. No file or network I/O happens here.
    pub fn analyze(&self, request: AnalyzeRequest) -> error::Result<AnalysisResult> {
        let start = std::time::Instant::now();

        let beta = match request.beta {
            Some(b) if b <= 0.0 => {
                return Err(EngineError::InvalidConfig {
                    detail: format!("beta must be > 0, got {b}"),
                });
            }
            Some(b) => b,
            None => self.config.beta,
        };

        let graph = TopologyGraph::from_descriptor(&request.topology)?;
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "topology graph loaded"
        );

        let aggregate = vulns::merge_sources(request.vuln_sources)?;
        let attachment = vulns::attach(
            &graph,
            &aggregate,
            &request.manual_mapping,
            self.config.match_threshold,
        );
        if !attachment.unmapped.is_empty() {
            tracing::info!(
                unmapped = attachment.unmapped.len(),
                "nodes without a vulnerability host match"
            );
        }

        let classification = classify::resolve(
            &graph,
            request.entry_nodes.as_deref(),
            request.critical_nodes.as_deref(),
            &self.config.entry_keywords,
            &self.config.critical_keywords,
        );

        let proximity = proximity::compute(&graph, &classification.entries, beta);
        let importance = importance::assign(&graph, &self.config);
        let risk = scoring::score_all(&attachment.stats, &importance, &proximity);
        let attack_paths = paths::extract(&graph, &classification.entries, &classification.criticals);

        let nodes: Vec<EnrichedNode> = graph
            .nodes
            .iter()
            .map(|n| EnrichedNode {
                id: n.id.clone(),
                label: n.label.clone(),
                vuln_count: attachment.stats[n.index].vuln_count,
                severity: attachment.stats[n.index].severity,
                importance: importance[n.index],
                proximity: proximity[n.index],
                risk_score: risk[n.index],
            })
            .collect();

        let graph_stats = GraphStats {
            total_nodes: graph.node_count(),
            total_edges: graph.edge_count(),
            entry_count: classification.entries.len(),
            critical_count: classification.criticals.len(),
        };

        let entry_ids = classification
            .entries
            .iter()
            .map(|&i| graph.nodes[i].id.clone())
            .collect();
        let critical_ids = classification
            .criticals
            .iter()
            .map(|&i| graph.nodes[i].id.clone())
            .collect();

        tracing::info!(
            paths = attack_paths.len(),
            entries = graph_stats.entry_count,
            criticals = graph_stats.critical_count,
            "analysis complete"
        );

        Ok(AnalysisResult {
            id: Uuid::new_v4(),
            nodes,
            attack_paths,
            unmapped: attachment.unmapped,
            entry_nodes: entry_ids,
            critical_nodes: critical_ids,
            graph_stats,
            computed_at: Utc::now(),
            computation_ms: start.elapsed().as_millis() as u64,
        })
    }
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}
