//! Request and response types for analysis operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use chainsight_core::types::{ManualMapping, TopologyDescriptor, VulnAggregate};

/// Request to run the full enrichment pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    pub topology: TopologyDescriptor,
    /// One aggregate per scan source; merged additively before attachment.
    pub vuln_sources: Vec<VulnAggregate>,
    /// Diagram-label → host-key overrides. Empty means automatic only.
    #[serde(default)]
    pub manual_mapping: ManualMapping,
    /// Explicit entry node ids. If None, entries are auto-detected.
    pub entry_nodes: Option<Vec<String>>,
    /// Explicit critical node ids. If None, criticals are auto-detected.
    pub critical_nodes: Option<Vec<String>>,
    /// Proximity decay constant override.
    pub beta: Option<f64>,
}

/// A node annotated with every metric the pipeline computes. Field names
/// follow the JSON contract consumed by the visualization layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedNode {
    pub id: String,
    pub label: String,
    #[serde(rename = "Vuln_Count")]
    pub vuln_count: u32,
    #[serde(rename = "Severity")]
    pub severity: f64,
    #[serde(rename = "Importance")]
    pub importance: f64,
    pub proximity: f64,
    #[serde(rename = "Risk_Score")]
    pub risk_score: f64,
}

/// A minimal-hop directed path from an entry node to a critical node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttackPath {
    /// Node ids along the path, entry first.
    pub node_ids: Vec<String>,
    /// Display labels resolved for each node id.
    pub labels: Vec<String>,
    pub entry_node: String,
    pub critical_node: String,
    /// Edge count; equals the shortest hop distance between the endpoints.
    pub hops: usize,
}

/// A node no vulnerability host could be matched to. Surfaced for operator
/// review, never a fatal condition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnmappedNode {
    pub node_id: String,
    pub label: String,
}

/// Counts describing the analyzed graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub entry_count: usize,
    pub critical_count: usize,
}

/// Complete result of an analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: Uuid,
    pub nodes: Vec<EnrichedNode>,
    pub attack_paths: Vec<AttackPath>,
    pub unmapped: Vec<UnmappedNode>,
    pub entry_nodes: Vec<String>,
    pub critical_nodes: Vec<String>,
    pub graph_stats: GraphStats,
    pub computed_at: DateTime<Utc>,
    pub computation_ms: u64,
}
