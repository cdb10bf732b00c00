//! Wire-contract types shared with upstream parsers and downstream viewers.
//!
//! Field names follow the JSON contract established by the report parsers
//! (`Vuln_Count`, `Severity`), so serde renames are used where Rust naming
//! differs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ── Topology descriptor ───────────────────────────────────────────

/// A node as exported by the diagram parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDescriptor {
    pub id: String,
    /// Display label; diagrams may omit it.
    #[serde(default = "default_label")]
    pub label: String,
}

/// A directed reachability relation between two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDescriptor {
    pub source: String,
    pub target: String,
}

/// The full topology export. Both fields are required; a descriptor missing
/// `nodes` or `edges` fails deserialization with an error naming the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyDescriptor {
    pub nodes: Vec<NodeDescriptor>,
    pub edges: Vec<EdgeDescriptor>,
}

fn default_label() -> String {
    "unknown".to_string()
}

// ── Vulnerability findings ────────────────────────────────────────

/// Severity scale shared with the scanner-report parsers.
pub const SEVERITY_INFO: u8 = 1;
pub const SEVERITY_LOW: u8 = 2;
pub const SEVERITY_MEDIUM: u8 = 3;
pub const SEVERITY_HIGH: u8 = 4;
pub const SEVERITY_CRITICAL: u8 = 5;

/// A single scanner finding attributed to a host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub tool: String,
    pub host: String,
    pub port: u16,
    pub url: String,
    pub title: String,
    pub severity: u8,
}

impl Finding {
    /// Reject severities outside the 1..=5 scale.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !(SEVERITY_INFO..=SEVERITY_CRITICAL).contains(&self.severity) {
            return Err(CoreError::InvalidSeverity {
                value: self.severity,
            });
        }
        Ok(())
    }
}

/// Aggregated findings for one host key (`host:port` as emitted by the
/// report parsers).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostReport {
    #[serde(default)]
    pub findings: Vec<Finding>,
    #[serde(rename = "Vuln_Count", default)]
    pub vuln_count: u32,
    #[serde(rename = "Severity", default)]
    pub severity: f64,
}

impl HostReport {
    /// Build a report from a finding list, deriving count and mean severity.
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        let mut report = Self {
            findings,
            vuln_count: 0,
            severity: 0.0,
        };
        report.recompute();
        report
    }

    /// Recompute `vuln_count` and mean `severity` from the finding list.
    ///
    /// Reports that arrive pre-aggregated (counts without findings) keep
    /// their stored values.
    pub fn recompute(&mut self) {
        if self.findings.is_empty() {
            return;
        }
        let sum: u32 = self.findings.iter().map(|f| u32::from(f.severity)).sum();
        self.vuln_count = self.findings.len() as u32;
        self.severity = round2(f64::from(sum) / self.findings.len() as f64);
    }

    /// Whether the stored count is derived from the finding list. A report
    /// that arrived pre-aggregated, or absorbed one in an earlier merge,
    /// carries counts the list cannot reproduce.
    fn counts_match_findings(&self) -> bool {
        self.vuln_count as usize == self.findings.len()
    }

    /// Additively merge another report for the same host key.
    ///
    /// Finding lists are concatenated, never overwritten. Recomputing from
    /// the combined list is only valid when both sides' counts are fully
    /// backed by findings; once pre-aggregated counts are involved (on
    /// either side, from any earlier merge), the combined severity is the
    /// count-weighted mean, which keeps the merge commutative across any
    /// number of sources.
    pub fn merge(&mut self, other: HostReport) {
        if self.counts_match_findings() && other.counts_match_findings() {
            self.findings.extend(other.findings);
            self.recompute();
            return;
        }

        let total = self.vuln_count + other.vuln_count;
        if total == 0 {
            self.findings.extend(other.findings);
            return;
        }
        let weighted = f64::from(self.vuln_count) * self.severity
            + f64::from(other.vuln_count) * other.severity;
        self.findings.extend(other.findings);
        self.vuln_count = total;
        self.severity = round2(weighted / f64::from(total));
    }

    /// Validate every finding's severity.
    pub fn validate(&self) -> Result<(), CoreError> {
        for finding in &self.findings {
            finding.validate()?;
        }
        Ok(())
    }
}

/// Vulnerability data keyed by host identifier. BTreeMap keeps key iteration
/// lexicographic, which the fallback matcher relies on for determinism.
pub type VulnAggregate = BTreeMap<String, HostReport>;

/// Operator-supplied diagram-label → host-key mapping. Always takes priority
/// over automatic matching.
pub type ManualMapping = BTreeMap<String, String>;

/// Round to 2 decimal places (report-parser contract for mean severity).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
