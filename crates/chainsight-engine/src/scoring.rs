//! Composite risk scoring.
//!
//! Formula: `Risk_Score = (Vuln_Count × Severity) × Importance × proximity`,
//! rounded to 6 decimals. Monotonically non-decreasing in every factor and
//! zero whenever any factor is zero.

use crate::vulns::VulnStats;

/// Score one node.
pub fn risk_score(stats: VulnStats, importance: f64, proximity: f64) -> f64 {
    let raw = f64::from(stats.vuln_count) * stats.severity * importance * proximity;
    round6(raw)
}

/// Score every node; inputs are the parallel per-stage vectors.
pub fn score_all(stats: &[VulnStats], importance: &[f64], proximity: &[f64]) -> Vec<f64> {
    stats
        .iter()
        .zip(importance.iter())
        .zip(proximity.iter())
        .map(|((s, imp), prox)| risk_score(*s, *imp, *prox))
        .collect()
}

fn round6(value: f64) -> f64 {
    (value * 1_000_000.0).round() / 1_000_000.0
}
