//! Configuration for the analysis engine.
//!
//! Loaded from `chainsight.toml` `[engine]` section or `CHAINSIGHT_ENGINE__`
//! environment variables; every field has a default so an absent config file
//! is fine.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{EngineError, Result};

/// Tunable parameters for every pipeline stage.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Proximity decay constant. Must be > 0.
    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Label keywords marking a node as attacker-reachable.
    #[serde(default = "default_entry_keywords")]
    pub entry_keywords: Vec<String>,

    /// Label keywords marking a node as a high-value target.
    #[serde(default = "default_critical_keywords")]
    pub critical_keywords: Vec<String>,

    /// Label keyword → importance weight. All weights must be > 0.
    #[serde(default = "default_importance_weights")]
    pub importance_weights: BTreeMap<String, f64>,

    /// Importance assigned when no keyword matches. Must be > 0.
    #[serde(default = "default_importance")]
    pub default_importance: f64,

    /// Minimum matcher confidence for the automatic fallback tier.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
}

impl EngineConfig {
    /// Reject values that would corrupt the scoring monotonicity guarantees.
    pub fn validate(&self) -> Result<()> {
        if self.beta <= 0.0 {
            return Err(EngineError::InvalidConfig {
                detail: format!("beta must be > 0, got {}", self.beta),
            });
        }
        if self.default_importance <= 0.0 {
            return Err(EngineError::InvalidConfig {
                detail: format!(
                    "default_importance must be > 0, got {}",
                    self.default_importance
                ),
            });
        }
        for (keyword, weight) in &self.importance_weights {
            if keyword.trim().is_empty() {
                return Err(EngineError::InvalidConfig {
                    detail: "importance_weights contains an empty keyword".to_string(),
                });
            }
            if *weight <= 0.0 {
                return Err(EngineError::InvalidConfig {
                    detail: format!("importance weight for '{keyword}' must be > 0, got {weight}"),
                });
            }
        }
        if !(0.0..=1.0).contains(&self.match_threshold) {
            return Err(EngineError::InvalidConfig {
                detail: format!(
                    "match_threshold must be within [0, 1], got {}",
                    self.match_threshold
                ),
            });
        }
        Ok(())
    }

    /// Importance keywords in their fixed priority order: weight descending,
    /// then keyword ascending. This is the sole tie-break when a label
    /// matches several keywords (e.g. "redis-admin").
    pub fn importance_priority(&self) -> Vec<(String, f64)> {
        let mut entries: Vec<(String, f64)> = self
            .importance_weights
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        entries.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(&b.0))
        });
        entries
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            beta: default_beta(),
            entry_keywords: default_entry_keywords(),
            critical_keywords: default_critical_keywords(),
            importance_weights: default_importance_weights(),
            default_importance: default_importance(),
            match_threshold: default_match_threshold(),
        }
    }
}

fn default_beta() -> f64 {
    0.7
}

fn default_entry_keywords() -> Vec<String> {
    ["web", "ui", "frontend", "shop", "wordpress"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_critical_keywords() -> Vec<String> {
    ["db", "redis", "api", "admin", "backend"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_importance_weights() -> BTreeMap<String, f64> {
    let mut weights = BTreeMap::new();
    weights.insert("db".to_string(), 4.0);
    weights.insert("redis".to_string(), 3.0);
    weights.insert("api".to_string(), 3.0);
    weights.insert("admin".to_string(), 3.0);
    weights.insert("backend".to_string(), 3.0);
    weights
}

fn default_importance() -> f64 {
    1.0
}

fn default_match_threshold() -> f64 {
    0.5
}
