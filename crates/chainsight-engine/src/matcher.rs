//! Ranked label-to-host matching for the automatic fallback tier.
//!
//! Matching strategies are tried in a fixed precedence order, each with a
//! confidence score; the first strategy that produces a hit at or above the
//! caller's threshold wins. Host keys are always scanned in lexicographic
//! order so results are reproducible.

/// Normalize a label or host key for comparison: lowercase, with
/// whitespace, hyphens, and underscores stripped. `"Web-Server"`,
/// `"web server"`, and `"webserver"` all normalize identically.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(|c| c.to_lowercase())
        .collect()
}

/// Split into lowercase alphanumeric tokens ("redis-admin" → ["redis", "admin"]).
fn tokenize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_string())
        .collect()
}

/// A matching strategy, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Normalized label equals normalized host key.
    ExactNormalized,
    /// Every label token appears among the host key's tokens.
    TokenSubset,
    /// Normalized host key contains the normalized label as a substring.
    Substring,
}

impl MatchStrategy {
    /// Confidence yielded by a hit at this tier.
    pub fn confidence(self) -> f64 {
        match self {
            Self::ExactNormalized => 1.0,
            Self::TokenSubset => 0.75,
            Self::Substring => 0.5,
        }
    }

    fn matches(self, label: &str, key: &str) -> bool {
        match self {
            Self::ExactNormalized => normalize(label) == normalize(key),
            Self::TokenSubset => {
                let label_tokens = tokenize(label);
                if label_tokens.is_empty() {
                    return false;
                }
                let key_tokens = tokenize(key);
                label_tokens.iter().all(|t| key_tokens.contains(t))
            }
            Self::Substring => {
                let needle = normalize(label);
                !needle.is_empty() && normalize(key).contains(&needle)
            }
        }
    }
}

const STRATEGY_ORDER: &[MatchStrategy] = &[
    MatchStrategy::ExactNormalized,
    MatchStrategy::TokenSubset,
    MatchStrategy::Substring,
];

/// A resolved host-key match.
#[derive(Debug, Clone)]
pub struct HostMatch {
    pub key: String,
    pub strategy: MatchStrategy,
    pub confidence: f64,
}

/// Find the best host key for a node label.
///
/// `keys` must already be in lexicographic order (the vulnerability
/// aggregate is a BTreeMap, so iterating it satisfies this). Within a tier
/// the first matching key wins; tiers below `threshold` are not tried.
pub fn best_match<'a, I>(label: &str, keys: I, threshold: f64) -> Option<HostMatch>
where
    I: IntoIterator<Item = &'a String> + Clone,
{
    if normalize(label).is_empty() {
        return None;
    }

    for &strategy in STRATEGY_ORDER {
        if strategy.confidence() < threshold {
            break;
        }
        for key in keys.clone() {
            if strategy.matches(label, key) {
                return Some(HostMatch {
                    key: key.clone(),
                    strategy,
                    confidence: strategy.confidence(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(raw: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        v.sort();
        v
    }

    #[test]
    fn test_normalize_variants_compare_equal() {
        assert_eq!(normalize("Web-Server"), "webserver");
        assert_eq!(normalize("web server"), "webserver");
        assert_eq!(normalize("web_server"), "webserver");
    }

    #[test]
    fn test_exact_beats_substring() {
        let keys = keys(&["juice-shop:3000", "juiceshop"]);
        let m = best_match("Juice Shop", keys.iter(), 0.5).unwrap();
        assert_eq!(m.key, "juiceshop");
        assert_eq!(m.strategy, MatchStrategy::ExactNormalized);
    }

    #[test]
    fn test_token_subset_match() {
        let keys = keys(&["prod-redis-cache:6379"]);
        let m = best_match("redis cache", keys.iter(), 0.5).unwrap();
        assert_eq!(m.strategy, MatchStrategy::TokenSubset);
        assert_eq!(m.confidence, 0.75);
    }

    #[test]
    fn test_substring_fallback() {
        let keys = keys(&["internal-webserver-01:8080"]);
        let m = best_match("Web-Server", keys.iter(), 0.5).unwrap();
        assert_eq!(m.strategy, MatchStrategy::Substring);
    }

    #[test]
    fn test_first_key_wins_within_tier() {
        // Both keys contain "api"; lexicographically smaller key wins.
        let keys = keys(&["api-gw:443", "api-gw:80"]);
        let m = best_match("api", keys.iter(), 0.5).unwrap();
        assert_eq!(m.key, "api-gw:443");
    }

    #[test]
    fn test_threshold_disables_lower_tiers() {
        let keys = keys(&["internal-webserver-01:8080"]);
        // Substring confidence (0.5) is below 0.6, so no match.
        assert!(best_match("Web-Server", keys.iter(), 0.6).is_none());
    }

    #[test]
    fn test_empty_label_never_matches() {
        let keys = keys(&["anything"]);
        assert!(best_match("  - ", keys.iter(), 0.5).is_none());
    }
}
