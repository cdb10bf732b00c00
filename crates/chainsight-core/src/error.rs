use thiserror::Error;

/// Top-level error type for Chainsight wire-contract handling.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid severity {value}: expected 1 (info) through 5 (critical)")]
    InvalidSeverity { value: u8 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
