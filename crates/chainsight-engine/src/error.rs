//! Error types for the chainsight-engine crate.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed input: {detail}")]
    MalformedInput { detail: String },

    #[error("Duplicate node id in topology descriptor: {node_id}")]
    DuplicateNode { node_id: String },

    #[error("Invalid configuration: {detail}")]
    InvalidConfig { detail: String },

    #[error("Core error: {0}")]
    Core(#[from] chainsight_core::CoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, EngineError>;
