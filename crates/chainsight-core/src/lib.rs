//! chainsight-core: Shared wire-contract types for the Chainsight analyzer.
//!
//! This crate defines the JSON shapes exchanged with the upstream
//! collaborators (diagram parser, scanner-report parsers) and the downstream
//! consumers (visualization, narrative generation):
//! - Topology descriptor (nodes and edges from a diagram export)
//! - Per-host vulnerability reports with individual findings
//! - Manual label-to-host mappings
//! - The severity scale shared with the report parsers

pub mod error;
pub mod types;

pub use error::CoreError;
