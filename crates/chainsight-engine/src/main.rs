//! CLI entry point for the chainsight-engine analyzer.
//!
//! Designed for subprocess invocation from the visualization frontend:
//! results are written as JSON to stdout, logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use chainsight_core::types::{ManualMapping, TopologyDescriptor, VulnAggregate};
use chainsight_engine::{AnalysisEngine, AnalyzeRequest, EngineConfig};

#[derive(Parser)]
#[command(name = "chainsight-engine")]
#[command(about = "Attack-graph enrichment and risk-scoring engine")]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Config file prefix (default: chainsight).
    #[arg(short, long, default_value = "chainsight", global = true)]
    config: String,
}

#[derive(Subcommand)]
enum Command {
    /// Run the full pipeline over input files.
    Analyze {
        /// Topology descriptor JSON (nodes and edges).
        #[arg(long)]
        topology: PathBuf,

        /// Parsed vulnerability report JSON; repeatable, merged additively.
        #[arg(long = "vuln-report", required = true)]
        vuln_reports: Vec<PathBuf>,

        /// Manual label → host-key mapping JSON.
        #[arg(long)]
        mapping: Option<PathBuf>,

        /// Explicit entry node id; repeatable. Omit for auto-detection.
        #[arg(long = "entry-node")]
        entry_nodes: Vec<String>,

        /// Explicit critical node id; repeatable. Omit for auto-detection.
        #[arg(long = "critical-node")]
        critical_nodes: Vec<String>,

        /// Proximity decay constant override.
        #[arg(long)]
        beta: Option<f64>,

        /// Also write the result JSON to this file.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Read a full AnalyzeRequest JSON from stdin, write the result to stdout.
    Compute,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let engine_config = load_engine_config(&cli.config);
    let engine = AnalysisEngine::with_config(engine_config)?;

    match cli.command {
        Command::Analyze {
            topology,
            vuln_reports,
            mapping,
            entry_nodes,
            critical_nodes,
            beta,
            out,
            pretty,
        } => {
            let request = build_request(
                &topology,
                &vuln_reports,
                mapping.as_deref(),
                entry_nodes,
                critical_nodes,
                beta,
            )?;
            let result = engine.analyze(request)?;

            let json = if pretty {
                serde_json::to_string_pretty(&result)?
            } else {
                serde_json::to_string(&result)?
            };
            println!("{json}");

            if let Some(path) = out {
                std::fs::write(&path, &json)
                    .with_context(|| format!("writing result to {}", path.display()))?;
                tracing::info!(path = %path.display(), "result saved");
            }
        }
        Command::Compute => {
            let input = std::io::read_to_string(std::io::stdin())?;
            let request: AnalyzeRequest =
                serde_json::from_str(&input).context("parsing AnalyzeRequest from stdin")?;
            let result = engine.analyze(request)?;
            println!("{}", serde_json::to_string(&result)?);
        }
    }

    Ok(())
}

fn build_request(
    topology: &std::path::Path,
    vuln_reports: &[PathBuf],
    mapping: Option<&std::path::Path>,
    entry_nodes: Vec<String>,
    critical_nodes: Vec<String>,
    beta: Option<f64>,
) -> anyhow::Result<AnalyzeRequest> {
    let topology: TopologyDescriptor = read_json(topology)?;

    let mut vuln_sources = Vec::with_capacity(vuln_reports.len());
    for path in vuln_reports {
        let aggregate: VulnAggregate = read_json(path)?;
        vuln_sources.push(aggregate);
    }

    let manual_mapping: ManualMapping = match mapping {
        Some(path) => read_json(path)?,
        None => ManualMapping::new(),
    };

    Ok(AnalyzeRequest {
        topology,
        vuln_sources,
        manual_mapping,
        entry_nodes: if entry_nodes.is_empty() {
            None
        } else {
            Some(entry_nodes)
        },
        critical_nodes: if critical_nodes.is_empty() {
            None
        } else {
            Some(critical_nodes)
        },
        beta,
    })
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> anyhow::Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

/// Engine defaults come from `chainsight.toml` `[engine]` plus
/// `CHAINSIGHT_ENGINE__*` environment overrides; absent config means
/// built-in defaults.
fn load_engine_config(file_prefix: &str) -> EngineConfig {
    let cfg = config::Config::builder()
        .add_source(config::File::with_name(file_prefix).required(false))
        .add_source(
            config::Environment::with_prefix("CHAINSIGHT")
                .separator("__")
                .try_parsing(true),
        )
        .build();

    match cfg {
        Ok(c) => c.get::<EngineConfig>("engine").unwrap_or_default(),
        Err(_) => EngineConfig::default(),
    }
}
