//! Diagram Metrics
//!
//! Graph topology and centrality metrics for diagrams:
//! - Degree, average degree and density over the directed multigraph
//! - Brandes betweenness, closeness and local clustering on the undirected view
//! - Weak connectivity and component breakdown
//! - Hub, bridge and periphery queries over a computed snapshot

pub mod graph;

pub use graph::{
    calculate_graph_metrics, find_bridge_nodes, find_hub_nodes, find_peripheral_nodes, Diagram,
    EdgeRef, GraphMetrics, MetricsEngine, MetricsReport, NodeMetrics, NodeRef,
};

use anyhow::{Context, Result};
use graph::{EngineConfig, QueryConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Configuration
// ============================================================================

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "diagram-metrics.yaml";

/// Top-level configuration (YAML file layout).
///
/// ```yaml
/// queries:
///   hub_degree_multiplier: 2.0
///   peripheral_closeness_multiplier: 1.0
/// engine:
///   parallel_threshold: 200
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub queries: QueryConfig,
    pub engine: EngineConfig,
}

impl MetricsConfig {
    /// Load configuration from an optional YAML file, then override with env vars.
    ///
    /// Priority: env var > YAML > default
    ///
    /// If `yaml_path` is None, tries `diagram-metrics.yaml` in CWD. A missing
    /// or unparsable file falls back to defaults.
    pub fn from_yaml_and_env(yaml_path: Option<&Path>) -> Result<Self> {
        let mut config = Self::load_yaml(yaml_path);

        if let Some(v) = env_override::<f64>("DIAGRAM_METRICS_HUB_MULTIPLIER")? {
            config.queries.hub_degree_multiplier = v;
        }
        if let Some(v) = env_override::<f64>("DIAGRAM_METRICS_PERIPHERAL_MULTIPLIER")? {
            config.queries.peripheral_closeness_multiplier = v;
        }
        if let Some(v) = env_override::<usize>("DIAGRAM_METRICS_PARALLEL_THRESHOLD")? {
            config.engine.parallel_threshold = v;
        }

        Ok(config)
    }

    /// Try to load and parse a YAML config file. Returns defaults on any failure.
    fn load_yaml(yaml_path: Option<&Path>) -> Self {
        let path = yaml_path.unwrap_or(Path::new(DEFAULT_CONFIG_FILE));

        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_yaml::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}. Using defaults.", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config file at {}, using env vars / defaults", path.display());
                Self::default()
            }
        }
    }
}

/// Read and parse an env var. Unset or empty → `None`; unparsable → error.
fn env_override<T>(name: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("invalid value for {}: {:?}", name, raw)),
        _ => Ok(None),
    }
}

// ============================================================================
// Tests
// ============================================================================
