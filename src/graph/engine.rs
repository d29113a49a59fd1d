//! Metrics engine — orchestrates the full pipeline.
//!
//! [`MetricsEngine`] is the single entry point for metrics consumers. A run
//! is:
//!
//! 1. **Build**: diagram → `DiagramGraph` via `GraphBuilder`
//! 2. **Computation**: degree, betweenness, closeness, clustering, components
//! 3. **Report**: snapshot plus the non-fatal warnings raised while building
//!
//! Every run starts from scratch; the engine keeps only its configuration.

use serde::{Deserialize, Serialize};

use super::algorithms::compute_all;
use super::builder::GraphBuilder;
use super::models::{BuildWarning, ComponentInfo, Diagram, EngineConfig, GraphMetrics};

// ============================================================================
// Output type
// ============================================================================

/// Result of a full engine run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsReport {
    pub metrics: GraphMetrics,
    /// Weakly connected components, largest first
    pub components: Vec<ComponentInfo>,
    /// Input problems that were corrected (e.g. clamped weights)
    pub warnings: Vec<BuildWarning>,
    /// Computation time in milliseconds
    pub computation_ms: u64,
}

// ============================================================================
// Engine
// ============================================================================

/// Stateless metrics engine.
#[derive(Debug, Clone, Default)]
pub struct MetricsEngine {
    config: EngineConfig,
}

impl MetricsEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Compute the metrics snapshot of a diagram. Never fails.
    pub fn analyze(&self, diagram: &Diagram) -> MetricsReport {
        let start = std::time::Instant::now();

        let (graph, warnings) = GraphBuilder::new().build(diagram);
        let (metrics, components) = compute_all(&graph, &self.config);

        let computation_ms = start.elapsed().as_millis() as u64;
        tracing::info!(
            nodes = metrics.node_count,
            edges = metrics.edge_count,
            connected = metrics.is_connected,
            warnings = warnings.len(),
            "Metrics computed in {}ms",
            computation_ms
        );

        MetricsReport {
            metrics,
            components,
            warnings,
            computation_ms,
        }
    }
}

/// Compute the metrics snapshot of a diagram with the default engine.
pub fn calculate_graph_metrics(diagram: &Diagram) -> GraphMetrics {
    MetricsEngine::default().analyze(diagram).metrics
}

// ============================================================================
// Tests
// ============================================================================
