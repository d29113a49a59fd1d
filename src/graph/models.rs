//! Graph metrics data models.
//!
//! Defines the complete type system for the metrics engine:
//!
//! ## Input types (diagram layer)
//! - [`NodeRef`] / [`EdgeRef`] / [`Diagram`] — the flat node/edge list of a diagram
//!
//! ## Internal types (builder → algorithms)
//! - [`DiagramNode`] / [`DiagramEdge`] — vertex and edge payloads
//! - [`DiagramGraph`] — petgraph wrapper with ID ↔ NodeIndex mapping
//! - [`BuildWarning`] — non-fatal input problems found while building the graph
//!
//! ## Output types (metrics)
//! - [`NodeMetrics`] — per-vertex degree, betweenness, closeness, clustering
//! - [`ComponentInfo`] — metadata about a weakly connected component
//! - [`GraphMetrics`] — immutable snapshot of a full metrics run
//!
//! ## Configuration
//! - [`QueryConfig`] — tunable default thresholds for the query functions
//! - [`EngineConfig`] — execution tuning for the per-source passes

use petgraph::graph::{DiGraph, EdgeIndex, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Input types — supplied by the diagram layer
// ============================================================================

/// A node declared by the diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRef {
    pub id: String,
}

impl NodeRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A directed edge declared by the diagram.
///
/// Endpoints may reference ids that were never declared as nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRef {
    pub from: String,
    pub to: String,
    /// Traversal cost (default: 1.0 when absent, must be non-negative)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl EdgeRef {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: None,
        }
    }

    pub fn weighted(from: impl Into<String>, to: impl Into<String>, weight: f64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            weight: Some(weight),
        }
    }
}

/// The node/edge view of a diagram consumed by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagram {
    pub nodes: Vec<NodeRef>,
    pub edges: Vec<EdgeRef>,
}

impl Diagram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an undeclared-node diagram from `(from, to)` pairs.
    pub fn from_edges(pairs: &[(&str, &str)]) -> Self {
        Self {
            nodes: vec![],
            edges: pairs.iter().map(|(f, t)| EdgeRef::new(*f, *t)).collect(),
        }
    }

    pub fn with_node(mut self, id: impl Into<String>) -> Self {
        self.nodes.push(NodeRef::new(id));
        self
    }

    pub fn with_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.edges.push(EdgeRef::new(from, to));
        self
    }

    pub fn with_weighted_edge(
        mut self,
        from: impl Into<String>,
        to: impl Into<String>,
        weight: f64,
    ) -> Self {
        self.edges.push(EdgeRef::weighted(from, to, weight));
        self
    }
}

// ============================================================================
// DiagramGraph — petgraph wrapper with ID mapping
// ============================================================================

/// A vertex of the analysed graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagramNode {
    pub id: String,
    /// False when the vertex was promoted from an edge endpoint
    pub declared: bool,
}

/// A directed edge with its resolved weight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DiagramEdge {
    pub weight: f64,
}

impl Default for DiagramEdge {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

/// Wrapper around `petgraph::DiGraph` with ID → NodeIndex mapping.
///
/// Node indices are dense (`0..node_count`) and follow insertion order, so
/// every per-vertex array in the algorithms is indexed by `NodeIndex::index()`.
/// Parallel edges are kept as distinct edges.
#[derive(Debug, Clone)]
pub struct DiagramGraph {
    /// The underlying directed multigraph
    pub graph: DiGraph<DiagramNode, DiagramEdge>,
    /// Mapping from vertex id to petgraph NodeIndex
    pub id_to_index: HashMap<String, NodeIndex>,
}

impl DiagramGraph {
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            id_to_index: HashMap::new(),
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            id_to_index: HashMap::with_capacity(nodes),
        }
    }

    /// Add a vertex. If the id already exists, returns its existing index.
    pub fn add_node(&mut self, id: &str, declared: bool) -> NodeIndex {
        if let Some(&idx) = self.id_to_index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(DiagramNode {
            id: id.to_string(),
            declared,
        });
        self.id_to_index.insert(id.to_string(), idx);
        idx
    }

    /// Add an edge between two vertices identified by their ids.
    /// Returns `None` if either endpoint is unknown.
    pub fn add_edge(&mut self, from_id: &str, to_id: &str, edge: DiagramEdge) -> Option<EdgeIndex> {
        let from_idx = self.id_to_index.get(from_id)?;
        let to_idx = self.id_to_index.get(to_id)?;
        Some(self.graph.add_edge(*from_idx, *to_idx, edge))
    }

    pub fn get_node(&self, id: &str) -> Option<&DiagramNode> {
        let idx = self.id_to_index.get(id)?;
        self.graph.node_weight(*idx)
    }

    pub fn get_index(&self, id: &str) -> Option<NodeIndex> {
        self.id_to_index.get(id).copied()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

}

impl Default for DiagramGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Largest weight kept as-is. Path lengths and per-vertex distance sums stay
/// finite for any graph that fits in memory.
pub const MAX_EDGE_WEIGHT: f64 = 1e150;

/// Non-fatal problem found while building the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BuildWarning {
    /// A negative or non-finite weight was replaced by 1.0
    InvalidWeight {
        from: String,
        to: String,
        /// The rejected value; `None` when it was not a finite number
        original: Option<f64>,
    },
    /// A weight above [`MAX_EDGE_WEIGHT`] was lowered to that bound
    ClampedWeight { from: String, to: String, original: f64 },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeight {
                from,
                to,
                original: Some(w),
            } => write!(f, "edge {} -> {} has negative weight {}, using 1", from, to, w),
            Self::InvalidWeight { from, to, .. } => {
                write!(f, "edge {} -> {} has a non-finite weight, using 1", from, to)
            }
            Self::ClampedWeight { from, to, original } => write!(
                f,
                "edge {} -> {} weight {:e} exceeds {:e}, clamped",
                from, to, original, MAX_EDGE_WEIGHT
            ),
        }
    }
}

// ============================================================================
// Output types — metrics snapshot
// ============================================================================

/// Per-vertex structural metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetrics {
    pub node_id: String,
    /// Number of edges ending at this vertex
    pub in_degree: usize,
    /// Number of edges starting at this vertex
    pub out_degree: usize,
    /// in_degree + out_degree
    pub degree: usize,
    /// Raw Brandes betweenness over the undirected view
    pub betweenness: f64,
    /// reachable / Σ distance (0.0 for an isolated vertex)
    pub closeness: f64,
    /// Local clustering coefficient (0.0–1.0)
    pub clustering: f64,
}

/// Metadata about a weakly connected component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentInfo {
    pub id: u32,
    pub size: usize,
    /// Vertex ids in vertex order
    pub members: Vec<String>,
    /// Whether this is the largest component (ties all marked)
    pub is_main: bool,
}

/// Complete result of a metrics computation.
///
/// `nodes` is sorted by degree descending; ties keep vertex order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphMetrics {
    pub node_count: usize,
    pub edge_count: usize,
    pub average_degree: f64,
    pub density: f64,
    /// Weak connectivity (direction erased); true for 0 or 1 vertices
    pub is_connected: bool,
    pub nodes: Vec<NodeMetrics>,
}

impl GraphMetrics {
    /// Look up the metrics of a vertex. Returns `None` for unknown ids.
    ///
    /// Linear scan; callers looking up many ids should build [`Self::by_id`]
    /// once instead.
    pub fn node(&self, id: &str) -> Option<&NodeMetrics> {
        self.nodes.iter().find(|m| m.node_id == id)
    }

    /// Id → metrics index over the snapshot, for per-vertex lookups in bulk.
    pub fn by_id(&self) -> HashMap<&str, &NodeMetrics> {
        self.nodes
            .iter()
            .map(|m| (m.node_id.as_str(), m))
            .collect()
    }

    /// Mean closeness across all vertices (0.0 for an empty graph).
    pub fn mean_closeness(&self) -> f64 {
        if self.nodes.is_empty() {
            return 0.0;
        }
        self.nodes.iter().map(|m| m.closeness).sum::<f64>() / self.nodes.len() as f64
    }
}

impl Default for GraphMetrics {
    fn default() -> Self {
        Self {
            node_count: 0,
            edge_count: 0,
            average_degree: 0.0,
            density: 0.0,
            is_connected: true,
            nodes: vec![],
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Tunable defaults for the query functions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Hub threshold = multiplier × average degree (default: 2.0)
    pub hub_degree_multiplier: f64,
    /// Peripheral threshold = multiplier × mean closeness (default: 1.0)
    pub peripheral_closeness_multiplier: f64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            hub_degree_multiplier: 2.0,
            peripheral_closeness_multiplier: 1.0,
        }
    }
}

/// Execution tuning for the per-source shortest-path passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Vertex count at which the passes move to the rayon pool (default: 200)
    pub parallel_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: 200,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagram_deserialize_defaults() {
        let json = r#"{"edges":[{"from":"A","to":"B"},{"from":"B","to":"C","weight":2.5}]}"#;
        let diagram: Diagram = serde_json::from_str(json).unwrap();
        assert!(diagram.nodes.is_empty());
        assert_eq!(diagram.edges.len(), 2);
        assert_eq!(diagram.edges[0].weight, None);
        assert_eq!(diagram.edges[1].weight, Some(2.5));
    }

    #[test]
    fn test_diagram_builder_helpers() {
        let d = Diagram::new()
            .with_node("A")
            .with_edge("A", "B")
            .with_weighted_edge("B", "C", 3.0);
        assert_eq!(d.nodes, vec![NodeRef::new("A")]);
        assert_eq!(d.edges[1], EdgeRef::weighted("B", "C", 3.0));
    }

    #[test]
    fn test_node_metrics_camel_case() {
        let m = NodeMetrics {
            node_id: "A".to_string(),
            in_degree: 1,
            out_degree: 2,
            degree: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["nodeId"], "A");
        assert_eq!(json["inDegree"], 1);
        assert_eq!(json["outDegree"], 2);
    }

    #[test]
    fn test_graph_metrics_default_is_empty_connected() {
        let m = GraphMetrics::default();
        assert_eq!(m.node_count, 0);
        assert!(m.is_connected);
        assert!(m.nodes.is_empty());
        assert_eq!(m.mean_closeness(), 0.0);
    }

    #[test]
    fn test_graph_metrics_lookup_missing() {
        let m = GraphMetrics::default();
        assert!(m.node("nope").is_none());
    }

    #[test]
    fn test_graph_metrics_by_id_matches_node() {
        let m = GraphMetrics {
            node_count: 2,
            nodes: vec![
                NodeMetrics {
                    node_id: "A".into(),
                    degree: 1,
                    ..Default::default()
                },
                NodeMetrics {
                    node_id: "B".into(),
                    degree: 1,
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let index = m.by_id();
        assert_eq!(index.len(), 2);
        for id in ["A", "B"] {
            assert_eq!(index.get(id).copied(), m.node(id));
        }
        assert!(!index.contains_key("C"));
    }

    #[test]
    fn test_diagram_graph_add_node_idempotent() {
        let mut g = DiagramGraph::new();
        let a = g.add_node("A", true);
        let again = g.add_node("A", false);
        assert_eq!(a, again);
        assert_eq!(g.node_count(), 1);
        assert!(g.get_node("A").unwrap().declared);
    }

    #[test]
    fn test_diagram_graph_add_edge_unknown_endpoint() {
        let mut g = DiagramGraph::new();
        g.add_node("A", true);
        assert!(g.add_edge("A", "missing", DiagramEdge::default()).is_none());
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn test_build_warning_display() {
        let w = BuildWarning::InvalidWeight {
            from: "A".into(),
            to: "B".into(),
            original: Some(-2.0),
        };
        assert_eq!(w.to_string(), "edge A -> B has negative weight -2, using 1");

        let w = BuildWarning::ClampedWeight {
            from: "A".into(),
            to: "B".into(),
            original: 1e200,
        };
        assert_eq!(w.to_string(), "edge A -> B weight 1e200 exceeds 1e150, clamped");
    }

    #[test]
    fn test_config_defaults() {
        let q = QueryConfig::default();
        assert!((q.hub_degree_multiplier - 2.0).abs() < f64::EPSILON);
        assert!((q.peripheral_closeness_multiplier - 1.0).abs() < f64::EPSILON);
        assert_eq!(EngineConfig::default().parallel_threshold, 200);
    }
}
