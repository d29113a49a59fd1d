//! Graph topology and centrality metrics.
//!
//! Computes degree, betweenness, closeness, clustering, density and weak
//! connectivity over the node/edge graph implied by a diagram, using petgraph
//! for the directed multigraph and a dense undirected index for path work.
//!
//! ## Architecture
//!
//! ```text
//! Diagram { nodes, edges } ──► builder ──► DiagramGraph (petgraph::DiGraph)
//!                                               │
//!                                 degrees ◄─────┤
//!                                               ▼
//!                                    paths::PathIndex (undirected)
//!                                               │
//!                    betweenness / closeness / clustering / components
//!                                               │
//!                                     GraphMetrics snapshot
//!                                               │
//!                                      queries (hubs, bridges, periphery)
//! ```
//!
//! ## Modules
//!
//! - [`models`] — Input, graph and output types, plus tuning config
//! - [`builder`] — Diagram → `DiagramGraph` with implicit vertices and weight resolution
//! - [`paths`] — BFS/Dijkstra shortest paths, source sweeps, weak components
//! - [`algorithms`] — Degree, Brandes betweenness, closeness, clustering, `compute_all`
//! - [`engine`] — `MetricsEngine` and `calculate_graph_metrics`
//! - [`queries`] — `find_hub_nodes`, `find_bridge_nodes`, `find_peripheral_nodes`
//! - [`extraction`] — JSON/YAML diagram document loading

pub mod algorithms;
pub mod builder;
pub mod engine;
pub mod extraction;
pub mod models;
pub mod paths;
pub mod queries;

// Re-export primary types for convenience
pub use builder::{build_graph, GraphBuilder};
pub use engine::{calculate_graph_metrics, MetricsEngine, MetricsReport};
pub use extraction::{load_diagram, parse_diagram, DiagramFormat, DiagramLoadError};
pub use models::{
    BuildWarning, ComponentInfo, Diagram, DiagramEdge, DiagramGraph, DiagramNode, EdgeRef,
    EngineConfig, GraphMetrics, NodeMetrics, NodeRef, QueryConfig, MAX_EDGE_WEIGHT,
};
pub use queries::{
    find_bridge_nodes, find_hub_nodes, find_hub_nodes_with, find_peripheral_nodes,
    find_peripheral_nodes_with,
};
