//! Graph metrics algorithms.
//!
//! Implements the structural metrics on a [`DiagramGraph`]:
//! - **Degree** — in/out/total per vertex, average degree and density
//! - **Betweenness centrality** — Brandes' dependency accumulation, raw totals
//! - **Closeness centrality** — reachable / Σ distance per vertex
//! - **Clustering coefficient** — local clustering on the undirected view
//!
//! Degree works on the directed multigraph. The path-based metrics and
//! clustering work on the undirected [`PathIndex`]. All per-vertex results are
//! vectors indexed by `NodeIndex::index()`.

use petgraph::Direction;
use std::cmp::Reverse;

use super::models::{ComponentInfo, DiagramGraph, EngineConfig, GraphMetrics, NodeMetrics};
use super::paths::{weakly_connected_components, PathIndex, ShortestPaths};

// ============================================================================
// Degree
// ============================================================================

/// `(in_degree, out_degree)` for every vertex. Parallel edges count
/// individually; a self-loop adds one to each side.
pub fn degrees(graph: &DiagramGraph) -> Vec<(usize, usize)> {
    let g = &graph.graph;
    g.node_indices()
        .map(|idx| {
            (
                g.edges_directed(idx, Direction::Incoming).count(),
                g.edges_directed(idx, Direction::Outgoing).count(),
            )
        })
        .collect()
}

/// Edges per vertex (0.0 for an empty graph).
pub fn average_degree(node_count: usize, edge_count: usize) -> f64 {
    if node_count == 0 {
        return 0.0;
    }
    edge_count as f64 / node_count as f64
}

/// Edges over the `n·(n−1)` ordered pairs (0.0 for fewer than two vertices).
pub fn density(node_count: usize, edge_count: usize) -> f64 {
    if node_count <= 1 {
        return 0.0;
    }
    edge_count as f64 / (node_count * (node_count - 1)) as f64
}

// ============================================================================
// Betweenness Centrality (Brandes)
// ============================================================================

/// Add one source's dependencies to `acc`, walking the shortest-path DAG
/// from the farthest vertex back to the source.
fn accumulate_dependencies(paths: &ShortestPaths, acc: &mut [f64]) {
    let mut delta = vec![0.0f64; acc.len()];
    for &w in paths.order.iter().rev() {
        let sigma_w = paths.sigma[w];
        if sigma_w > 0.0 {
            let coeff = (1.0 + delta[w]) / sigma_w;
            for &v in &paths.preds[w] {
                delta[v] += paths.sigma[v] * coeff;
            }
        }
        if w != paths.source {
            acc[w] += delta[w];
        }
    }
}

/// Compute betweenness centrality for all vertices.
///
/// Raw Brandes totals over every ordered `(s, t)` pair of the undirected
/// view; endpoints never score for their own pair.
pub fn betweenness_centrality(index: &PathIndex, config: &EngineConfig) -> Vec<f64> {
    index.accumulate_over_sources(config, accumulate_dependencies)
}

// ============================================================================
// Closeness Centrality
// ============================================================================

fn closeness_of(paths: &ShortestPaths) -> f64 {
    let (reachable, total) = paths
        .reachable()
        .fold((0usize, 0.0f64), |(count, sum), (_, d)| (count + 1, sum + d));
    // total is 0 only when every reachable vertex sits behind zero-weight edges
    if reachable == 0 || total <= 0.0 {
        0.0
    } else {
        reachable as f64 / total
    }
}

/// Compute closeness centrality for all vertices.
pub fn closeness_centrality(index: &PathIndex, config: &EngineConfig) -> Vec<f64> {
    index.map_sources(config, closeness_of)
}

// ============================================================================
// Clustering Coefficient
// ============================================================================

/// Compute the local clustering coefficient for each vertex.
///
/// coefficient = linked neighbor pairs / (k·(k−1)/2) for the k distinct
/// undirected neighbors; 0.0 when k < 2.
pub fn clustering_coefficient(index: &PathIndex) -> Vec<f64> {
    (0..index.node_count())
        .map(|v| {
            let neighbors = index.neighbors(v);
            let k = neighbors.len();
            if k < 2 {
                return 0.0;
            }

            let mut links = 0usize;
            for i in 0..k {
                for j in (i + 1)..k {
                    if index.has_edge(neighbors[i].0, neighbors[j].0) {
                        links += 1;
                    }
                }
            }

            links as f64 / (k * (k - 1) / 2) as f64
        })
        .collect()
}

// ============================================================================
// Orchestrator: compute_all
// ============================================================================

/// Run every metric and assemble the `GraphMetrics` snapshot plus the weak
/// component breakdown.
///
/// The undirected index is built once and shared by betweenness, closeness,
/// clustering and connectivity.
pub fn compute_all(graph: &DiagramGraph, config: &EngineConfig) -> (GraphMetrics, Vec<ComponentInfo>) {
    let start = std::time::Instant::now();
    let g = &graph.graph;
    let index = PathIndex::from_graph(graph);

    let degree = degrees(graph);
    let bc = betweenness_centrality(&index, config);
    let cc = closeness_centrality(&index, config);
    let clustering = clustering_coefficient(&index);
    let components = weakly_connected_components(&index, graph);
    let is_connected = components.len() <= 1;

    let mut nodes: Vec<NodeMetrics> = g
        .node_indices()
        .map(|idx| {
            let i = idx.index();
            let (in_degree, out_degree) = degree[i];
            NodeMetrics {
                node_id: g[idx].id.clone(),
                in_degree,
                out_degree,
                degree: in_degree + out_degree,
                betweenness: bc[i],
                closeness: cc[i],
                clustering: clustering[i],
            }
        })
        .collect();
    // Stable: equal degrees keep vertex order.
    nodes.sort_by_key(|m| Reverse(m.degree));

    let node_count = graph.node_count();
    let edge_count = graph.edge_count();

    tracing::debug!(
        nodes = node_count,
        edges = edge_count,
        weighted = !index.is_unit_weighted(),
        components = components.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Computed graph metrics"
    );

    (
        GraphMetrics {
            node_count,
            edge_count,
            average_degree: average_degree(node_count, edge_count),
            density: density(node_count, edge_count),
            is_connected,
            nodes,
        },
        components,
    )
}

// ============================================================================
// Tests
// ============================================================================
