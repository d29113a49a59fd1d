//! Diagram → petgraph conversion.
//!
//! Turns the flat node/edge list of a [`Diagram`] into a [`DiagramGraph`]:
//!
//! - Declared nodes become vertices in declaration order.
//! - Edge endpoints that were never declared are promoted to vertices the
//!   first time they are seen (`from` before `to`).
//! - Every edge is kept, duplicates included.
//! - Missing weights resolve to 1.0; negative or non-finite weights are
//!   clamped to 1.0 and weights above [`MAX_EDGE_WEIGHT`] are lowered to it.
//!   Both are reported as [`BuildWarning`]s.

use super::models::{BuildWarning, Diagram, DiagramEdge, DiagramGraph, EdgeRef, MAX_EDGE_WEIGHT};

/// Builds the analysed graph from a diagram.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    warnings: Vec<BuildWarning>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the graph. Returns the graph and any warnings raised while
    /// resolving edge weights.
    pub fn build(mut self, diagram: &Diagram) -> (DiagramGraph, Vec<BuildWarning>) {
        let mut graph = DiagramGraph::with_capacity(
            diagram.nodes.len() + diagram.edges.len(),
            diagram.edges.len(),
        );

        for node in &diagram.nodes {
            graph.add_node(&node.id, true);
        }

        for edge in &diagram.edges {
            graph.add_node(&edge.from, false);
            graph.add_node(&edge.to, false);
            let weight = self.resolve_weight(edge);
            // Both endpoints were just inserted.
            graph.add_edge(&edge.from, &edge.to, DiagramEdge { weight });
        }

        tracing::debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            implicit = graph.graph.node_weights().filter(|n| !n.declared).count(),
            "Built diagram graph"
        );

        (graph, self.warnings)
    }

    fn resolve_weight(&mut self, edge: &EdgeRef) -> f64 {
        match edge.weight {
            None => 1.0,
            // abs() folds -0.0 into 0.0 so heap keys order correctly
            Some(w) if (0.0..=MAX_EDGE_WEIGHT).contains(&w) => w.abs(),
            Some(w) if w.is_finite() && w > MAX_EDGE_WEIGHT => {
                let warning = BuildWarning::ClampedWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    original: w,
                };
                tracing::warn!("{}", warning);
                self.warnings.push(warning);
                MAX_EDGE_WEIGHT
            }
            Some(w) => {
                let warning = BuildWarning::InvalidWeight {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    original: w.is_finite().then_some(w),
                };
                tracing::warn!("{}", warning);
                self.warnings.push(warning);
                1.0
            }
        }
    }
}

/// Convenience wrapper around [`GraphBuilder::build`].
pub fn build_graph(diagram: &Diagram) -> (DiagramGraph, Vec<BuildWarning>) {
    GraphBuilder::new().build(diagram)
}

// ============================================================================
// Tests
// ============================================================================
