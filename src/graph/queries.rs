//! Threshold views over a computed [`GraphMetrics`].
//!
//! The queries never recompute anything: they filter and sort the
//! `NodeMetrics` already present in the snapshot. Each has a `_with` variant
//! taking the tunable default constants from a [`QueryConfig`].

use super::models::{GraphMetrics, NodeMetrics, QueryConfig};

/// Vertices with `degree >= threshold`, highest degree first.
///
/// Default threshold: `hub_degree_multiplier × average_degree`.
pub fn find_hub_nodes(metrics: &GraphMetrics, threshold: Option<f64>) -> Vec<&NodeMetrics> {
    find_hub_nodes_with(metrics, threshold, &QueryConfig::default())
}

pub fn find_hub_nodes_with<'a>(
    metrics: &'a GraphMetrics,
    threshold: Option<f64>,
    config: &QueryConfig,
) -> Vec<&'a NodeMetrics> {
    let threshold =
        threshold.unwrap_or(config.hub_degree_multiplier * metrics.average_degree);
    let mut hubs: Vec<&NodeMetrics> = metrics
        .nodes
        .iter()
        .filter(|m| m.degree as f64 >= threshold)
        .collect();
    hubs.sort_by(|a, b| b.degree.cmp(&a.degree));
    hubs
}

/// Vertices with `betweenness >= threshold` (default 0), highest first.
pub fn find_bridge_nodes(metrics: &GraphMetrics, threshold: Option<f64>) -> Vec<&NodeMetrics> {
    let threshold = threshold.unwrap_or(0.0);
    let mut bridges: Vec<&NodeMetrics> = metrics
        .nodes
        .iter()
        .filter(|m| m.betweenness >= threshold)
        .collect();
    bridges.sort_by(|a, b| b.betweenness.total_cmp(&a.betweenness));
    bridges
}

/// Vertices with `closeness <= threshold`, most peripheral first.
///
/// Default threshold: `peripheral_closeness_multiplier × mean closeness`.
pub fn find_peripheral_nodes(metrics: &GraphMetrics, threshold: Option<f64>) -> Vec<&NodeMetrics> {
    find_peripheral_nodes_with(metrics, threshold, &QueryConfig::default())
}

pub fn find_peripheral_nodes_with<'a>(
    metrics: &'a GraphMetrics,
    threshold: Option<f64>,
    config: &QueryConfig,
) -> Vec<&'a NodeMetrics> {
    let threshold = threshold
        .unwrap_or(config.peripheral_closeness_multiplier * metrics.mean_closeness());
    let mut peripheral: Vec<&NodeMetrics> = metrics
        .nodes
        .iter()
        .filter(|m| m.closeness <= threshold)
        .collect();
    peripheral.sort_by(|a, b| a.closeness.total_cmp(&b.closeness));
    peripheral
}

// ============================================================================
// Tests
// ============================================================================
