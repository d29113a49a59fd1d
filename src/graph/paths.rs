//! Shortest-path substrate shared by the centrality algorithms.
//!
//! [`PathIndex`] is the undirected, dense-index view of a [`DiagramGraph`]:
//! direction is erased, parallel and antiparallel edges collapse to one
//! adjacency carrying the minimum weight, and self-loops are dropped. It is
//! built once per metrics run and only read afterwards.
//!
//! From it, [`PathIndex::single_source`] produces a [`ShortestPaths`] record
//! (distances, shortest-path counts, predecessor sets and settle order) using
//! BFS when every weight is 1 and Dijkstra otherwise. The sweep helpers run
//! one pass per source, on the rayon pool for large graphs.

use petgraph::visit::EdgeRef;
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use super::models::{ComponentInfo, DiagramGraph, EngineConfig};

/// Relative tolerance for treating two weighted path lengths as equal.
const DISTANCE_TOLERANCE: f64 = 1e-9;

/// Number of contiguous source ranges a sweep is split into. Fixed so the
/// summation order, and therefore the result, never depends on thread count.
const SOURCE_CHUNKS: usize = 32;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= DISTANCE_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Undirected adjacency over dense vertex indices.
#[derive(Debug, Clone)]
pub struct PathIndex {
    /// Neighbors sorted by index, one entry per neighbor
    adjacency: Vec<Vec<(usize, f64)>>,
    unit_weights: bool,
}

impl PathIndex {
    pub fn from_graph(graph: &DiagramGraph) -> Self {
        let n = graph.node_count();
        let mut adjacency: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];

        for edge in graph.graph.edge_references() {
            let s = edge.source().index();
            let t = edge.target().index();
            if s == t {
                continue;
            }
            let w = edge.weight().weight;
            adjacency[s].push((t, w));
            adjacency[t].push((s, w));
        }

        for neighbors in adjacency.iter_mut() {
            neighbors.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.total_cmp(&b.1)));
            // Keeps the first entry of each run, i.e. the lightest edge.
            neighbors.dedup_by_key(|&mut (v, _)| v);
        }

        let unit_weights = adjacency.iter().flatten().all(|&(_, w)| w == 1.0);

        Self {
            adjacency,
            unit_weights,
        }
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Distinct undirected neighbors of `v` with their (minimum) weights.
    pub fn neighbors(&self, v: usize) -> &[(usize, f64)] {
        &self.adjacency[v]
    }

    /// Whether `u` and `v` share at least one edge, in either direction.
    pub fn has_edge(&self, u: usize, v: usize) -> bool {
        self.adjacency[u]
            .binary_search_by_key(&v, |&(w, _)| w)
            .is_ok()
    }

    /// True when BFS is used instead of Dijkstra.
    pub fn is_unit_weighted(&self) -> bool {
        self.unit_weights
    }

    /// Shortest paths from `source` to every reachable vertex.
    pub fn single_source(&self, source: usize) -> ShortestPaths {
        if self.unit_weights {
            self.bfs(source)
        } else {
            self.dijkstra(source)
        }
    }

    fn bfs(&self, source: usize) -> ShortestPaths {
        let n = self.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut sigma = vec![0.0f64; n];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        let mut order = Vec::with_capacity(n);
        let mut queue = VecDeque::new();

        dist[source] = 0.0;
        sigma[source] = 1.0;
        queue.push_back(source);

        while let Some(v) = queue.pop_front() {
            order.push(v);
            let next = dist[v] + 1.0;
            for &(w, _) in &self.adjacency[v] {
                if dist[w].is_infinite() {
                    dist[w] = next;
                    queue.push_back(w);
                }
                if dist[w] == next {
                    sigma[w] += sigma[v];
                    preds[w].push(v);
                }
            }
        }

        ShortestPaths::new(source, dist, sigma, preds, order)
    }

    /// Dijkstra keyed on `(distance, hops)`.
    ///
    /// Among paths of equal weight the search prefers fewer edges, so every
    /// vertex gets a key that strictly increases along each shortest-path
    /// step, even across zero-weight edges. Predecessors are derived in a
    /// second pass once every key is final: `u` precedes `w` when
    /// `dist[u] + weight ≈ dist[w]` and `key(u) < key(w)`. Two vertices with
    /// the same key are never on each other's shortest paths, which keeps
    /// the counts independent of vertex numbering.
    fn dijkstra(&self, source: usize) -> ShortestPaths {
        let n = self.node_count();
        let mut dist = vec![f64::INFINITY; n];
        let mut hops = vec![usize::MAX; n];
        let mut settled = vec![false; n];
        let mut order = Vec::with_capacity(n);

        // Non-negative f64 bit patterns sort like the values they encode.
        let mut heap = BinaryHeap::new();
        dist[source] = 0.0;
        hops[source] = 0;
        heap.push(Reverse((0.0f64.to_bits(), 0usize, source)));

        while let Some(Reverse((bits, h, v))) = heap.pop() {
            if settled[v] || bits != dist[v].to_bits() || h != hops[v] {
                continue;
            }
            settled[v] = true;
            order.push(v);

            for &(w, weight) in &self.adjacency[v] {
                if settled[w] {
                    continue;
                }
                let alt = dist[v] + weight;
                if alt < dist[w] || (alt == dist[w] && h + 1 < hops[w]) {
                    dist[w] = alt;
                    hops[w] = h + 1;
                    heap.push(Reverse((alt.to_bits(), h + 1, w)));
                }
            }
        }

        // Settle order is key order, so predecessors are counted first.
        let key = |v: usize| (dist[v], hops[v]);
        let mut sigma = vec![0.0f64; n];
        let mut preds: Vec<Vec<usize>> = vec![Vec::new(); n];
        sigma[source] = 1.0;
        for &w in order.iter().skip(1) {
            for &(u, weight) in &self.adjacency[w] {
                if settled[u] && key(u) < key(w) && approx_eq(dist[u] + weight, dist[w]) {
                    sigma[w] += sigma[u];
                    preds[w].push(u);
                }
            }
        }

        ShortestPaths::new(source, dist, sigma, preds, order)
    }

    /// Run one shortest-path pass per source and sum what `visit` writes into
    /// its accumulator.
    ///
    /// Sources are split into fixed contiguous ranges; each range owns one
    /// O(V) accumulator and ranges are summed in order.
    pub fn accumulate_over_sources<F>(&self, config: &EngineConfig, visit: F) -> Vec<f64>
    where
        F: Fn(&ShortestPaths, &mut [f64]) + Sync,
    {
        let n = self.node_count();
        if n == 0 {
            return vec![];
        }

        let chunk_len = n.div_ceil(SOURCE_CHUNKS);
        let run_range = |start: usize| -> Vec<f64> {
            let mut acc = vec![0.0f64; n];
            for source in start..(start + chunk_len).min(n) {
                let paths = self.single_source(source);
                visit(&paths, &mut acc);
            }
            acc
        };

        let starts: Vec<usize> = (0..n).step_by(chunk_len).collect();
        let partials: Vec<Vec<f64>> = if n >= config.parallel_threshold {
            starts.par_iter().map(|&s| run_range(s)).collect()
        } else {
            starts.iter().map(|&s| run_range(s)).collect()
        };

        partials
            .into_iter()
            .fold(vec![0.0f64; n], |mut total, partial| {
                for (t, p) in total.iter_mut().zip(partial) {
                    *t += p;
                }
                total
            })
    }

    /// Run one shortest-path pass per source and collect one value per source.
    pub fn map_sources<T, F>(&self, config: &EngineConfig, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(&ShortestPaths) -> T + Sync + Send,
    {
        let n = self.node_count();
        if n >= config.parallel_threshold {
            (0..n)
                .into_par_iter()
                .map(|s| f(&self.single_source(s)))
                .collect()
        } else {
            (0..n).map(|s| f(&self.single_source(s))).collect()
        }
    }
}

/// Result of a single-source shortest-path pass.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    pub source: usize,
    /// `None` for vertices unreachable from the source
    pub dist: Vec<Option<f64>>,
    /// Number of distinct shortest paths from the source (0.0 if unreachable)
    pub sigma: Vec<f64>,
    /// Predecessors of each vertex on its shortest paths
    pub preds: Vec<Vec<usize>>,
    /// Reachable vertices in settle order, source first
    pub order: Vec<usize>,
}

impl ShortestPaths {
    fn new(
        source: usize,
        dist: Vec<f64>,
        sigma: Vec<f64>,
        preds: Vec<Vec<usize>>,
        order: Vec<usize>,
    ) -> Self {
        Self {
            source,
            dist: dist
                .into_iter()
                .map(|d| d.is_finite().then_some(d))
                .collect(),
            sigma,
            preds,
            order,
        }
    }

    pub fn distance(&self, target: usize) -> Option<f64> {
        self.dist[target]
    }

    pub fn path_count(&self, target: usize) -> f64 {
        self.sigma[target]
    }

    /// `(vertex, distance)` for every reachable vertex other than the source.
    pub fn reachable(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.order
            .iter()
            .skip(1)
            .filter_map(|&v| self.dist[v].map(|d| (v, d)))
    }
}

// ============================================================================
// Weak connectivity
// ============================================================================

/// Identify weakly connected components, largest first.
pub fn weakly_connected_components(index: &PathIndex, graph: &DiagramGraph) -> Vec<ComponentInfo> {
    let n = index.node_count();
    if n == 0 {
        return vec![];
    }

    let mut component_of: Vec<Option<u32>> = vec![None; n];
    let mut component_id = 0u32;

    for start in 0..n {
        if component_of[start].is_some() {
            continue;
        }
        let mut queue = VecDeque::new();
        queue.push_back(start);
        component_of[start] = Some(component_id);

        while let Some(current) = queue.pop_front() {
            for &(neighbor, _) in index.neighbors(current) {
                if component_of[neighbor].is_none() {
                    component_of[neighbor] = Some(component_id);
                    queue.push_back(neighbor);
                }
            }
        }
        component_id += 1;
    }

    let mut comp_members: HashMap<u32, Vec<String>> = HashMap::new();
    for idx in graph.graph.node_indices() {
        let comp = component_of[idx.index()].unwrap_or(0);
        comp_members
            .entry(comp)
            .or_default()
            .push(graph.graph[idx].id.clone());
    }

    let max_size = comp_members.values().map(|v| v.len()).max().unwrap_or(0);

    let mut components: Vec<ComponentInfo> = comp_members
        .into_iter()
        .map(|(id, members)| ComponentInfo {
            id,
            size: members.len(),
            is_main: members.len() == max_size,
            members,
        })
        .collect();
    // Ids follow discovery order, which makes the tie-break deterministic.
    components.sort_by_key(|c| (Reverse(c.size), c.id));
    components
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::builder::build_graph;
    use crate::graph::models::Diagram;

    fn index_of(diagram: &Diagram) -> (DiagramGraph, PathIndex) {
        let (graph, _) = build_graph(diagram);
        let index = PathIndex::from_graph(&graph);
        (graph, index)
    }

    #[test]
    fn test_undirected_view_collapses_duplicates_and_loops() {
        let d = Diagram::from_edges(&[("A", "B"), ("B", "A"), ("A", "B"), ("A", "A")]);
        let (_, index) = index_of(&d);
        assert_eq!(index.neighbors(0), &[(1, 1.0)]);
        assert_eq!(index.neighbors(1), &[(0, 1.0)]);
        assert!(index.has_edge(0, 1));
        assert!(!index.has_edge(0, 0));
    }

    #[test]
    fn test_parallel_edges_keep_lightest() {
        let d = Diagram::new()
            .with_weighted_edge("A", "B", 5.0)
            .with_weighted_edge("B", "A", 2.0);
        let (_, index) = index_of(&d);
        assert_eq!(index.neighbors(0), &[(1, 2.0)]);
        assert!(!index.is_unit_weighted());
    }

    #[test]
    fn test_bfs_ignores_direction() {
        // A → B ← C : C is reachable from A through B on the undirected view.
        let d = Diagram::from_edges(&[("A", "B"), ("C", "B")]);
        let (_, index) = index_of(&d);
        let paths = index.single_source(0);
        assert_eq!(paths.distance(1), Some(1.0));
        assert_eq!(paths.distance(2), Some(2.0));
        assert_eq!(paths.order, vec![0, 1, 2]);
    }

    #[test]
    fn test_bfs_counts_shortest_paths() {
        // Diamond: A-B, A-C, B-D, C-D → two shortest paths A..D
        let d = Diagram::from_edges(&[("A", "B"), ("A", "C"), ("B", "D"), ("C", "D")]);
        let (_, index) = index_of(&d);
        let paths = index.single_source(0);
        assert_eq!(paths.distance(3), Some(2.0));
        assert_eq!(paths.path_count(3), 2.0);
        let mut preds = paths.preds[3].clone();
        preds.sort_unstable();
        assert_eq!(preds, vec![1, 2]);
    }

    #[test]
    fn test_unreachable_has_no_distance() {
        let d = Diagram::from_edges(&[("A", "B"), ("C", "D")]);
        let (_, index) = index_of(&d);
        let paths = index.single_source(0);
        assert_eq!(paths.distance(2), None);
        assert_eq!(paths.path_count(2), 0.0);
        let reachable: Vec<(usize, f64)> = paths.reachable().collect();
        assert_eq!(reachable, vec![(1, 1.0)]);
    }

    #[test]
    fn test_dijkstra_prefers_light_detour() {
        // A-B costs 10, A-C-B costs 2
        let d = Diagram::new()
            .with_weighted_edge("A", "B", 10.0)
            .with_weighted_edge("A", "C", 1.0)
            .with_weighted_edge("C", "B", 1.0);
        let (g, index) = index_of(&d);
        let a = g.get_index("A").unwrap().index();
        let b = g.get_index("B").unwrap().index();
        let c = g.get_index("C").unwrap().index();
        let paths = index.single_source(a);
        assert_eq!(paths.distance(b), Some(2.0));
        assert_eq!(paths.preds[b], vec![c]);
        assert_eq!(paths.path_count(b), 1.0);
    }

    #[test]
    fn test_dijkstra_counts_tied_paths() {
        let d = Diagram::new()
            .with_weighted_edge("S", "X", 0.1)
            .with_weighted_edge("X", "T", 0.2)
            .with_weighted_edge("S", "Y", 0.2)
            .with_weighted_edge("Y", "T", 0.1);
        let (g, index) = index_of(&d);
        let s = g.get_index("S").unwrap().index();
        let t = g.get_index("T").unwrap().index();
        let paths = index.single_source(s);
        assert!(approx_eq(paths.distance(t).unwrap(), 0.3));
        assert_eq!(paths.path_count(t), 2.0);
    }

    #[test]
    fn test_dijkstra_zero_weight_edges() {
        let d = Diagram::new()
            .with_weighted_edge("A", "B", 0.0)
            .with_weighted_edge("B", "C", 2.0);
        let (_, index) = index_of(&d);
        let paths = index.single_source(0);
        assert_eq!(paths.distance(1), Some(0.0));
        assert_eq!(paths.distance(2), Some(2.0));
        assert_eq!(paths.path_count(2), 1.0);
    }

    #[test]
    fn test_dijkstra_zero_weight_between_equal_distances() {
        // S-A and S-B cost 1, A-B costs 0: A and B share key (1, 1), so
        // neither lies on the other's shortest path, in either numbering.
        for order in [["S", "A", "B"], ["S", "B", "A"]] {
            let mut d = Diagram::new();
            for id in order {
                d = d.with_node(id);
            }
            let d = d
                .with_weighted_edge("S", "A", 1.0)
                .with_weighted_edge("S", "B", 1.0)
                .with_weighted_edge("A", "B", 0.0);
            let (g, index) = index_of(&d);
            let s = g.get_index("S").unwrap().index();
            let a = g.get_index("A").unwrap().index();
            let b = g.get_index("B").unwrap().index();
            let paths = index.single_source(s);
            assert_eq!(paths.preds[a], vec![s]);
            assert_eq!(paths.preds[b], vec![s]);
            assert_eq!(paths.path_count(a), 1.0);
            assert_eq!(paths.path_count(b), 1.0);
        }
    }

    #[test]
    fn test_dijkstra_zero_weight_extends_path() {
        // S -1- A -0- B: B is one hop past A at the same distance.
        let d = Diagram::new()
            .with_weighted_edge("S", "A", 1.0)
            .with_weighted_edge("A", "B", 0.0);
        let (_, index) = index_of(&d);
        let paths = index.single_source(0);
        assert_eq!(paths.distance(2), Some(1.0));
        assert_eq!(paths.preds[2], vec![1]);
        assert_eq!(paths.path_count(2), 1.0);
        assert_eq!(paths.order, vec![0, 1, 2]);
    }

    #[test]
    fn test_components_disconnected() {
        let d = Diagram::from_edges(&[("c1_a", "c1_b"), ("c1_b", "c1_c"), ("c2_x", "c2_y")]);
        let (g, index) = index_of(&d);
        let components = weakly_connected_components(&index, &g);

        assert_eq!(components.len(), 2);
        assert_eq!(components[0].size, 3);
        assert!(components[0].is_main);
        assert_eq!(components[1].members, vec!["c2_x", "c2_y"]);
        assert!(!components[1].is_main);
    }

    #[test]
    fn test_components_trivial_cases() {
        let (g, empty) = index_of(&Diagram::new());
        assert!(weakly_connected_components(&empty, &g).is_empty());
        let (g, single) = index_of(&Diagram::new().with_node("A"));
        assert_eq!(weakly_connected_components(&single, &g).len(), 1);
        let (g, chain) = index_of(&Diagram::from_edges(&[("A", "B"), ("C", "B")]));
        let components = weakly_connected_components(&chain, &g);
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].members, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_sweep_parallel_matches_sequential() {
        let pairs: Vec<(String, String)> = (0..60)
            .flat_map(|i| {
                [1usize, 7, 13]
                    .into_iter()
                    .map(move |o| (format!("n{}", i), format!("n{}", (i + o) % 60)))
            })
            .collect();
        let refs: Vec<(&str, &str)> = pairs.iter().map(|(a, b)| (a.as_str(), b.as_str())).collect();
        let (_, index) = index_of(&Diagram::from_edges(&refs));

        let count_reachable = |paths: &ShortestPaths, acc: &mut [f64]| {
            for (v, _) in paths.reachable() {
                acc[v] += 1.0;
            }
        };
        let sequential = index.accumulate_over_sources(
            &EngineConfig {
                parallel_threshold: usize::MAX,
            },
            count_reachable,
        );
        let parallel = index.accumulate_over_sources(
            &EngineConfig {
                parallel_threshold: 0,
            },
            count_reachable,
        );
        assert_eq!(sequential, parallel);
        assert!(sequential.iter().all(|&c| c == 59.0));
    }
}
