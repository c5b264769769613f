//! Maximum Flow via Edmonds-Karp
//!
//! This module implements the Ford-Fulkerson method with breadth-first
//! augmenting path selection (Edmonds-Karp) over a dense residual matrix.
//!
//! # Theoretical Foundation
//!
//! Each iteration finds a source-to-sink path of strictly positive residual
//! capacity, pushes the path's bottleneck along it and credits the same amount
//! to every reverse arc. Reverse residual capacity is what allows later paths
//! to cancel flow pushed earlier, which is required for optimality.
//!
//! Choosing the path by BFS (ties broken by smallest vertex index) makes the
//! shortest augmenting path distance non-decreasing, bounding the number of
//! augmentations by O(V·E) regardless of capacity values.
//!
//! # Algorithmic Complexity
//!
//! - **Search**: O(V²) per BFS on the dense matrix
//! - **Augmentations**: O(V·E)
//! - **Space**: O(V²) for capacity, residual and existence matrices
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::collections::VecDeque;

use log::{debug, info, trace};
use serde::{Deserialize, Serialize};

use crate::algorithm::traits::{
    parse_bool_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmMetrics,
    AlgorithmParameter, AlgorithmProfiler, NodeId, ParameterType,
};
use crate::data_structures::graph::{Capacity, Edge, FlowNetwork};
use crate::data_structures::matrix::SquareMatrix;
use crate::validation::network::NetworkError;

/// Outcome of one breadth-first search over the residual graph
#[derive(Debug, Clone)]
pub struct AugmentingPath {
    /// BFS tree parent of every discovered vertex; `None` for the source and
    /// for undiscovered vertices
    predecessors: Vec<Option<NodeId>>,
    /// Vertices discovered from the source
    visited: Vec<bool>,
    reached_sink: bool,
    /// Vertices dequeued during the search
    explored: usize,
}

impl AugmentingPath {
    /// Whether the sink is reachable through positive residual arcs
    #[inline]
    pub fn reached_sink(&self) -> bool {
        self.reached_sink
    }

    pub fn predecessor(&self, vertex: NodeId) -> Option<NodeId> {
        self.predecessors[vertex]
    }

    pub fn is_visited(&self, vertex: NodeId) -> bool {
        self.visited[vertex]
    }

    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Arcs of the path ending at `sink`, walked backward from the sink
    ///
    /// Only meaningful when [`reached_sink`](Self::reached_sink) is true.
    pub fn arcs_to(&self, sink: NodeId) -> Vec<(NodeId, NodeId)> {
        let mut arcs = Vec::new();
        let mut vertex = sink;
        while let Some(parent) = self.predecessors[vertex] {
            arcs.push((parent, vertex));
            vertex = parent;
        }
        arcs
    }

    /// Vertices of the path from source to `sink`
    pub fn vertices_to(&self, sink: NodeId) -> Vec<NodeId> {
        let mut vertices: Vec<NodeId> = self.arcs_to(sink).into_iter().map(|(_, v)| v).collect();
        let mut origin = sink;
        while let Some(parent) = self.predecessors[origin] {
            origin = parent;
        }
        vertices.push(origin);
        vertices.reverse();
        vertices
    }
}

/// Breadth-first search for an augmenting path
///
/// Treats every `residual[u][v] > 0` as a traversable arc and scans neighbours
/// in increasing index order. Stops as soon as the sink is discovered; the
/// predecessor chain of the sink is identical to a full traversal's.
pub fn find_augmenting_path(
    residual: &SquareMatrix<Capacity>,
    source: NodeId,
    sink: NodeId,
) -> AugmentingPath {
    let n = residual.order();
    let mut predecessors = vec![None; n];
    let mut visited = vec![false; n];
    let mut explored = 0;

    let mut queue = VecDeque::new();
    queue.push_back(source);
    visited[source] = true;

    'search: while let Some(vertex) = queue.pop_front() {
        explored += 1;

        for (next, &remaining) in residual.row(vertex).iter().enumerate() {
            if !visited[next] && remaining > 0 {
                visited[next] = true;
                predecessors[next] = Some(vertex);
                if next == sink {
                    break 'search;
                }
                queue.push_back(next);
            }
        }
    }

    AugmentingPath {
        predecessors,
        reached_sink: source != sink && visited[sink],
        visited,
        explored,
    }
}

/// Push flow along BFS augmenting paths until none remains
///
/// Mutates `residual` in place; the caller reads the final matrix afterwards.
/// Returns the total flow pushed from `source` to `sink`.
///
/// `residual` must start from capacities no larger than
/// [`Weight::MAX`](crate::data_structures::Weight) so
/// that reverse credits and the running total stay within [`Capacity`].
pub fn augment_to_max_flow(
    residual: &mut SquareMatrix<Capacity>,
    source: NodeId,
    sink: NodeId,
    profiler: &mut AlgorithmProfiler,
) -> Capacity {
    if source == sink {
        debug!("Source and sink coincide at vertex {}; no flow to push", source);
        return 0;
    }

    let mut total: Capacity = 0;

    loop {
        let search = find_augmenting_path(residual, source, sink);
        profiler.record_nodes_explored(search.explored());
        if !search.reached_sink() {
            break;
        }

        let arcs = search.arcs_to(sink);
        let bottleneck = arcs
            .iter()
            .map(|&(u, v)| residual[(u, v)])
            .min()
            .unwrap_or(0);
        if bottleneck == 0 {
            break;
        }

        for &(u, v) in &arcs {
            residual[(u, v)] -= bottleneck;
            residual[(v, u)] += bottleneck;
        }

        total += bottleneck;
        profiler.record_step();
        trace!(
            "Augmented {} units along {:?}",
            bottleneck,
            search.vertices_to(sink)
        );
    }

    debug!("No augmenting path remains; pushed {} units in total", total);
    total
}

/// Validate `edges` and return the flow carried by each original edge
///
/// The result holds one edge per input edge in row-major `(from, to)` order,
/// with `weight` replaced by the computed flow.
pub fn solve_max_flow(edges: &[Edge], num_vertices: usize) -> Result<Vec<Edge>, NetworkError> {
    let mut network = FlowNetwork::from_edges(edges, num_vertices)?;
    let (source, sink) = (network.source(), network.sink());
    augment_to_max_flow(network.residual_mut(), source, sink, &mut AlgorithmProfiler::new());
    Ok(network.flow_edges())
}

/// Solver configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Check conservation and boundary balance after solving
    pub verify_flow: bool,
    /// Report the source side of a minimum cut
    pub compute_min_cut: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            verify_flow: true,
            compute_min_cut: true,
        }
    }
}

/// Flow algorithm performance metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowMetrics {
    /// Number of augmenting paths applied
    pub augmenting_paths: usize,
    /// Vertices dequeued over every breadth-first search
    pub vertices_explored: usize,
    /// Algorithm execution time
    pub execution_time_ms: f64,
}

impl From<AlgorithmMetrics> for FlowMetrics {
    fn from(metrics: AlgorithmMetrics) -> Self {
        Self {
            augmenting_paths: metrics.steps_executed,
            vertices_explored: metrics.nodes_explored,
            execution_time_ms: metrics.execution_time.as_secs_f64() * 1000.0,
        }
    }
}

/// Maximum flow result with detailed flow information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaxFlowResult {
    /// Maximum flow value
    pub flow_value: Capacity,
    pub source: NodeId,
    pub sink: NodeId,
    /// Flow per original edge, row-major
    pub flow_edges: Vec<Edge>,
    /// Vertices reachable from the source in the final residual graph
    pub min_cut_source_side: Vec<NodeId>,
    pub metrics: FlowMetrics,
}

/// Edmonds-Karp maximum flow solver
#[derive(Debug, Clone, Default)]
pub struct MaxFlowSolver {
    config: SolverConfig,
}

impl MaxFlowSolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Validate and solve a network given as an edge list
    pub fn solve(&self, edges: &[Edge], num_vertices: usize) -> Result<MaxFlowResult, AlgorithmError> {
        let mut network = FlowNetwork::from_edges(edges, num_vertices)?;
        let (source, sink) = (network.source(), network.sink());

        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        let flow_value = augment_to_max_flow(network.residual_mut(), source, sink, &mut profiler);
        profiler.stop();

        if self.config.verify_flow {
            verify_flow(&network, flow_value)?;
        }

        let min_cut_source_side = if self.config.compute_min_cut {
            let search = find_augmenting_path(network.residual(), source, sink);
            (0..network.num_vertices())
                .filter(|&v| search.is_visited(v))
                .collect()
        } else {
            Vec::new()
        };

        let metrics = FlowMetrics::from(profiler.get_metrics());
        info!(
            "Maximum flow {} from {} to {} after {} augmenting paths",
            flow_value, source, sink, metrics.augmenting_paths
        );

        Ok(MaxFlowResult {
            flow_value,
            source,
            sink,
            flow_edges: network.flow_edges(),
            min_cut_source_side,
            metrics,
        })
    }
}

/// Check conservation at internal vertices and balance at the boundary
fn verify_flow(network: &FlowNetwork, pushed: Capacity) -> Result<(), AlgorithmError> {
    let (source, sink) = (network.source(), network.sink());

    for vertex in (0..network.num_vertices()).filter(|&v| v != source && v != sink) {
        let (inflow, outflow) = network.flow_balance(vertex);
        if inflow != outflow {
            return Err(AlgorithmError::InvariantViolation(format!(
                "vertex {vertex} receives {inflow} but emits {outflow}"
            )));
        }
    }

    let leaving = network.flow_value();
    let (entering, _) = network.flow_balance(sink);
    if leaving != entering || leaving != pushed {
        return Err(AlgorithmError::InvariantViolation(format!(
            "source emits {leaving}, sink receives {entering}, engine pushed {pushed}"
        )));
    }

    Ok(())
}

impl Algorithm for MaxFlowSolver {
    fn name(&self) -> &'static str {
        "Edmonds-Karp"
    }

    fn category(&self) -> &'static str {
        "max_flow"
    }

    fn description(&self) -> String {
        "Maximum flow by breadth-first augmenting paths over a dense residual matrix, \
         with reverse-arc flow cancellation."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(V·E) augmentations × O(V²) per search".to_string(),
            space_complexity: "O(V²)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![
            AlgorithmParameter {
                name: "verify_flow".to_string(),
                value: self.config.verify_flow.to_string(),
                value_type: ParameterType::Boolean,
                description: "Check flow conservation after solving".to_string(),
            },
            AlgorithmParameter {
                name: "compute_min_cut".to_string(),
                value: self.config.compute_min_cut.to_string(),
                value_type: ParameterType::Boolean,
                description: "Report the source side of a minimum cut".to_string(),
            },
        ]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "verify_flow" => self.config.verify_flow = parse_bool_parameter(name, value)?,
            "compute_min_cut" => self.config.compute_min_cut = parse_bool_parameter(name, value)?,
            _ => {
                return Err(AlgorithmError::InvalidParameter {
                    name: name.to_string(),
                    reason: "unknown parameter".to_string(),
                })
            }
        }
        Ok(())
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "verify_flow" => Some(self.config.verify_flow.to_string()),
            "compute_min_cut" => Some(self.config.compute_min_cut.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structures::graph::Weight;

    fn edges(list: &[(NodeId, NodeId, Weight)]) -> Vec<Edge> {
        list.iter().copied().map(Edge::from).collect()
    }

    fn total_out_of(flow: &[Edge], vertex: NodeId) -> Capacity {
        flow.iter().filter(|e| e.from == vertex).map(|e| Capacity::from(e.weight)).sum()
    }

    fn total_into(flow: &[Edge], vertex: NodeId) -> Capacity {
        flow.iter().filter(|e| e.to == vertex).map(|e| Capacity::from(e.weight)).sum()
    }

    fn demo_network() -> Vec<Edge> {
        edges(&[
            (3, 5, 5),
            (3, 0, 10),
            (0, 5, 5),
            (5, 4, 10),
            (0, 4, 3),
            (0, 1, 1),
            (4, 1, 20),
            (4, 2, 5),
            (1, 2, 7),
        ])
    }

    /// Crossing arc 1 -> 3 is saturated by the first BFS path and must be
    /// cancelled by the second.
    fn cancellation_network() -> Vec<Edge> {
        edges(&[(0, 1, 1), (0, 2, 1), (1, 3, 1), (1, 4, 1), (2, 3, 1), (3, 5, 1), (4, 5, 1)])
    }

    #[test]
    fn test_classic_small_network() {
        let input = edges(&[(0, 1, 3), (0, 2, 2), (1, 2, 5), (1, 3, 2), (2, 3, 3)]);
        let flow = solve_max_flow(&input, 4).unwrap();

        // Both {0} and {3} are cuts of capacity 5.
        assert_eq!(total_out_of(&flow, 0), 5);
        assert_eq!(total_into(&flow, 3), 5);
    }

    #[test]
    fn test_demo_network() {
        let flow = solve_max_flow(&demo_network(), 6).unwrap();

        assert_eq!(flow.len(), 9);
        assert_eq!(total_out_of(&flow, 3), 12);
        assert_eq!(total_into(&flow, 2), 12);
    }

    #[test]
    fn test_output_is_row_major_over_original_edges() {
        let flow = solve_max_flow(&demo_network(), 6).unwrap();
        let pairs: Vec<(NodeId, NodeId)> = flow.iter().map(|e| (e.from, e.to)).collect();

        assert_eq!(
            pairs,
            vec![(0, 1), (0, 4), (0, 5), (1, 2), (3, 0), (3, 5), (4, 1), (4, 2), (5, 4)]
        );
    }

    #[test]
    fn test_flow_respects_capacity_and_conservation() {
        for (input, n) in [(demo_network(), 6), (cancellation_network(), 6)] {
            let flow = solve_max_flow(&input, n).unwrap();

            for edge in &flow {
                let capacity = input
                    .iter()
                    .find(|e| e.from == edge.from && e.to == edge.to)
                    .map(|e| e.weight)
                    .unwrap();
                assert!(edge.weight <= capacity, "{edge} exceeds capacity {capacity}");
            }

            let network = FlowNetwork::from_edges(&input, n).unwrap();
            for vertex in 0..n {
                if vertex != network.source() && vertex != network.sink() {
                    assert_eq!(total_into(&flow, vertex), total_out_of(&flow, vertex));
                }
            }
        }
    }

    #[test]
    fn test_reverse_arc_cancels_earlier_flow() {
        let result = MaxFlowSolver::new().solve(&cancellation_network(), 6).unwrap();

        assert_eq!(result.flow_value, 2);
        assert_eq!(result.metrics.augmenting_paths, 2);

        let flow_on = |from: NodeId, to: NodeId| {
            result
                .flow_edges
                .iter()
                .find(|e| e.from == from && e.to == to)
                .map(|e| e.weight)
                .unwrap()
        };
        assert_eq!(flow_on(1, 3), 0);
        assert_eq!(flow_on(1, 4), 1);
        assert_eq!(flow_on(2, 3), 1);
    }

    #[test]
    fn test_bfs_prefers_smallest_index_and_shortest_path() {
        let network = FlowNetwork::from_edges(&cancellation_network(), 6).unwrap();
        let search = find_augmenting_path(network.residual(), 0, 5);

        assert!(search.reached_sink());
        assert_eq!(search.vertices_to(5), vec![0, 1, 3, 5]);
        assert_eq!(search.arcs_to(5), vec![(3, 5), (1, 3), (0, 1)]);
        assert_eq!(search.predecessor(0), None);
    }

    #[test]
    fn test_search_reports_unreachable_sink() {
        let mut residual = SquareMatrix::filled(3, 0);
        residual[(0, 1)] = 4;

        let search = find_augmenting_path(&residual, 0, 2);
        assert!(!search.reached_sink());
        assert!(search.is_visited(1));
        assert!(!search.is_visited(2));
        assert_eq!(search.explored(), 2);
    }

    #[test]
    fn test_engine_is_noop_when_source_is_sink() {
        let mut residual = SquareMatrix::filled(2, 1);
        let mut profiler = AlgorithmProfiler::new();

        assert_eq!(augment_to_max_flow(&mut residual, 0, 0, &mut profiler), 0);
        assert_eq!(profiler.get_metrics().steps_executed, 0);
    }

    #[test]
    fn test_repeated_solves_agree() {
        let solver = MaxFlowSolver::new();
        let first = solver.solve(&demo_network(), 6).unwrap();
        let second = solver.solve(&demo_network(), 6).unwrap();

        assert_eq!(first.flow_value, second.flow_value);
        assert_eq!(first.flow_edges, second.flow_edges);
    }

    #[test]
    fn test_min_cut_capacity_matches_flow() {
        let input = demo_network();
        let result = MaxFlowSolver::new().solve(&input, 6).unwrap();

        assert!(result.min_cut_source_side.contains(&result.source));
        assert!(!result.min_cut_source_side.contains(&result.sink));

        let cut: Capacity = input
            .iter()
            .filter(|e| {
                result.min_cut_source_side.contains(&e.from) && !result.min_cut_source_side.contains(&e.to)
            })
            .map(|e| Capacity::from(e.weight))
            .sum();
        assert_eq!(cut, result.flow_value);
    }

    #[test]
    fn test_min_cut_can_be_disabled() {
        let mut solver = MaxFlowSolver::new();
        solver.set_parameter("compute_min_cut", "false").unwrap();

        let result = solver.solve(&demo_network(), 6).unwrap();
        assert!(result.min_cut_source_side.is_empty());
        assert_eq!(result.flow_value, 12);
    }

    #[test]
    fn test_antiparallel_arcs() {
        let input = edges(&[(0, 1, 2), (0, 2, 1), (1, 2, 3), (2, 1, 3), (1, 3, 1), (2, 3, 2)]);
        let result = MaxFlowSolver::new().solve(&input, 4).unwrap();

        assert_eq!(result.flow_value, 3);
        let flow = &result.flow_edges;
        assert_eq!(total_into(flow, 3), 3);
        for vertex in [1, 2] {
            assert_eq!(total_into(flow, vertex), total_out_of(flow, vertex));
        }
    }

    #[test]
    fn test_validation_errors_propagate() {
        let input = edges(&[(0, 0, 1), (0, 1, 1)]);
        assert_eq!(
            solve_max_flow(&input, 2).unwrap_err(),
            NetworkError::SelfLoop { vertex: 0 }
        );

        match MaxFlowSolver::new().solve(&edges(&[(0, 1, 5)]), 3) {
            Err(AlgorithmError::InvalidNetwork(NetworkError::NotOneSource { candidates: 2 })) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_parallel_paths_at_maximum_weight() {
        let max = Weight::MAX;
        let input = edges(&[(0, 1, max), (0, 2, max), (1, 3, max), (2, 3, max)]);
        let result = MaxFlowSolver::new().solve(&input, 4).unwrap();

        assert_eq!(result.flow_value, 2 * Capacity::from(max));
        assert!(result.flow_edges.iter().all(|e| e.weight == max));
    }

    #[test]
    fn test_reverse_credit_at_maximum_weight() {
        // Pushing along 1 -> 2 raises the residual of 2 -> 1 to twice the weight.
        let max = Weight::MAX;
        let input = edges(&[(0, 1, max), (1, 2, max), (2, 1, max), (2, 3, max)]);
        let mut network = FlowNetwork::from_edges(&input, 4).unwrap();

        let pushed = augment_to_max_flow(network.residual_mut(), 0, 3, &mut AlgorithmProfiler::new());
        assert_eq!(pushed, Capacity::from(max));
        assert_eq!(network.residual()[(2, 1)], 2 * Capacity::from(max));
        assert_eq!(network.flow_on(1, 2), max);
        assert_eq!(network.flow_on(2, 1), 0);

        assert_eq!(solve_max_flow(&input, 4).unwrap(), network.flow_edges());
    }

    #[test]
    fn test_parameters() {
        let mut solver = MaxFlowSolver::new();
        assert_eq!(solver.name(), "Edmonds-Karp");
        assert_eq!(solver.category(), "max_flow");
        assert_eq!(solver.id().as_str(), "Edmonds-Karp");
        assert_eq!(solver.get_parameter("verify_flow").as_deref(), Some("true"));

        assert!(solver.set_parameter("verify_flow", "false").is_ok());
        assert_eq!(solver.get_parameter("verify_flow").as_deref(), Some("false"));
        assert!(!solver.config().verify_flow);

        assert!(solver.set_parameter("verify_flow", "sometimes").is_err());
        assert!(solver.set_parameter("capacity_scaling_factor", "2.0").is_err());
        assert_eq!(solver.get_parameter("capacity_scaling_factor"), None);
        assert_eq!(solver.parameters().len(), 2);
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: SolverConfig = serde_json::from_str(r#"{"compute_min_cut": false}"#).unwrap();
        assert!(config.verify_flow);
        assert!(!config.compute_min_cut);

        let solver = MaxFlowSolver::with_config(config.clone());
        assert_eq!(solver.config(), &config);
    }
}
