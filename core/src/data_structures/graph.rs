//! Flow network representation over dense vertex-pair matrices
//!
//! A network is supplied externally as a list of [`Edge`] values and is
//! materialised per solve call into three square matrices:
//!
//! - **capacity**: `capacity[u][v]` is the capacity of arc u→v, 0 if absent
//! - **residual**: remaining augmentable capacity, reverse arcs included;
//!   starts equal to capacity and is mutated only by the flow engine
//!
//! Arc capacities are [`Weight`] (32-bit) while residuals and every sum of
//! flows are [`Capacity`] (64-bit). `residual[u][v] + residual[v][u]` stays
//! equal to `capacity[u][v] + capacity[v][u]` throughout a solve, so a
//! residual never exceeds twice the largest weight and the total flow never
//! exceeds `V · Weight::MAX`.
//! - **existence**: which ordered pairs were present in the input
//!
//! # Theoretical Foundation
//! After the engine terminates, `capacity[u][v] - residual[u][v]` is the net
//! flow on an original arc u→v. When both u→v and v→u exist the subtraction
//! can go negative for the direction that carries no net flow; such arcs
//! report a flow of zero.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;
use crate::data_structures::matrix::SquareMatrix;
use crate::validation::network::{NetworkError, NetworkValidator};

/// Capacity of a single input arc, and the flow it carries on output
pub type Weight = u32;

/// Residual capacity and aggregate flow amounts
pub type Capacity = u64;

/// Directed capacitated arc, the sole external representation of a network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Tail vertex
    pub from: NodeId,
    /// Head vertex
    pub to: NodeId,
    /// Capacity on input, carried flow on output
    pub weight: Weight,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId, weight: Weight) -> Self {
        Self { from, to, weight }
    }
}

impl From<(NodeId, NodeId, Weight)> for Edge {
    fn from((from, to, weight): (NodeId, NodeId, Weight)) -> Self {
        Self::new(from, to, weight)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} ({})", self.from, self.to, self.weight)
    }
}

/// Validated flow network with a unique source and sink
#[derive(Debug, Clone)]
pub struct FlowNetwork {
    pub(crate) capacity: SquareMatrix<Weight>,
    pub(crate) residual: SquareMatrix<Capacity>,
    pub(crate) existence: SquareMatrix<bool>,
    pub(crate) source: NodeId,
    pub(crate) sink: NodeId,
}

impl FlowNetwork {
    /// Validate an edge list and build the network matrices
    pub fn from_edges(edges: &[Edge], num_vertices: usize) -> Result<Self, NetworkError> {
        NetworkValidator::new(num_vertices).validate(edges)
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.capacity.order()
    }

    #[inline]
    pub fn source(&self) -> NodeId {
        self.source
    }

    #[inline]
    pub fn sink(&self) -> NodeId {
        self.sink
    }

    pub fn capacity(&self) -> &SquareMatrix<Weight> {
        &self.capacity
    }

    pub fn residual(&self) -> &SquareMatrix<Capacity> {
        &self.residual
    }

    /// Exclusive access to the residual matrix for the duration of a solve
    pub(crate) fn residual_mut(&mut self) -> &mut SquareMatrix<Capacity> {
        &mut self.residual
    }

    pub fn existence(&self) -> &SquareMatrix<bool> {
        &self.existence
    }

    /// Whether u→v was part of the input
    #[inline]
    pub fn has_edge(&self, u: NodeId, v: NodeId) -> bool {
        self.existence[(u, v)]
    }

    /// Number of original arcs
    pub fn edge_count(&self) -> usize {
        self.existence.cells().filter(|(_, _, &present)| present).count()
    }

    /// Net flow currently carried by the original arc u→v
    #[inline]
    pub fn flow_on(&self, u: NodeId, v: NodeId) -> Weight {
        let capacity = self.capacity[(u, v)];
        match Weight::try_from(self.residual[(u, v)]) {
            Ok(remaining) => capacity.saturating_sub(remaining),
            Err(_) => 0,
        }
    }

    /// One edge per original arc in row-major order, weighted by carried flow
    pub fn flow_edges(&self) -> Vec<Edge> {
        self.existence
            .cells()
            .filter(|(_, _, &present)| present)
            .map(|(u, v, _)| Edge::new(u, v, self.flow_on(u, v)))
            .collect()
    }

    /// Total flow leaving the source
    pub fn flow_value(&self) -> Capacity {
        (0..self.num_vertices())
            .filter(|&v| self.has_edge(self.source, v))
            .map(|v| Capacity::from(self.flow_on(self.source, v)))
            .sum()
    }

    /// Net flow balance `(inflow, outflow)` at a vertex over original arcs
    pub fn flow_balance(&self, vertex: NodeId) -> (Capacity, Capacity) {
        let n = self.num_vertices();
        let inflow: Capacity = (0..n)
            .filter(|&u| self.has_edge(u, vertex))
            .map(|u| Capacity::from(self.flow_on(u, vertex)))
            .sum();
        let outflow: Capacity = (0..n)
            .filter(|&v| self.has_edge(vertex, v))
            .map(|v| Capacity::from(self.flow_on(vertex, v)))
            .sum();
        (inflow, outflow)
    }
}
