//! Structural validation of flow networks
//!
//! Every input network passes through [`NetworkValidator`] before any flow
//! computation runs. The validator either produces the capacity, residual and
//! edge-existence matrices of a [`FlowNetwork`] or fails fast with a
//! [`NetworkError`] naming the first broken invariant.
//!
//! # Check Order
//! 1. At least two vertices
//! 2. No zero-capacity edge
//! 3. Every endpoint inside `[0, num_vertices)`
//! 4. No self-loop
//! 5. At most one edge per ordered vertex pair
//! 6. At least one edge
//! 7. Exactly one vertex without incoming capacity (the source)
//! 8. Exactly one vertex without outgoing capacity (the sink)
//!
//! Checks 2 through 5 are each a full pass over the edge list, so precedence
//! between two violations depends only on this order and never on where the
//! offending edges sit in the input.
//!
//! Source and sink detection counts degrees only; it does not test
//! reachability. An isolated vertex therefore counts as both a source
//! candidate and a sink candidate.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::debug;
use thiserror::Error;

use crate::algorithm::traits::NodeId;
use crate::data_structures::graph::{Capacity, Edge, FlowNetwork, Weight};
use crate::data_structures::matrix::SquareMatrix;

/// Classified validation failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    #[error("Too few vertices. (got {num_vertices}, need at least 2)")]
    TooFewVertices { num_vertices: usize },

    #[error("Too few edges.")]
    TooFewEdges,

    #[error("Detected edge weight of 0. ({from} -> {to})")]
    ZeroWeightEdge { from: NodeId, to: NodeId },

    #[error("Edge interacts with nonexistent vertex. ({from} -> {to} with {num_vertices} vertices)")]
    BadEndpoint {
        from: NodeId,
        to: NodeId,
        num_vertices: usize,
    },

    #[error("At least one self-loop. (vertex {vertex})")]
    SelfLoop { vertex: NodeId },

    #[error("Detected multi-edges. ({from} -> {to})")]
    MultiEdge { from: NodeId, to: NodeId },

    #[error("Zero or more than one source. ({candidates} candidates)")]
    NotOneSource { candidates: usize },

    #[error("Zero or more than one sink. ({candidates} candidates)")]
    NotOneSink { candidates: usize },
}

/// Fail-fast validator producing the matrices of a [`FlowNetwork`]
#[derive(Debug, Clone, Copy)]
pub struct NetworkValidator {
    num_vertices: usize,
}

impl NetworkValidator {
    pub fn new(num_vertices: usize) -> Self {
        Self { num_vertices }
    }

    /// Run every check in order and build the network on success
    pub fn validate(&self, edges: &[Edge]) -> Result<FlowNetwork, NetworkError> {
        let n = self.num_vertices;

        if n < 2 {
            return Err(NetworkError::TooFewVertices { num_vertices: n });
        }

        if let Some(edge) = edges.iter().find(|edge| edge.weight == 0) {
            return Err(NetworkError::ZeroWeightEdge {
                from: edge.from,
                to: edge.to,
            });
        }

        if let Some(edge) = edges.iter().find(|edge| edge.from >= n || edge.to >= n) {
            return Err(NetworkError::BadEndpoint {
                from: edge.from,
                to: edge.to,
                num_vertices: n,
            });
        }

        if let Some(edge) = edges.iter().find(|edge| edge.from == edge.to) {
            return Err(NetworkError::SelfLoop { vertex: edge.from });
        }

        let mut existence = SquareMatrix::filled(n, false);
        for edge in edges {
            let present = &mut existence[(edge.from, edge.to)];
            if *present {
                return Err(NetworkError::MultiEdge {
                    from: edge.from,
                    to: edge.to,
                });
            }
            *present = true;
        }

        if edges.is_empty() {
            return Err(NetworkError::TooFewEdges);
        }

        let mut capacity: SquareMatrix<Weight> = SquareMatrix::filled(n, 0);
        for edge in edges {
            capacity[(edge.from, edge.to)] = edge.weight;
        }

        let source = Self::unique_vertex(n, |v| capacity.column(v).all(|&c| c == 0))
            .map_err(|candidates| NetworkError::NotOneSource { candidates })?;

        let sink = Self::unique_vertex(n, |v| capacity.row(v).iter().all(|&c| c == 0))
            .map_err(|candidates| NetworkError::NotOneSink { candidates })?;

        debug!(
            "Validated flow network: {} vertices, {} edges, source {}, sink {}",
            n,
            edges.len(),
            source,
            sink
        );

        Ok(FlowNetwork {
            residual: capacity.map(|&weight| Capacity::from(weight)),
            capacity,
            existence,
            source,
            sink,
        })
    }

    /// The single vertex satisfying `predicate`, or the candidate count
    fn unique_vertex<P>(n: usize, predicate: P) -> Result<NodeId, usize>
    where
        P: Fn(NodeId) -> bool,
    {
        let candidates: Vec<NodeId> = (0..n).filter(|&v| predicate(v)).collect();
        match candidates.as_slice() {
            [vertex] => Ok(*vertex),
            _ => Err(candidates.len()),
        }
    }
}
