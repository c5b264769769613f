//! Dense square matrix over vertex pairs
//!
//! Row-major storage backing the capacity, residual and edge-existence
//! relations of a flow network. Indexing is by `(row, column)` vertex pair.
//!
//! # Complexity
//! - Construction: O(V²) time and space
//! - Element access: O(1)
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::algorithm::traits::NodeId;

/// Square `order × order` matrix with contiguous row-major storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareMatrix<T> {
    order: usize,
    data: Vec<T>,
}

impl<T: Clone> SquareMatrix<T> {
    /// Create a matrix with every cell set to `fill`
    pub fn filled(order: usize, fill: T) -> Self {
        Self {
            order,
            data: vec![fill; order * order],
        }
    }
}

impl<T> SquareMatrix<T> {
    /// Number of rows (equivalently columns)
    #[inline]
    pub fn order(&self) -> usize {
        self.order
    }

    /// Row `u` as a slice, i.e. every arc leaving `u`
    #[inline]
    pub fn row(&self, u: NodeId) -> &[T] {
        let start = u * self.order;
        &self.data[start..start + self.order]
    }

    /// Column `v` top to bottom, i.e. every arc entering `v`
    pub fn column(&self, v: NodeId) -> impl Iterator<Item = &T> + '_ {
        self.data.iter().skip(v).step_by(self.order.max(1)).take(self.order)
    }

    /// Cell-wise conversion into a matrix of another element type
    pub fn map<U, F>(&self, f: F) -> SquareMatrix<U>
    where
        F: FnMut(&T) -> U,
    {
        SquareMatrix {
            order: self.order,
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Iterate `(u, v, value)` in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (NodeId, NodeId, &T)> + '_ {
        let order = self.order;
        self.data
            .iter()
            .enumerate()
            .map(move |(index, value)| (index / order, index % order, value))
    }

    #[inline]
    fn offset(&self, u: NodeId, v: NodeId) -> usize {
        debug_assert!(u < self.order && v < self.order, "vertex pair ({u}, {v}) out of range");
        u * self.order + v
    }
}

impl<T> Index<(NodeId, NodeId)> for SquareMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (u, v): (NodeId, NodeId)) -> &T {
        &self.data[self.offset(u, v)]
    }
}

impl<T> IndexMut<(NodeId, NodeId)> for SquareMatrix<T> {
    #[inline]
    fn index_mut(&mut self, (u, v): (NodeId, NodeId)) -> &mut T {
        let offset = self.offset(u, v);
        &mut self.data[offset]
    }
}
