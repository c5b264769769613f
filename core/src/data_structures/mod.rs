//! Dense network storage
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod matrix;
pub mod graph;

pub use self::matrix::SquareMatrix;
pub use self::graph::{Capacity, Edge, FlowNetwork, Weight};
