//! NETFLOW: maximum flow with a course-assignment reduction
//!
//! The crate computes maximum flows on directed, capacitated networks with a
//! single source and a single sink using Edmonds-Karp (breadth-first
//! augmenting paths), and uses that engine to assign courses to instructors
//! under per-instructor load limits.
//!
//! # Architecture
//! - [`data_structures`]: dense vertex-pair matrices and the [`Edge`] /
//!   [`FlowNetwork`] representation
//! - [`validation`]: fail-fast structural checks producing a [`FlowNetwork`]
//! - [`algorithm`]: the augmenting path finder, the max-flow engine, the
//!   assignment reducer and the common [`Algorithm`] trait
//!
//! # Example
//! ```
//! use netflow::{solve_max_flow, Edge};
//!
//! let edges = [Edge::new(0, 1, 3), Edge::new(1, 2, 2)];
//! let flow = solve_max_flow(&edges, 3).unwrap();
//! assert_eq!(flow, vec![Edge::new(0, 1, 2), Edge::new(1, 2, 2)]);
//! ```
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod algorithm;
pub mod data_structures;
pub mod validation;

pub use crate::algorithm::{
    assign_courses, solve_max_flow, Algorithm, AlgorithmError, CourseAssigner, CourseAssignment, Instructor,
    MaxFlowResult, MaxFlowSolver, NodeId, SolverConfig,
};
pub use crate::data_structures::{Capacity, Edge, FlowNetwork, Weight};
pub use crate::validation::NetworkError;
