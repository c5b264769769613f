//! Flow algorithms on capacitated directed graphs
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod max_flow;
pub mod matching;

pub use self::max_flow::{
    augment_to_max_flow, find_augmenting_path, solve_max_flow, AugmentingPath, FlowMetrics,
    MaxFlowResult, MaxFlowSolver, SolverConfig,
};
pub use self::matching::{
    assign_courses, AssignmentLayout, AssignmentNetwork, CourseAssigner, CourseAssignment, Instructor,
};
