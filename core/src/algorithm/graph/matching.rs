//! Course Assignment via Bipartite b-Matching
//!
//! Instructors state which courses they are willing to teach and how many
//! they can take on; every course needs exactly one instructor. The problem
//! is reduced to maximum flow and solved with the Edmonds-Karp engine.
//!
//! # Reduction
//!
//! With `n` instructors and `m` courses the network has `n + m + 2` vertices:
//!
//! | vertices          | role        |
//! |-------------------|-------------|
//! | `0..n`            | instructors |
//! | `n`               | source      |
//! | `n + 1`           | sink        |
//! | `n + 2..n + 2 + m`| courses     |
//!
//! Arcs run source → instructor (capacity `max_courses`), instructor → course
//! (capacity 1 for every course named in the instructor's preferences, rank
//! ignored) and course → sink (capacity 1). A maximum flow is a maximum
//! cardinality feasible assignment.
//!
//! The construction is correct by shape, so the network bypasses the generic
//! validator and is built directly.
//!
//! # Decoding
//!
//! An instructor → course arc carries flow exactly when the reverse residual
//! `residual[course][instructor]` has risen to 1. Courses are decoded in
//! course-vertex order, so each instructor's list follows the course list,
//! not the instructor's preference order.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::algorithm::graph::max_flow::augment_to_max_flow;
use crate::algorithm::traits::{
    parse_bool_parameter, Algorithm, AlgorithmComplexity, AlgorithmError, AlgorithmParameter,
    AlgorithmProfiler, NodeId, ParameterType,
};
use crate::data_structures::graph::{Capacity, Weight};
use crate::data_structures::matrix::SquareMatrix;

/// Instructor record with teaching preferences and load limit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub last_name: String,
    /// Course names the instructor is willing to teach, most preferred first
    pub preferences: Vec<String>,
    /// Maximum number of courses the instructor may be assigned
    pub max_courses: Weight,
    /// Filled by [`CourseAssignment::apply_to`]
    #[serde(default)]
    pub assigned_courses: Vec<String>,
}

impl Instructor {
    pub fn new<S: Into<String>>(last_name: S, preferences: Vec<String>, max_courses: Weight) -> Self {
        Self {
            last_name: last_name.into(),
            preferences,
            max_courses,
            assigned_courses: Vec::new(),
        }
    }

    fn prefers(&self, course: &str) -> bool {
        self.preferences.iter().any(|preference| preference == course)
    }
}

/// Vertex numbering of the assignment network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssignmentLayout {
    instructors: usize,
    courses: usize,
}

impl AssignmentLayout {
    pub fn new(instructors: usize, courses: usize) -> Self {
        Self { instructors, courses }
    }

    pub fn num_vertices(&self) -> usize {
        self.instructors + self.courses + 2
    }

    pub fn source(&self) -> NodeId {
        self.instructors
    }

    pub fn sink(&self) -> NodeId {
        self.instructors + 1
    }

    pub fn instructor_vertex(&self, index: usize) -> NodeId {
        debug_assert!(index < self.instructors);
        index
    }

    pub fn course_vertex(&self, index: usize) -> NodeId {
        debug_assert!(index < self.courses);
        self.instructors + 2 + index
    }
}

/// Flow network built from an assignment problem
///
/// Owns the course names it was wired from, so decoding always covers
/// exactly the courses that have a vertex.
#[derive(Debug, Clone)]
pub struct AssignmentNetwork {
    layout: AssignmentLayout,
    courses: Vec<String>,
    capacity: SquareMatrix<Weight>,
    residual: SquareMatrix<Capacity>,
}

impl AssignmentNetwork {
    /// Wire source, instructors, courses and sink
    pub fn build<S: AsRef<str>>(instructors: &[Instructor], courses: &[S]) -> Self {
        let layout = AssignmentLayout::new(instructors.len(), courses.len());
        let mut capacity = SquareMatrix::filled(layout.num_vertices(), 0);

        for (i, instructor) in instructors.iter().enumerate() {
            let vertex = layout.instructor_vertex(i);
            capacity[(layout.source(), vertex)] = instructor.max_courses;

            for (k, course) in courses.iter().enumerate() {
                if instructor.prefers(course.as_ref()) {
                    capacity[(vertex, layout.course_vertex(k))] = 1;
                }
            }
        }

        for k in 0..courses.len() {
            capacity[(layout.course_vertex(k), layout.sink())] = 1;
        }

        debug!(
            "Built assignment network: {} instructors, {} courses, {} vertices",
            layout.instructors,
            layout.courses,
            layout.num_vertices()
        );

        Self {
            layout,
            courses: courses.iter().map(|course| course.as_ref().to_string()).collect(),
            residual: capacity.map(|&weight| Capacity::from(weight)),
            capacity,
        }
    }

    pub fn layout(&self) -> AssignmentLayout {
        self.layout
    }

    pub fn courses(&self) -> &[String] {
        &self.courses
    }

    pub fn capacity(&self) -> &SquareMatrix<Weight> {
        &self.capacity
    }

    pub fn residual(&self) -> &SquareMatrix<Capacity> {
        &self.residual
    }

    /// Run the flow engine to completion and return the number of courses placed
    pub fn solve(&mut self, profiler: &mut AlgorithmProfiler) -> Capacity {
        let (source, sink) = (self.layout.source(), self.layout.sink());
        augment_to_max_flow(&mut self.residual, source, sink, profiler)
    }

    /// Whether the instructor → course arc carries flow
    pub fn is_assigned(&self, instructor: usize, course: usize) -> bool {
        let (i, c) = (self.layout.instructor_vertex(instructor), self.layout.course_vertex(course));
        self.residual[(c, i)] == 1
    }

    /// Read assignments off the residual matrix, course-major
    pub fn decode(&self) -> CourseAssignment {
        let mut by_instructor = vec![Vec::new(); self.layout.instructors];
        let mut owners = vec![None; self.layout.courses];

        for (k, course) in self.courses.iter().enumerate() {
            for (i, assigned) in by_instructor.iter_mut().enumerate() {
                if self.is_assigned(i, k) {
                    assigned.push(course.clone());
                    owners[k] = Some(i);
                }
            }
        }

        let unassigned = self
            .courses
            .iter()
            .zip(&owners)
            .filter(|(_, owner)| owner.is_none())
            .map(|(course, _)| course.clone())
            .collect();

        CourseAssignment {
            by_instructor,
            owners,
            unassigned,
        }
    }
}

/// Result of an assignment solve, indexed like the instructor input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseAssignment {
    by_instructor: Vec<Vec<String>>,
    /// Instructor index owning each course position
    owners: Vec<Option<usize>>,
    unassigned: Vec<String>,
}

impl CourseAssignment {
    /// Courses assigned to the instructor at `index`
    pub fn courses_for(&self, index: usize) -> &[String] {
        self.by_instructor.get(index).map(Vec::as_slice).unwrap_or_default()
    }

    /// Instructor index teaching the course at position `course_index`
    pub fn owner_of(&self, course_index: usize) -> Option<usize> {
        self.owners.get(course_index).copied().flatten()
    }

    /// Courses left without an instructor, in course-list order
    pub fn unassigned(&self) -> &[String] {
        &self.unassigned
    }

    pub fn total_assigned(&self) -> usize {
        self.by_instructor.iter().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = &[String]> + '_ {
        self.by_instructor.iter().map(Vec::as_slice)
    }

    /// Overwrite each instructor's `assigned_courses` with the decoded list
    ///
    /// Instructors beyond the solved input are left untouched.
    pub fn apply_to(&self, instructors: &mut [Instructor]) {
        for (instructor, assigned) in instructors.iter_mut().zip(&self.by_instructor) {
            instructor.assigned_courses = assigned.clone();
        }
    }
}

/// Assign courses to instructors, maximising the number of staffed courses
///
/// Pure function: the inputs are not modified. Use
/// [`CourseAssignment::apply_to`] to write the result back into the records.
pub fn assign_courses<S: AsRef<str>>(instructors: &[Instructor], courses: &[S]) -> CourseAssignment {
    CourseAssigner::new().assign(instructors, courses)
}

/// Course assignment solver
#[derive(Debug, Clone)]
pub struct CourseAssigner {
    warn_unassigned: bool,
}

impl CourseAssigner {
    pub fn new() -> Self {
        Self { warn_unassigned: true }
    }

    pub fn assign<S: AsRef<str>>(&self, instructors: &[Instructor], courses: &[S]) -> CourseAssignment {
        let mut network = AssignmentNetwork::build(instructors, courses);

        let mut profiler = AlgorithmProfiler::new();
        profiler.start();
        let placed = network.solve(&mut profiler);
        profiler.stop();

        let assignment = network.decode();
        info!(
            "Assigned {} of {} courses in {} augmenting paths",
            placed,
            courses.len(),
            profiler.get_metrics().steps_executed
        );

        if self.warn_unassigned && !assignment.unassigned().is_empty() {
            warn!("Courses without an instructor: {:?}", assignment.unassigned());
        }

        assignment
    }
}

impl Default for CourseAssigner {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for CourseAssigner {
    fn name(&self) -> &'static str {
        "Course Assignment"
    }

    fn category(&self) -> &'static str {
        "matching"
    }

    fn description(&self) -> String {
        "Instructor to course assignment as a bipartite b-matching solved by Edmonds-Karp maximum flow."
            .to_string()
    }

    fn complexity(&self) -> AlgorithmComplexity {
        AlgorithmComplexity {
            time_complexity: "O(min(C, ΣL)) augmentations × O((I + C)²) per search".to_string(),
            space_complexity: "O((I + C)²)".to_string(),
        }
    }

    fn parameters(&self) -> Vec<AlgorithmParameter> {
        vec![AlgorithmParameter {
            name: "warn_unassigned".to_string(),
            value: self.warn_unassigned.to_string(),
            value_type: ParameterType::Boolean,
            description: "Log a warning listing courses left without an instructor".to_string(),
        }]
    }

    fn set_parameter(&mut self, name: &str, value: &str) -> Result<(), AlgorithmError> {
        match name {
            "warn_unassigned" => {
                self.warn_unassigned = parse_bool_parameter(name, value)?;
                Ok(())
            }
            _ => Err(AlgorithmError::InvalidParameter {
                name: name.to_string(),
                reason: "unknown parameter".to_string(),
            }),
        }
    }

    fn get_parameter(&self, name: &str) -> Option<String> {
        match name {
            "warn_unassigned" => Some(self.warn_unassigned.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn instructor(name: &str, preferences: &[&str], max_courses: Weight) -> Instructor {
        Instructor::new(
            name,
            preferences.iter().map(|p| p.to_string()).collect(),
            max_courses,
        )
    }

    #[test]
    fn test_layout() {
        let layout = AssignmentLayout::new(3, 2);
        assert_eq!(layout.num_vertices(), 7);
        assert_eq!(layout.source(), 3);
        assert_eq!(layout.sink(), 4);
        assert_eq!(layout.instructor_vertex(2), 2);
        assert_eq!(layout.course_vertex(0), 5);
        assert_eq!(layout.course_vertex(1), 6);
    }

    #[test]
    fn test_network_wiring() {
        let instructors = vec![instructor("Knuth", &["A", "Z"], 2)];
        let network = AssignmentNetwork::build(&instructors, &["A", "B"]);
        let capacity = network.capacity();

        // Vertices: Knuth 0, source 1, sink 2, A 3, B 4.
        assert_eq!(capacity[(1, 0)], 2);
        assert_eq!(capacity[(0, 3)], 1);
        assert_eq!(capacity[(0, 4)], 0);
        assert_eq!(capacity[(3, 2)], 1);
        assert_eq!(capacity[(4, 2)], 1);
        assert_eq!(network.residual(), &capacity.map(|&c| Capacity::from(c)));
        assert_eq!(network.courses(), ["A", "B"].map(String::from));
    }

    #[test]
    fn test_two_instructors_two_courses() {
        let instructors = vec![instructor("Hopper", &["A", "B"], 1), instructor("Lovelace", &["B"], 1)];
        let assignment = assign_courses(&instructors, &["A", "B"]);

        assert_eq!(assignment.courses_for(0), ["A".to_string()]);
        assert_eq!(assignment.courses_for(1), ["B".to_string()]);
        assert_eq!(assignment.owner_of(0), Some(0));
        assert_eq!(assignment.owner_of(1), Some(1));
        assert!(assignment.unassigned().is_empty());
    }

    #[test]
    fn test_capacity_limits_assignment() {
        let instructors = vec![instructor("Turing", &["A", "B", "C"], 1)];
        let assignment = assign_courses(&instructors, &["A", "B", "C"]);

        assert_eq!(assignment.total_assigned(), 1);
        assert_eq!(assignment.courses_for(0).len(), 1);
        assert_eq!(assignment.unassigned().len(), 2);
    }

    #[test]
    fn test_rerouting_through_reverse_arc() {
        // Hopper first takes A, then gives it up for B so Lovelace can teach A.
        let instructors = vec![instructor("Hopper", &["A", "B"], 1), instructor("Lovelace", &["A"], 1)];
        let assignment = assign_courses(&instructors, &["A", "B"]);

        assert_eq!(assignment.courses_for(0), ["B".to_string()]);
        assert_eq!(assignment.courses_for(1), ["A".to_string()]);
        assert_eq!(assignment.total_assigned(), 2);
    }

    #[test]
    fn test_assigned_courses_follow_course_order() {
        let instructors = vec![instructor("Dijkstra", &["C", "A", "B"], 3)];
        let assignment = assign_courses(&instructors, &["A", "B", "C"]);

        assert_eq!(assignment.courses_for(0), ["A", "B", "C"].map(String::from));
    }

    #[test]
    fn test_unknown_preferences_and_zero_load() {
        let instructors = vec![
            instructor("Backus", &["Fortran"], 2),
            instructor("Hoare", &["A"], 0),
        ];
        let assignment = assign_courses(&instructors, &["A", "B"]);

        assert_eq!(assignment.total_assigned(), 0);
        assert_eq!(assignment.unassigned(), ["A", "B"].map(String::from));
        assert_eq!(assignment.owner_of(0), None);
    }

    #[test]
    fn test_no_course_is_double_booked() {
        let instructors = vec![
            instructor("Ritchie", &["A", "B", "C"], 2),
            instructor("Thompson", &["A", "B"], 2),
            instructor("Kernighan", &["C", "D"], 1),
        ];
        let courses = ["A", "B", "C", "D"];
        let assignment = assign_courses(&instructors, &courses);

        assert_eq!(assignment.total_assigned(), 4);
        for course in courses {
            let holders = assignment
                .iter()
                .filter(|assigned| assigned.iter().any(|c| c == course))
                .count();
            assert_eq!(holders, 1, "course {course} held {holders} times");
        }
        for (index, instructor) in instructors.iter().enumerate() {
            assert!((assignment.courses_for(index).len() as Weight) <= instructor.max_courses);
        }
    }

    #[test]
    fn test_decode_covers_exactly_the_built_courses() {
        let instructors = vec![instructor("Hopper", &["B"], 1)];
        let mut network = AssignmentNetwork::build(&instructors, &["A", "B", "C"]);

        let before = network.decode();
        assert_eq!(before.total_assigned(), 0);
        assert_eq!(before.unassigned(), ["A", "B", "C"].map(String::from));

        network.solve(&mut AlgorithmProfiler::new());
        let after = network.decode();
        assert_eq!(after.courses_for(0), ["B".to_string()]);
        assert_eq!(after.unassigned(), ["A", "C"].map(String::from));
        assert_eq!(after.owner_of(1), Some(0));
        assert_eq!(after.owner_of(3), None);
    }

    #[test]
    fn test_large_load_limit() {
        let instructors = vec![instructor("Hamilton", &["A", "B"], Weight::MAX)];
        let assignment = assign_courses(&instructors, &["A", "B"]);
        assert_eq!(assignment.courses_for(0), ["A", "B"].map(String::from));
    }

    #[test]
    fn test_apply_to_overwrites_records() {
        let mut instructors = vec![instructor("Hopper", &["A"], 1), instructor("Lovelace", &["B"], 1)];
        instructors[1].assigned_courses.push("stale".to_string());

        let assignment = assign_courses(&instructors, &["A", "B"]);
        assert!(instructors[0].assigned_courses.is_empty());

        assignment.apply_to(&mut instructors);
        assert_eq!(instructors[0].assigned_courses, vec!["A".to_string()]);
        assert_eq!(instructors[1].assigned_courses, vec!["B".to_string()]);
    }

    #[test]
    fn test_empty_inputs() {
        let assignment = assign_courses::<&str>(&[], &[]);
        assert_eq!(assignment.total_assigned(), 0);
        assert!(assignment.courses_for(0).is_empty());

        let assignment = assign_courses(&[instructor("Liskov", &["A"], 1)], &[] as &[&str]);
        assert!(assignment.courses_for(0).is_empty());
    }

    #[test]
    fn test_instructor_deserializes_without_assignments() {
        let json = r#"{"last_name": "Wirth", "preferences": ["Pascal"], "max_courses": 2}"#;
        let record: Instructor = serde_json::from_str(json).unwrap();
        assert_eq!(record, instructor("Wirth", &["Pascal"], 2));
    }

    #[test]
    fn test_parameters() {
        let mut assigner = CourseAssigner::new();
        assert_eq!(assigner.category(), "matching");
        assert_eq!(assigner.get_parameter("warn_unassigned").as_deref(), Some("true"));
        assert!(assigner.set_parameter("warn_unassigned", "false").is_ok());
        assert_eq!(assigner.get_parameter("warn_unassigned").as_deref(), Some("false"));
        assert!(assigner.set_parameter("warn_unassigned", "1").is_err());
        assert!(assigner.set_parameter("verify_flow", "true").is_err());
    }
}
