//! NETFLOW command-line front end
//!
//! ```text
//! netflow                        solve the built-in six-vertex demo network
//! netflow flow <network.json>    solve {"num_vertices": N, "edges": [...]}
//! netflow assign <problem.json>  solve {"instructors": [...], "courses": [...]}
//! ```
//!
//! Append `--json` to print the full result as JSON. Verbosity follows
//! `RUST_LOG`.
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use netflow::{AlgorithmError, CourseAssigner, Edge, Instructor, MaxFlowResult, MaxFlowSolver};

#[derive(Error, Debug)]
enum CliError {
    #[error("usage: netflow [flow <network.json> | assign <problem.json>] [--json]")]
    Usage,

    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed input: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Solve(#[from] AlgorithmError),
}

#[derive(Debug, Deserialize)]
struct NetworkInput {
    num_vertices: usize,
    edges: Vec<Edge>,
}

#[derive(Debug, Deserialize)]
struct AssignmentInput {
    instructors: Vec<Instructor>,
    courses: Vec<String>,
}

#[derive(Debug, Serialize)]
struct AssignmentOutput<'a> {
    instructors: &'a [Instructor],
    unassigned: &'a [String],
}

/// The network solved when no input file is given
fn demo_network() -> NetworkInput {
    NetworkInput {
        num_vertices: 6,
        edges: [
            (3, 5, 5),
            (3, 0, 10),
            (0, 5, 5),
            (5, 4, 10),
            (0, 4, 3),
            (0, 1, 1),
            (4, 1, 20),
            (4, 2, 5),
            (1, 2, 7),
        ]
        .into_iter()
        .map(Edge::from)
        .collect(),
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &str) -> Result<T, CliError> {
    let text = fs::read_to_string(Path::new(path)).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })?;
    Ok(serde_json::from_str(&text)?)
}

fn run_flow(input: NetworkInput, as_json: bool) -> Result<(), CliError> {
    let result: MaxFlowResult = MaxFlowSolver::new().solve(&input.edges, input.num_vertices)?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for edge in &result.flow_edges {
            println!("{edge}");
        }
    }
    Ok(())
}

fn run_assign(mut input: AssignmentInput, as_json: bool) -> Result<(), CliError> {
    let assignment = CourseAssigner::new().assign(&input.instructors, &input.courses);
    assignment.apply_to(&mut input.instructors);

    if as_json {
        let output = AssignmentOutput {
            instructors: &input.instructors,
            unassigned: assignment.unassigned(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for instructor in &input.instructors {
            println!("{}: {}", instructor.last_name, instructor.assigned_courses.join(", "));
        }
        if !assignment.unassigned().is_empty() {
            println!("Unassigned: {}", assignment.unassigned().join(", "));
        }
    }
    Ok(())
}

fn run(mut args: Vec<String>) -> Result<(), CliError> {
    let as_json = args.last().is_some_and(|arg| arg == "--json");
    if as_json {
        args.pop();
    }
    debug!("Arguments: {:?} (json output: {})", args, as_json);

    match args.as_slice() {
        [] => run_flow(demo_network(), as_json),
        [command, path] if command == "flow" => run_flow(read_json(path)?, as_json),
        [command, path] if command == "assign" => run_assign(read_json(path)?, as_json),
        _ => Err(CliError::Usage),
    }
}

fn main() -> ExitCode {
    env_logger::init();

    match run(std::env::args().skip(1).collect()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
