#![allow(dead_code)]

pub use batchdag_test_utils::init_tracing;

use batchdag::dag::{GraphBuilder, Task, TaskGraph};

/// Shorthand for a command task in graph tests.
pub fn task(name: &str, cmd: Option<&str>, cores: usize, deps: &[&str]) -> Task {
    Task {
        name: name.to_string(),
        command: cmd.map(|c| c.to_string()),
        cores,
        stage: 0,
        deps: deps.iter().map(|d| d.to_string()).collect(),
    }
}

/// Build and seal a graph from `(name, cmd, cores, deps)` tuples.
pub fn sealed_graph(specs: &[(&str, Option<&str>, usize, &[&str])], total_slots: usize) -> TaskGraph {
    let mut builder = GraphBuilder::new();
    for (name, cmd, cores, deps) in specs {
        builder
            .add_task(task(name, *cmd, *cores, deps))
            .expect("valid task");
    }
    builder.seal(total_slots).expect("graph seals")
}
