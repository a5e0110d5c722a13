// src/pipeline.rs

//! Turn a validated pipeline file into a sealed [`TaskGraph`].
//!
//! The graph builder requires dependencies to be inserted before their
//! dependents, so tasks are fed in topological order. With a start stage `S`,
//! tasks in earlier stages keep their place in the graph but lose their
//! command: they become barriers that succeed without doing work, which keeps
//! every dependency edge valid while varying the work actually performed.

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::PipelineFile;
use crate::dag::{GraphBuilder, Task, TaskGraph};
use crate::errors::{BatchdagError, Result};

/// Build the task graph for one invocation.
///
/// `start_step` is the first stage that performs real work; `total_slots` is
/// the global core budget the graph is sealed against.
pub fn build_graph(cfg: &PipelineFile, start_step: u32, total_slots: usize) -> Result<TaskGraph> {
    let mut builder = GraphBuilder::new();

    for name in topological_order(cfg)? {
        let section = &cfg.task[&name];

        let (command, cores) = if section.stage < start_step {
            // Inert stand-in for a stage the caller asked to skip. It holds a
            // single slot for the instant it takes to succeed.
            (None, 1)
        } else {
            (section.cmd.clone(), section.cores)
        };

        builder.add_task(Task {
            name: name.clone(),
            command,
            cores,
            stage: section.stage,
            deps: section.after.clone(),
        })?;
    }

    builder.seal(total_slots)
}

/// Task names in a deterministic dependency-first order.
///
/// Nodes are inserted in the name-sorted order of the task table, so the
/// resulting topological order is stable across invocations.
fn topological_order(cfg: &PipelineFile) -> Result<Vec<String>> {
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    match toposort(&graph, None) {
        Ok(order) => Ok(order.into_iter().map(|n| n.to_string()).collect()),
        Err(cycle) => Err(BatchdagError::DagCycle(format!(
            "cycle detected in task DAG involving task '{}'",
            cycle.node_id()
        ))),
    }
}
