// src/dag/graph.rs

//! Task graph construction and sealing.
//!
//! `GraphBuilder` accepts tasks one at a time; every dependency must name a
//! task that was added earlier. That rule forces a topological insertion
//! order, which makes cycles unrepresentable by construction and keeps the
//! graph's iteration order deterministic for logging.

use std::collections::HashMap;

use crate::dag::task::Task;
use crate::errors::{BatchdagError, Result};
use crate::engine::TaskName;

/// Mutable graph under construction.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    tasks: Vec<Task>,
    index: HashMap<TaskName, usize>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one task to the graph.
    ///
    /// Fails with:
    /// - [`BatchdagError::DuplicateTask`] if the name is already taken,
    /// - [`BatchdagError::UnknownDependency`] if a dependency has not been
    ///   added yet,
    /// - [`BatchdagError::InvalidCores`] if the core requirement is zero.
    pub fn add_task(&mut self, task: Task) -> Result<()> {
        if self.index.contains_key(&task.name) {
            return Err(BatchdagError::DuplicateTask(task.name));
        }
        if task.cores == 0 {
            return Err(BatchdagError::InvalidCores(task.name));
        }
        for dep in task.deps.iter() {
            if !self.index.contains_key(dep) {
                return Err(BatchdagError::UnknownDependency {
                    task: task.name.clone(),
                    dep: dep.clone(),
                });
            }
        }

        self.index.insert(task.name.clone(), self.tasks.len());
        self.tasks.push(task);
        Ok(())
    }

    /// Close the graph to further insertion and bind it to a slot budget.
    ///
    /// Fails with [`BatchdagError::CoreBudgetExceeded`] if any task's core
    /// requirement can never fit in `total_slots`; catching this here turns a
    /// would-be runtime deadlock into an eager configuration error.
    pub fn seal(self, total_slots: usize) -> Result<TaskGraph> {
        if total_slots == 0 {
            return Err(BatchdagError::ConfigError(
                "total core budget must be >= 1 (got 0)".to_string(),
            ));
        }

        for task in self.tasks.iter() {
            if task.cores > total_slots {
                return Err(BatchdagError::CoreBudgetExceeded {
                    task: task.name.clone(),
                    cores: task.cores,
                    total_slots,
                });
            }
        }

        // Dependents adjacency, by task index. Each list ends up ordered by
        // the dependent's insertion index.
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.tasks.len()];
        for (idx, task) in self.tasks.iter().enumerate() {
            for dep in task.deps.iter() {
                let dep_idx = self.index[dep];
                dependents[dep_idx].push(idx);
            }
        }

        Ok(TaskGraph {
            tasks: self.tasks,
            index: self.index,
            dependents,
            total_slots,
        })
    }
}

/// Immutable, sealed task graph for one pipeline invocation.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    tasks: Vec<Task>,
    index: HashMap<TaskName, usize>,
    dependents: Vec<Vec<usize>>,
    total_slots: usize,
}

impl TaskGraph {
    /// All tasks, in insertion order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn total_slots(&self) -> usize {
        self.total_slots
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn task(&self, idx: usize) -> &Task {
        &self.tasks[idx]
    }

    /// Immediate dependents of a task (tasks that list it in their `deps`).
    pub fn dependents_of(&self, idx: usize) -> &[usize] {
        &self.dependents[idx]
    }
}
