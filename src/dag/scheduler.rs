// src/dag/scheduler.rs

//! Bounded-concurrency slot scheduler.
//!
//! The scheduler owns the sealed [`TaskGraph`] plus all mutable per-run state:
//! task states, the ready queue, the free-slot counter, and the first-failure
//! record. It is driven entirely by the core runtime, one event at a time, so
//! no transition ever races another.
//!
//! Admission policy: scan the ready queue in the order tasks became ready
//! (ties broken by graph insertion order) and admit every task whose core
//! requirement fits in the currently free slots. Tasks that do not fit stay
//! queued and are reconsidered on the next pass. Once any task has failed, no
//! further task is admitted; already-running tasks drain naturally.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::dag::graph::TaskGraph;
use crate::dag::task::{ScheduledTask, TaskState};
use crate::engine::{FailedTask, RunReport, TaskOutcome};
use crate::errors::{BatchdagError, Result};
use crate::resume::ResumePredicate;

#[derive(Debug)]
pub struct SlotScheduler {
    graph: TaskGraph,
    states: Vec<TaskState>,
    /// Tasks in `Ready`, in the order they became ready.
    ready: VecDeque<usize>,
    free_slots: usize,
    /// First task to fail, with its exit code. Set at most once.
    first_failure: Option<FailedTask>,
}

impl SlotScheduler {
    /// Build a scheduler over a sealed graph, applying the resume snapshot.
    ///
    /// Tasks the predicate reports as done start in `Skipped` and satisfy
    /// their dependents without executing. A skipped task whose dependency is
    /// neither skipped nor a barrier is an incoherent partial state and is
    /// rejected with [`BatchdagError::ResumeInconsistency`] rather than
    /// silently resolved.
    pub fn new(graph: TaskGraph, resume: &dyn ResumePredicate) -> Result<Self> {
        let mut states = vec![TaskState::Pending; graph.len()];

        // Dependencies are always inserted before their dependents, so by the
        // time a task is inspected here the skip status of every dependency
        // is already settled.
        for idx in 0..graph.len() {
            let task = graph.task(idx);
            if !resume.is_done(&task.name) {
                continue;
            }

            for dep in task.deps.iter() {
                let dep_idx = graph
                    .index_of(dep)
                    .expect("sealed graph contains all dependency names");
                let dep_ok = states[dep_idx] == TaskState::Skipped
                    || graph.task(dep_idx).is_barrier();
                if !dep_ok {
                    return Err(BatchdagError::ResumeInconsistency {
                        task: task.name.clone(),
                        dep: dep.clone(),
                    });
                }
            }

            debug!(task = %task.name, "already done in a prior run; marking Skipped");
            states[idx] = TaskState::Skipped;
        }

        let free_slots = graph.total_slots();
        let mut scheduler = Self {
            graph,
            states,
            ready: VecDeque::new(),
            free_slots,
            first_failure: None,
        };

        // Seed the ready queue: tasks with no pending dependencies, in
        // insertion order.
        for idx in 0..scheduler.graph.len() {
            if scheduler.states[idx] == TaskState::Pending && scheduler.deps_satisfied(idx) {
                scheduler.states[idx] = TaskState::Ready;
                scheduler.ready.push_back(idx);
            }
        }

        Ok(scheduler)
    }

    /// Promote ready tasks to `Running` while they fit in the free slots.
    ///
    /// Returns the admitted tasks, in admission order. Returns nothing once a
    /// failure has been recorded (fail-fast).
    pub fn admit(&mut self) -> Vec<ScheduledTask> {
        if self.first_failure.is_some() {
            return Vec::new();
        }

        let mut admitted = Vec::new();
        let mut deferred = VecDeque::new();

        while let Some(idx) = self.ready.pop_front() {
            let task = self.graph.task(idx);
            if task.cores <= self.free_slots {
                self.free_slots -= task.cores;
                self.states[idx] = TaskState::Running;
                info!(
                    task = %task.name,
                    cores = task.cores,
                    free_slots = self.free_slots,
                    "admitting task"
                );
                admitted.push(ScheduledTask::from_task(task));
            } else {
                debug!(
                    task = %task.name,
                    cores = task.cores,
                    free_slots = self.free_slots,
                    "task does not fit in free slots; deferring"
                );
                deferred.push_back(idx);
            }
        }

        self.ready = deferred;
        admitted
    }

    /// Record the completion of a running task and update dependents.
    ///
    /// On success, dependents whose dependencies are now all satisfied become
    /// `Ready`. On failure, the first failure is recorded and every transitive
    /// dependent still in `Pending` or `Ready` is poisoned to `Failed`
    /// without running.
    pub fn complete(&mut self, name: &str, outcome: TaskOutcome) {
        let Some(idx) = self.graph.index_of(name) else {
            warn!(task = %name, "completion for unknown task; ignoring");
            return;
        };
        if self.states[idx] != TaskState::Running {
            warn!(
                task = %name,
                state = ?self.states[idx],
                "completion for task that is not running; ignoring"
            );
            return;
        }

        self.free_slots += self.graph.task(idx).cores;

        match outcome {
            TaskOutcome::Success => {
                self.states[idx] = TaskState::Succeeded;
                debug!(task = %name, free_slots = self.free_slots, "task succeeded");
                self.promote_dependents(idx);
            }
            TaskOutcome::Failed(code) => {
                self.states[idx] = TaskState::Failed;
                warn!(
                    task = %name,
                    exit_code = code,
                    "task failed; poisoning dependents"
                );
                if self.first_failure.is_none() {
                    self.first_failure = Some(FailedTask {
                        name: name.to_string(),
                        exit_code: code,
                    });
                }
                self.poison_dependents(idx);
            }
        }
    }

    /// Whether the run is over.
    ///
    /// Without a failure this means every task is terminal. After a failure
    /// it means the running tasks have drained: tasks still `Pending` or
    /// `Ready` at that point will never be admitted and do not count.
    pub fn is_settled(&self) -> bool {
        if self.first_failure.is_some() {
            !self.states.iter().any(|s| *s == TaskState::Running)
        } else {
            self.states.iter().all(|s| s.is_terminal())
        }
    }

    /// Summed core requirement of currently running tasks.
    pub fn occupied_slots(&self) -> usize {
        self.graph.total_slots() - self.free_slots
    }

    /// Read-only view of a task's state.
    pub fn state_of(&self, name: &str) -> Option<TaskState> {
        self.graph.index_of(name).map(|idx| self.states[idx])
    }

    /// Task names in graph insertion order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.graph.tasks().map(|t| t.name.as_str())
    }

    /// Overall run outcome so far.
    pub fn report(&self) -> RunReport {
        RunReport {
            failed: self.first_failure.clone(),
            interrupted: false,
        }
    }

    fn deps_satisfied(&self, idx: usize) -> bool {
        self.graph.task(idx).deps.iter().all(|dep| {
            let dep_idx = self
                .graph
                .index_of(dep)
                .expect("sealed graph contains all dependency names");
            self.states[dep_idx].satisfies_dependents()
        })
    }

    fn promote_dependents(&mut self, idx: usize) {
        // dependents_of() is ordered by insertion index, so ties among tasks
        // that become ready at the same instant resolve deterministically.
        for &dep_idx in self.graph.dependents_of(idx) {
            if self.states[dep_idx] == TaskState::Pending && self.deps_satisfied(dep_idx) {
                self.states[dep_idx] = TaskState::Ready;
                self.ready.push_back(dep_idx);
            }
        }
    }

    fn poison_dependents(&mut self, failed_idx: usize) {
        let mut stack: Vec<usize> = self.graph.dependents_of(failed_idx).to_vec();

        while let Some(idx) = stack.pop() {
            match self.states[idx] {
                TaskState::Pending | TaskState::Ready => {
                    self.states[idx] = TaskState::Failed;
                    debug!(
                        task = %self.graph.task(idx).name,
                        "poisoned by upstream failure; will not run"
                    );
                    stack.extend(self.graph.dependents_of(idx));
                }
                // Running dependents drain naturally; terminal states stay.
                TaskState::Running
                | TaskState::Succeeded
                | TaskState::Failed
                | TaskState::Skipped => {}
            }
        }

        let states = &self.states;
        self.ready.retain(|&idx| states[idx] == TaskState::Ready);
    }
}
