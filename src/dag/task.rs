// src/dag/task.rs

//! Task definitions and per-run state.

use crate::engine::TaskName;

/// Lifecycle state of a task within one pipeline run.
///
/// `Pending -> Ready -> Running -> {Succeeded | Failed}`, plus the resume
/// shortcut `Pending -> Skipped` (applied once, at scheduler construction)
/// and the poison transition `Pending/Ready -> Failed` when an upstream
/// task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting on at least one dependency.
    Pending,
    /// All dependencies satisfied; waiting for free slots.
    Ready,
    /// Dispatched to the executor and currently occupying slots.
    Running,
    /// Command exited 0, or the task had no command.
    Succeeded,
    /// Command exited nonzero, could not be spawned, or an upstream failed.
    Failed,
    /// Known-complete from a prior run; satisfied but never executed.
    Skipped,
}

impl TaskState {
    /// Terminal states: nothing further will happen to this task.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TaskState::Succeeded | TaskState::Failed | TaskState::Skipped
        )
    }

    /// Whether this state satisfies a dependent's `after` edge.
    pub fn satisfies_dependents(self) -> bool {
        matches!(self, TaskState::Succeeded | TaskState::Skipped)
    }
}

/// Static description of a task, fixed once the graph is sealed.
#[derive(Debug, Clone)]
pub struct Task {
    pub name: TaskName,

    /// External command line, run via the platform shell.
    ///
    /// `None` makes the task a barrier: it succeeds immediately once admitted,
    /// without spawning anything.
    pub command: Option<String>,

    /// Slots occupied for the duration of execution. Always >= 1.
    pub cores: usize,

    /// Logical pipeline stage, used for timing reports and `--step`.
    pub stage: u32,

    /// Direct dependencies; all must be `Succeeded` or `Skipped` before this
    /// task becomes `Ready`.
    pub deps: Vec<TaskName>,
}

impl Task {
    pub fn is_barrier(&self) -> bool {
        self.command.is_none()
    }
}

/// Description of a task the scheduler has admitted for execution now.
#[derive(Debug, Clone)]
pub struct ScheduledTask {
    pub name: TaskName,
    pub command: Option<String>,
    pub cores: usize,
    pub stage: u32,
}

impl ScheduledTask {
    pub fn from_task(task: &Task) -> Self {
        Self {
            name: task.name.clone(),
            command: task.command.clone(),
            cores: task.cores,
            stage: task.stage,
        }
    }
}
