// src/engine/event_handlers.rs

//! Event handling logic for the core runtime.

use crate::dag::{ScheduledTask, SlotScheduler};
use crate::engine::{TaskName, TaskOutcome};

/// Command produced by the pure core, to be executed by the outer IO shell.
#[derive(Debug, Clone)]
pub enum CoreCommand {
    /// Send these tasks to the executor.
    DispatchTasks(Vec<ScheduledTask>),
    /// Request that the runtime loop exits (run settled).
    RequestExit,
}

/// Decision returned by the core after handling a single `RuntimeEvent`.
#[derive(Debug, Clone)]
pub struct CoreStep {
    /// Commands the IO shell should execute.
    pub commands: Vec<CoreCommand>,
    /// Whether the outer runtime loop should keep running.
    pub keep_running: bool,
}

/// Handle run start: dispatch everything that is ready up front.
///
/// A graph whose tasks are all skipped (full resume) settles immediately.
pub fn handle_run_started(scheduler: &mut SlotScheduler) -> CoreStep {
    let admitted = scheduler.admit();
    step_from(scheduler, admitted)
}

/// Handle a task completion event.
///
/// Completion frees slots and may unblock dependents, so an admission pass
/// always follows. After a failure `admit` returns nothing and the run
/// settles once the remaining running tasks drain.
pub fn handle_task_completion(
    scheduler: &mut SlotScheduler,
    task: TaskName,
    outcome: TaskOutcome,
) -> CoreStep {
    scheduler.complete(&task, outcome);
    let admitted = scheduler.admit();
    step_from(scheduler, admitted)
}

fn step_from(scheduler: &SlotScheduler, admitted: Vec<ScheduledTask>) -> CoreStep {
    let mut commands = Vec::new();

    if !admitted.is_empty() {
        commands.push(CoreCommand::DispatchTasks(admitted));
    }

    let settled = scheduler.is_settled();
    if settled {
        commands.push(CoreCommand::RequestExit);
    }

    CoreStep {
        commands,
        keep_running: !settled,
    }
}
