// src/engine/mod.rs

//! Orchestration engine for batchdag.
//!
//! This module ties together:
//! - the slot scheduler
//! - the main runtime event loop that reacts to:
//!   - run start
//!   - task completion events
//!   - shutdown signals
//!
//! The pure core state machine lives in [`core`]; the async/IO shell is
//! implemented in [`runtime`].

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// Outcome of a task for the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Success,
    Failed(i32),
}

/// Events flowing into the runtime from the caller and executors.
#[derive(Debug, Clone)]
pub enum RuntimeEvent {
    /// Kick off the run: dispatch the initially ready tasks.
    RunStarted,
    /// A task finished with a concrete outcome.
    TaskCompleted {
        task: TaskName,
        outcome: TaskOutcome,
    },
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// The first task to fail in a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedTask {
    pub name: TaskName,
    pub exit_code: i32,
}

/// Final outcome of one pipeline run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// First failing task, if any.
    pub failed: Option<FailedTask>,
    /// The run was cut short by a shutdown request before settling.
    pub interrupted: bool,
}

/// Conventional exit code for an interrupted run (128 + SIGINT).
const INTERRUPTED_EXIT_CODE: i32 = 130;

impl RunReport {
    /// Process exit code: the first failing task's exit code, or 0.
    pub fn exit_code(&self) -> i32 {
        match &self.failed {
            Some(failed) => failed.exit_code,
            None if self.interrupted => INTERRUPTED_EXIT_CODE,
            None => 0,
        }
    }
}

pub mod core;
pub mod event_handlers;
pub mod runtime;

pub use core::CoreRuntime;
pub use event_handlers::{CoreCommand, CoreStep};
pub use runtime::Runtime;
