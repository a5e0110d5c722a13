// src/engine/core.rs

//! Pure core runtime state machine.
//!
//! This module contains a synchronous, deterministic "core runtime" that
//! consumes [`RuntimeEvent`]s and produces:
//! - an updated core state
//! - a list of "commands" describing what the IO shell should do next
//!
//! The async/IO-heavy shell (`engine::runtime::Runtime`) is responsible for:
//! - reading events from channels
//! - sending `ScheduledTask`s to the executor
//! - handling Ctrl+C / shutdown
//!
//! The core can be unit tested without any Tokio, channels, filesystem, or
//! processes.

use crate::dag::SlotScheduler;
use crate::engine::event_handlers::{handle_run_started, handle_task_completion, CoreStep};
use crate::engine::{RunReport, RuntimeEvent};

/// Pure core runtime state.
///
/// This owns the slot scheduler and nothing else: no channels, no Tokio
/// types, no IO.
#[derive(Debug)]
pub struct CoreRuntime {
    scheduler: SlotScheduler,
}

impl CoreRuntime {
    pub fn new(scheduler: SlotScheduler) -> Self {
        Self { scheduler }
    }

    /// Expose whether the run has settled (for tests and the shell).
    pub fn is_settled(&self) -> bool {
        self.scheduler.is_settled()
    }

    /// Final outcome of the run so far.
    pub fn report(&self) -> RunReport {
        self.scheduler.report()
    }

    /// Handle a single runtime event, updating core state and returning the
    /// resulting commands for the IO shell.
    pub fn step(&mut self, event: RuntimeEvent) -> CoreStep {
        match event {
            RuntimeEvent::RunStarted => handle_run_started(&mut self.scheduler),
            RuntimeEvent::TaskCompleted { task, outcome } => {
                handle_task_completion(&mut self.scheduler, task, outcome)
            }
            RuntimeEvent::ShutdownRequested => CoreStep {
                commands: Vec::new(),
                keep_running: false,
            },
        }
    }
}
