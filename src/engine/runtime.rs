// src/engine/runtime.rs

use std::fmt;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::dag::ScheduledTask;
use crate::engine::{RunReport, RuntimeEvent};
use crate::errors::Result;
use crate::exec::ExecutorBackend;
use crate::timing::StageTimer;

use super::core::CoreRuntime;
use super::CoreCommand;

/// Drives the slot scheduler in response to `RuntimeEvent`s and delegates
/// actual command execution to an `ExecutorBackend`.
///
/// This is a pure IO shell around `CoreRuntime`, which contains all the
/// runtime semantics. This struct handles async IO: reading events from
/// channels, dispatching tasks to the executor, and feeding the stage timer.
pub struct Runtime<E: ExecutorBackend> {
    core: CoreRuntime,
    event_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
    timer: StageTimer,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("core", &self.core)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(core: CoreRuntime, event_rx: mpsc::Receiver<RuntimeEvent>, executor: E) -> Self {
        Self {
            core,
            event_rx,
            executor,
            timer: StageTimer::new(),
        }
    }

    /// Main event loop.
    ///
    /// - Consumes `RuntimeEvent`s from `event_rx`.
    /// - Feeds them into the core runtime.
    /// - Executes the commands returned by the core.
    ///
    /// Returns the final [`RunReport`] once the run settles (or is
    /// interrupted).
    pub async fn run(mut self) -> Result<RunReport> {
        info!("batchdag runtime started");

        let mut interrupted = false;

        loop {
            let event = match self.event_rx.recv().await {
                Some(e) => e,
                None => {
                    info!("runtime event channel closed; exiting");
                    break;
                }
            };

            debug!(?event, "runtime received event");

            if matches!(event, RuntimeEvent::ShutdownRequested) {
                interrupted = !self.core.is_settled();
            }

            let step = self.core.step(event);

            for command in step.commands {
                self.execute_command(command).await?;
            }

            if !step.keep_running {
                info!("core requested exit; stopping runtime");
                break;
            }
        }

        self.timer.finish();

        let mut report = self.core.report();
        report.interrupted = interrupted;
        Ok(report)
    }

    /// Execute a single command from the core.
    async fn execute_command(&mut self, command: CoreCommand) -> Result<()> {
        match command {
            CoreCommand::DispatchTasks(tasks) => {
                self.dispatch(tasks).await?;
            }
            CoreCommand::RequestExit => {
                info!("core issued RequestExit command");
            }
        }
        Ok(())
    }

    async fn dispatch(&mut self, tasks: Vec<ScheduledTask>) -> Result<()> {
        if tasks.is_empty() {
            return Ok(());
        }

        for task in tasks.iter() {
            self.timer.observe_stage(task.stage);
        }

        let names: Vec<_> = tasks.iter().map(|t| t.name.as_str()).collect();
        debug!(?names, "dispatching admitted tasks");

        self.executor.spawn_ready_tasks(tasks).await
    }
}
