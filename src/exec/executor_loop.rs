// src/exec/executor_loop.rs

//! Background executor loop that manages running task processes.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::dag::ScheduledTask;
use crate::engine::RuntimeEvent;
use crate::exec::status_log::StatusLog;
use crate::exec::task_runner::run_task;
use crate::resume::MarkerStore;

/// Spawn the background executor loop.
///
/// The returned `mpsc::Sender<ScheduledTask>` is what `RealExecutorBackend`
/// uses to forward admitted tasks. Each task executes in its own Tokio task;
/// the scheduler guarantees a task name is admitted at most once per run, so
/// no per-name dedup is needed here.
pub fn spawn_executor(
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    status_log: Arc<StatusLog>,
    markers: Option<Arc<MarkerStore>>,
) -> mpsc::Sender<ScheduledTask> {
    let (tx, mut rx) = mpsc::channel::<ScheduledTask>(32);

    tokio::spawn(async move {
        info!("executor loop started");

        while let Some(task) = rx.recv().await {
            let rt_tx = runtime_tx.clone();
            let log = Arc::clone(&status_log);
            let markers = markers.clone();

            tokio::spawn(async move {
                run_task(task, rt_tx, log, markers).await;
            });
        }

        info!("executor loop finished (channel closed)");
    });

    tx
}
