// src/exec/task_runner.rs

//! Individual task process runner.

use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::dag::ScheduledTask;
use crate::engine::{RuntimeEvent, TaskOutcome};
use crate::exec::status_log::StatusLog;
use crate::resume::MarkerStore;

/// Run a single task and emit a `TaskCompleted` event when it finishes.
///
/// - A barrier (no command) completes successfully without spawning anything.
/// - A command task spawns one child process via the platform shell; its
///   stdout and stderr are streamed to the status log and to tracing.
/// - On success of a command task, a resume marker is recorded so a later
///   invocation can skip it. Barriers never leave markers.
/// - A spawn failure is reported as `Failed(-1)`.
pub async fn run_task(
    task: ScheduledTask,
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    status_log: Arc<StatusLog>,
    markers: Option<Arc<MarkerStore>>,
) {
    let task_name = task.name.clone();

    let Some(command) = task.command.clone() else {
        debug!(task = %task_name, "barrier task; completing without execution");
        let _ = runtime_tx
            .send(RuntimeEvent::TaskCompleted {
                task: task_name,
                outcome: TaskOutcome::Success,
            })
            .await;
        return;
    };

    if let Err(err) = run_command_task(&task, &command, &runtime_tx, &status_log, &markers).await {
        error!(
            task = %task_name,
            error = %err,
            "task execution error"
        );
        let _ = runtime_tx
            .send(RuntimeEvent::TaskCompleted {
                task: task_name,
                outcome: TaskOutcome::Failed(-1),
            })
            .await;
    }
}

async fn run_command_task(
    task: &ScheduledTask,
    command: &str,
    runtime_tx: &mpsc::Sender<RuntimeEvent>,
    status_log: &Arc<StatusLog>,
    markers: &Option<Arc<MarkerStore>>,
) -> Result<()> {
    info!(
        task = %task.name,
        cores = task.cores,
        cmd = %command,
        "starting task process"
    );
    status_log.announce(command).await;

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    };

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning process for task '{}'", task.name))?;

    let stdout_handle = spawn_output_reader(
        task.name.clone(),
        "stdout",
        child.stdout.take(),
        Arc::clone(status_log),
    );
    let stderr_handle = spawn_output_reader(
        task.name.clone(),
        "stderr",
        child.stderr.take(),
        Arc::clone(status_log),
    );

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for process of task '{}'", task.name))?;

    // Drain remaining output before reporting completion so the status log
    // holds the full transcript by the time dependents start.
    let _ = tokio::join!(stdout_handle, stderr_handle);

    let code = status.code().unwrap_or(-1);
    let outcome = if status.success() {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failed(code)
    };

    info!(
        task = %task.name,
        exit_code = code,
        success = status.success(),
        "task process exited"
    );

    if status.success() {
        if let Some(markers) = markers {
            if let Err(e) = markers.record(&task.name) {
                // Losing a marker only costs a re-run next time.
                tracing::warn!(
                    task = %task.name,
                    error = %e,
                    "failed to record resume marker"
                );
            }
        }
    }

    runtime_tx
        .send(RuntimeEvent::TaskCompleted {
            task: task.name.clone(),
            outcome,
        })
        .await
        .with_context(|| {
            format!(
                "sending TaskCompleted event for task '{}' to runtime",
                task.name
            )
        })?;

    Ok(())
}

/// Stream one output pipe line-by-line into the status log and tracing.
fn spawn_output_reader<R>(
    task_name: String,
    stream: &'static str,
    pipe: Option<R>,
    status_log: Arc<StatusLog>,
) -> tokio::task::JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let Some(pipe) = pipe else {
            return;
        };

        let reader = BufReader::new(pipe);
        let mut lines = reader.lines();

        while let Ok(Some(line)) = lines.next_line().await {
            debug!(task = %task_name, "{stream}: {line}");
            status_log.line(&line).await;
        }
    })
}
