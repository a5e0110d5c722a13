use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use batchdag::dag::ScheduledTask;
use batchdag::engine::{RuntimeEvent, TaskOutcome};
use batchdag::errors::Result;
use batchdag::exec::ExecutorBackend;

/// A fake executor that:
/// - records which tasks were "run"
/// - immediately reports TaskCompleted(Success) for each dispatched task.
pub struct FakeExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
}

impl FakeExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
        }
    }
}

impl ExecutorBackend for FakeExecutor {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);

        Box::pin(async move {
            for t in tasks {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(t.name.clone());
                }

                tx.send(RuntimeEvent::TaskCompleted {
                    task: t.name.clone(),
                    outcome: TaskOutcome::Success,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}

/// A fake executor with scripted failures: tasks listed in `failures`
/// complete with the given exit code, everything else succeeds.
pub struct ScriptedExecutor {
    runtime_tx: mpsc::Sender<RuntimeEvent>,
    executed: Arc<Mutex<Vec<String>>>,
    failures: HashMap<String, i32>,
}

impl ScriptedExecutor {
    pub fn new(
        runtime_tx: mpsc::Sender<RuntimeEvent>,
        executed: Arc<Mutex<Vec<String>>>,
    ) -> Self {
        Self {
            runtime_tx,
            executed,
            failures: HashMap::new(),
        }
    }

    pub fn fail(mut self, task: &str, exit_code: i32) -> Self {
        self.failures.insert(task.to_string(), exit_code);
        self
    }
}

impl ExecutorBackend for ScriptedExecutor {
    fn spawn_ready_tasks(
        &mut self,
        tasks: Vec<ScheduledTask>,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let tx = self.runtime_tx.clone();
        let executed = Arc::clone(&self.executed);
        let failures = self.failures.clone();

        Box::pin(async move {
            for t in tasks {
                {
                    let mut guard = executed.lock().unwrap();
                    guard.push(t.name.clone());
                }

                let outcome = match failures.get(&t.name) {
                    Some(&code) => TaskOutcome::Failed(code),
                    None => TaskOutcome::Success,
                };

                tx.send(RuntimeEvent::TaskCompleted {
                    task: t.name.clone(),
                    outcome,
                })
                .await
                .map_err(anyhow::Error::from)?;
            }
            Ok(())
        })
    }
}
