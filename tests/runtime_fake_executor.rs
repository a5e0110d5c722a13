// tests/runtime_fake_executor.rs

//! Full engine loop driven by fake executors (no real processes).

mod common;
use crate::common::{init_tracing, sealed_graph};

use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use tokio::time::{timeout, Duration};

use batchdag::dag::SlotScheduler;
use batchdag::engine::{CoreRuntime, RunReport, Runtime, RuntimeEvent};
use batchdag::errors::Result;
use batchdag::exec::ExecutorBackend;
use batchdag::resume::{NoResume, ResumePredicate};
use batchdag_test_utils::fake_executor::{FakeExecutor, ScriptedExecutor};

async fn drive<E: ExecutorBackend>(
    scheduler: SlotScheduler,
    rt_tx: mpsc::Sender<RuntimeEvent>,
    rt_rx: mpsc::Receiver<RuntimeEvent>,
    executor: E,
) -> Result<RunReport> {
    rt_tx
        .send(RuntimeEvent::RunStarted)
        .await
        .map_err(anyhow::Error::from)?;

    let core = CoreRuntime::new(scheduler);
    let runtime = Runtime::new(core, rt_rx, executor);

    timeout(Duration::from_secs(3), runtime.run())
        .await
        .expect("runtime did not finish within 3 seconds")
}

#[tokio::test]
async fn simple_chain_runs_in_dependency_order() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("a", Some("echo a"), 1, &[]),
            ("b", Some("echo b"), 1, &["a"]),
        ],
        2,
    );
    let scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(rt_tx.clone(), executed.clone());

    let report = drive(scheduler, rt_tx, rt_rx, executor).await.unwrap();

    assert_eq!(report.exit_code(), 0);
    let tasks_run = executed.lock().unwrap().clone();
    assert_eq!(tasks_run, vec!["a".to_string(), "b".to_string()]);
}

#[tokio::test]
async fn failing_task_poisons_dependent_and_sets_exit_code() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("x", Some("variant_caller"), 1, &[]),
            ("y", Some("segmentation"), 1, &["x"]),
        ],
        2,
    );
    let scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = ScriptedExecutor::new(rt_tx.clone(), executed.clone()).fail("x", 3);

    let report = drive(scheduler, rt_tx, rt_rx, executor).await.unwrap();

    assert_eq!(report.exit_code(), 3);
    let failed = report.failed.expect("run failed");
    assert_eq!(failed.name, "x");

    // y was poisoned, never dispatched.
    let tasks_run = executed.lock().unwrap().clone();
    assert_eq!(tasks_run, vec!["x".to_string()]);
}

#[tokio::test]
async fn fully_resumed_run_settles_immediately_with_no_dispatches() {
    init_tracing();

    struct AllDone;
    impl ResumePredicate for AllDone {
        fn is_done(&self, _task: &str) -> bool {
            true
        }
    }

    let graph = sealed_graph(
        &[
            ("a", Some("echo a"), 1, &[]),
            ("b", Some("echo b"), 1, &["a"]),
        ],
        2,
    );
    let scheduler = SlotScheduler::new(graph, &AllDone).unwrap();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(rt_tx.clone(), executed.clone());

    let report = drive(scheduler, rt_tx, rt_rx, executor).await.unwrap();

    assert_eq!(report.exit_code(), 0);
    assert!(executed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn diamond_graph_joins_before_the_sink_runs() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("root", Some("true"), 1, &[]),
            ("left", Some("true"), 1, &["root"]),
            ("right", Some("true"), 1, &["root"]),
            ("sink", Some("true"), 1, &["left", "right"]),
        ],
        4,
    );
    let scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let executed = Arc::new(Mutex::new(Vec::new()));
    let executor = FakeExecutor::new(rt_tx.clone(), executed.clone());

    let report = drive(scheduler, rt_tx, rt_rx, executor).await.unwrap();
    assert_eq!(report.exit_code(), 0);

    let tasks_run = executed.lock().unwrap().clone();
    assert_eq!(tasks_run.first().map(String::as_str), Some("root"));
    assert_eq!(tasks_run.last().map(String::as_str), Some("sink"));
    assert_eq!(tasks_run.len(), 4);
}
