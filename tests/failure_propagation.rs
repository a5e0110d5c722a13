// tests/failure_propagation.rs

//! Failure poisoning and fail-fast admission.

mod common;
use crate::common::{init_tracing, sealed_graph};

use batchdag::dag::{SlotScheduler, TaskState};
use batchdag::engine::TaskOutcome;
use batchdag::resume::NoResume;

#[test]
fn failure_poisons_transitive_dependents_without_running_them() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("x", Some("exit 3"), 1, &[]),
            ("y", Some("true"), 1, &["x"]),
            ("z", Some("true"), 1, &["y"]),
        ],
        2,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let admitted = scheduler.admit();
    assert_eq!(admitted.len(), 1);

    scheduler.complete("x", TaskOutcome::Failed(3));

    assert_eq!(scheduler.state_of("y"), Some(TaskState::Failed));
    assert_eq!(scheduler.state_of("z"), Some(TaskState::Failed));
    assert!(scheduler.admit().is_empty());
    assert!(scheduler.is_settled());

    let report = scheduler.report();
    let failed = report.failed.clone().expect("run failed");
    assert_eq!(failed.name, "x");
    assert_eq!(failed.exit_code, 3);
    assert_eq!(report.exit_code(), 3);
}

#[test]
fn no_admission_after_failure_even_for_unrelated_ready_tasks() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("bad", Some("false"), 2, &[]),
            ("unrelated", Some("true"), 2, &[]),
        ],
        2,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let first = scheduler.admit();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name, "bad");

    scheduler.complete("bad", TaskOutcome::Failed(1));

    // "unrelated" is Ready with free slots available, but fail-fast blocks it.
    assert_eq!(scheduler.state_of("unrelated"), Some(TaskState::Ready));
    assert!(scheduler.admit().is_empty());
    assert!(scheduler.is_settled());
}

#[test]
fn running_siblings_drain_after_a_failure() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("bad", Some("false"), 1, &[]),
            ("slow", Some("sleep 5"), 1, &[]),
        ],
        2,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let admitted = scheduler.admit();
    assert_eq!(admitted.len(), 2);

    scheduler.complete("bad", TaskOutcome::Failed(1));

    // The sibling keeps running; the run is not over until it drains.
    assert_eq!(scheduler.state_of("slow"), Some(TaskState::Running));
    assert!(!scheduler.is_settled());

    scheduler.complete("slow", TaskOutcome::Success);
    assert_eq!(scheduler.state_of("slow"), Some(TaskState::Succeeded));
    assert!(scheduler.is_settled());
}

#[test]
fn first_failure_determines_the_report() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("first", Some("exit 7"), 1, &[]),
            ("second", Some("exit 9"), 1, &[]),
        ],
        2,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    scheduler.admit();
    scheduler.complete("first", TaskOutcome::Failed(7));
    scheduler.complete("second", TaskOutcome::Failed(9));

    let failed = scheduler.report().failed.expect("run failed");
    assert_eq!(failed.name, "first");
    assert_eq!(failed.exit_code, 7);
}
