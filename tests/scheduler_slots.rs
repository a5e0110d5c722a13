// tests/scheduler_slots.rs

//! Slot-budget admission behaviour of the scheduler.

mod common;
use crate::common::{init_tracing, sealed_graph};

use batchdag::dag::{SlotScheduler, TaskState};
use batchdag::engine::TaskOutcome;
use batchdag::resume::NoResume;

#[test]
fn wide_task_defers_until_slots_free_up() {
    init_tracing();

    // a runs alone; b (2 cores) and c (1 core) both depend on a but cannot
    // share a 2-slot budget.
    let graph = sealed_graph(
        &[
            ("a", Some("true"), 1, &[]),
            ("b", Some("true"), 2, &["a"]),
            ("c", Some("true"), 1, &["a"]),
        ],
        2,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let first = scheduler.admit();
    assert_eq!(names(&first), vec!["a"]);

    scheduler.complete("a", TaskOutcome::Success);
    let second = scheduler.admit();
    // b became ready first and fills the budget; c defers.
    assert_eq!(names(&second), vec!["b"]);
    assert_eq!(scheduler.state_of("c"), Some(TaskState::Ready));
    assert_eq!(scheduler.occupied_slots(), 2);

    scheduler.complete("b", TaskOutcome::Success);
    let third = scheduler.admit();
    assert_eq!(names(&third), vec!["c"]);

    scheduler.complete("c", TaskOutcome::Success);
    assert!(scheduler.is_settled());
    assert!(scheduler.report().failed.is_none());
}

#[test]
fn narrow_task_can_overtake_one_that_does_not_fit() {
    init_tracing();

    // b (3 cores) is ahead of c (1 core) in the queue but does not fit while
    // a holds 2 slots; c does.
    let graph = sealed_graph(
        &[
            ("a", Some("true"), 2, &[]),
            ("b", Some("true"), 3, &[]),
            ("c", Some("true"), 1, &[]),
        ],
        3,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let first = scheduler.admit();
    assert_eq!(names(&first), vec!["a", "c"]);
    assert_eq!(scheduler.state_of("b"), Some(TaskState::Ready));

    scheduler.complete("a", TaskOutcome::Success);
    scheduler.complete("c", TaskOutcome::Success);

    let second = scheduler.admit();
    assert_eq!(names(&second), vec!["b"]);
}

#[test]
fn independent_tasks_admit_in_insertion_order() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("zeta", Some("true"), 1, &[]),
            ("alpha", Some("true"), 1, &[]),
            ("mid", Some("true"), 1, &[]),
        ],
        4,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let admitted = scheduler.admit();
    assert_eq!(names(&admitted), vec!["zeta", "alpha", "mid"]);
}

#[test]
fn barrier_synchronizes_its_dependencies() {
    init_tracing();

    let graph = sealed_graph(
        &[
            ("left", Some("true"), 1, &[]),
            ("right", Some("true"), 1, &[]),
            ("join", None, 1, &["left", "right"]),
            ("after", Some("true"), 1, &["join"]),
        ],
        4,
    );
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    let first = scheduler.admit();
    assert_eq!(names(&first), vec!["left", "right"]);

    scheduler.complete("left", TaskOutcome::Success);
    assert!(scheduler.admit().is_empty());

    scheduler.complete("right", TaskOutcome::Success);
    let second = scheduler.admit();
    assert_eq!(names(&second), vec!["join"]);

    scheduler.complete("join", TaskOutcome::Success);
    let third = scheduler.admit();
    assert_eq!(names(&third), vec!["after"]);
}

#[test]
fn completion_for_unknown_or_idle_task_is_ignored() {
    init_tracing();

    let graph = sealed_graph(&[("a", Some("true"), 1, &[])], 1);
    let mut scheduler = SlotScheduler::new(graph, &NoResume).unwrap();

    // Neither of these may corrupt the slot accounting.
    scheduler.complete("ghost", TaskOutcome::Success);
    scheduler.complete("a", TaskOutcome::Success); // not running yet

    assert_eq!(scheduler.occupied_slots(), 0);
    let admitted = scheduler.admit();
    assert_eq!(names(&admitted), vec!["a"]);
}

fn names(tasks: &[batchdag::dag::ScheduledTask]) -> Vec<&str> {
    tasks.iter().map(|t| t.name.as_str()).collect()
}
