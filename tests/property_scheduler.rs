// tests/property_scheduler.rs

//! Property tests for the slot scheduler over randomized DAGs.

use std::collections::HashSet;

use proptest::prelude::*;

use batchdag::dag::{GraphBuilder, SlotScheduler, Task, TaskState};
use batchdag::engine::TaskOutcome;
use batchdag::resume::NoResume;

const TOTAL_SLOTS: usize = 3;
const MAX_TASKS: usize = 12;

#[derive(Debug, Clone)]
struct TaskPlan {
    cores: usize,
    deps: Vec<usize>,
}

// Acyclicity by construction: task N may only depend on tasks 0..N-1.
fn plan_strategy() -> impl Strategy<Value = Vec<TaskPlan>> {
    (1..=MAX_TASKS).prop_flat_map(|num_tasks| {
        let per_task = (
            1..=TOTAL_SLOTS,
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
        );
        proptest::collection::vec(per_task, num_tasks).prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, (cores, raw_deps))| {
                    let mut deps: Vec<usize> = raw_deps
                        .into_iter()
                        .filter_map(|d| if i > 0 { Some(d % i) } else { None })
                        .collect::<HashSet<_>>()
                        .into_iter()
                        .collect();
                    deps.sort_unstable();
                    TaskPlan { cores, deps }
                })
                .collect()
        })
    })
}

fn build_scheduler(plans: &[TaskPlan]) -> SlotScheduler {
    let mut builder = GraphBuilder::new();
    for (i, plan) in plans.iter().enumerate() {
        builder
            .add_task(Task {
                name: format!("task_{i}"),
                command: Some(format!("echo task_{i}")),
                cores: plan.cores,
                stage: 0,
                deps: plan.deps.iter().map(|d| format!("task_{d}")).collect(),
            })
            .expect("generated task is valid");
    }
    let graph = builder.seal(TOTAL_SLOTS).expect("cores bounded by budget");
    SlotScheduler::new(graph, &NoResume).expect("no resume state")
}

proptest! {
    /// Summed core requirements of running tasks never exceed the budget, and
    /// every run terminates with all reachable tasks terminal.
    #[test]
    fn budget_is_never_exceeded_and_runs_terminate(
        plans in plan_strategy(),
        failing in proptest::collection::vec(any::<usize>(), 0..4),
    ) {
        let failing: HashSet<usize> = failing
            .into_iter()
            .map(|i| i % MAX_TASKS)
            .collect();

        let mut scheduler = build_scheduler(&plans);
        let mut executing: Vec<(String, usize)> = Vec::new();
        let mut occupied = 0usize;

        for task in scheduler.admit() {
            occupied += task.cores;
            executing.push((task.name, task.cores));
        }
        prop_assert!(occupied <= TOTAL_SLOTS);

        let mut steps = 0;
        let max_steps = 10 * plans.len() + 10;

        while !scheduler.is_settled() {
            steps += 1;
            prop_assert!(steps < max_steps, "run did not terminate");
            prop_assert!(!executing.is_empty(), "not settled but nothing running");

            let (name, cores) = executing.remove(0);
            occupied -= cores;

            let index: usize = name
                .strip_prefix("task_")
                .and_then(|s| s.parse().ok())
                .unwrap();
            let outcome = if failing.contains(&index) {
                TaskOutcome::Failed(1)
            } else {
                TaskOutcome::Success
            };

            scheduler.complete(&name, outcome);
            for task in scheduler.admit() {
                occupied += task.cores;
                executing.push((task.name, task.cores));
            }

            prop_assert!(occupied <= TOTAL_SLOTS, "slot budget exceeded");
            prop_assert_eq!(occupied, scheduler.occupied_slots());
        }

        // Without failures every task must have succeeded.
        if failing.iter().all(|&i| i >= plans.len()) {
            for i in 0..plans.len() {
                prop_assert_eq!(
                    scheduler.state_of(&format!("task_{i}")),
                    Some(TaskState::Succeeded)
                );
            }
            prop_assert!(scheduler.report().failed.is_none());
        }
    }
}
