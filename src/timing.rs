// src/timing.rs

//! Wall-clock reporting per logical pipeline stage.
//!
//! Purely observational: the timer watches which stage each dispatched task
//! belongs to and logs elapsed times at stage boundaries and at run end. It
//! has no effect on scheduling.

use std::time::Instant;

use tracing::info;

#[derive(Debug)]
pub struct StageTimer {
    run_start: Instant,
    current: Option<(u32, Instant)>,
}

impl StageTimer {
    pub fn new() -> Self {
        Self {
            run_start: Instant::now(),
            current: None,
        }
    }

    /// Note that a task of `stage` was just dispatched.
    ///
    /// The first dispatch of a later stage closes the current one. Stages can
    /// overlap at runtime (the scheduler is not stage-ordered); the boundary
    /// reported here is the first time the pipeline reached the new stage.
    pub fn observe_stage(&mut self, stage: u32) {
        match self.current {
            None => {
                info!(stage, "stage started");
                self.current = Some((stage, Instant::now()));
            }
            Some((active, since)) if stage > active => {
                info!(
                    stage = active,
                    elapsed = ?since.elapsed(),
                    "stage finished"
                );
                info!(stage, "stage started");
                self.current = Some((stage, Instant::now()));
            }
            Some(_) => {}
        }
    }

    /// Close the current stage and report the total run duration.
    pub fn finish(&mut self) {
        if let Some((active, since)) = self.current.take() {
            info!(
                stage = active,
                elapsed = ?since.elapsed(),
                "stage finished"
            );
        }
        info!(total_elapsed = ?self.run_start.elapsed(), "pipeline run finished");
    }
}

impl Default for StageTimer {
    fn default() -> Self {
        Self::new()
    }
}
