// src/resume.rs

//! Resume evidence: which tasks already completed in a prior run.
//!
//! The engine only consumes a predicate; the marker scheme below is the
//! scheme this tool ships, not something the scheduler depends on. The
//! snapshot is taken once when the store is opened and is never re-read
//! during a run; new markers are written task-by-task as tasks succeed so a
//! later invocation against the same output directory can resume.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::Result;

/// Predicate supplied to the scheduler: "is task X already done?"
pub trait ResumePredicate {
    fn is_done(&self, task: &str) -> bool;
}

/// No prior evidence; every task runs.
pub struct NoResume;

impl ResumePredicate for NoResume {
    fn is_done(&self, _task: &str) -> bool {
        false
    }
}

/// File-marker store: one `markers/<task>.done` file per completed task.
///
/// Only command-backed tasks leave markers. Barrier tasks are deliberately
/// inert and produce no evidence, so a later run re-reaches them instead of
/// skipping them.
#[derive(Debug)]
pub struct MarkerStore {
    dir: PathBuf,
    snapshot: HashSet<String>,
}

const MARKER_SUFFIX: &str = ".done";

impl MarkerStore {
    /// Open (creating if needed) the marker directory under `output_dir` and
    /// snapshot the markers present right now.
    pub fn open(output_dir: &Path) -> Result<Self> {
        let dir = output_dir.join("markers");
        fs::create_dir_all(&dir)?;

        let mut snapshot = HashSet::new();
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if let Some(task) = name.strip_suffix(MARKER_SUFFIX) {
                snapshot.insert(task.to_string());
            }
        }

        debug!(
            dir = %dir.display(),
            markers = snapshot.len(),
            "opened resume marker store"
        );

        Ok(Self { dir, snapshot })
    }

    /// Record completion evidence for a task.
    ///
    /// Does not touch the in-memory snapshot; the new marker is only visible
    /// to the next invocation.
    pub fn record(&self, task: &str) -> io::Result<()> {
        fs::write(self.marker_path(task), b"")
    }

    pub fn marker_path(&self, task: &str) -> PathBuf {
        self.dir.join(format!("{task}{MARKER_SUFFIX}"))
    }
}

impl ResumePredicate for MarkerStore {
    fn is_done(&self, task: &str) -> bool {
        self.snapshot.contains(task)
    }
}
