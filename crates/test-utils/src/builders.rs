#![allow(dead_code)]

use std::collections::BTreeMap;

use batchdag::config::{ConfigSection, PipelineFile, RawPipelineFile, TaskSection};

/// Builder for `PipelineFile` to simplify test setup.
pub struct PipelineFileBuilder {
    raw: RawPipelineFile,
}

impl PipelineFileBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawPipelineFile {
                config: ConfigSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn with_task(mut self, name: &str, task: TaskSection) -> Self {
        self.raw.task.insert(name.to_string(), task);
        self
    }

    pub fn with_total_cores(mut self, total_cores: usize) -> Self {
        self.raw.config.total_cores = total_cores;
        self
    }

    pub fn build(self) -> PipelineFile {
        PipelineFile::try_from(self.raw).expect("Failed to build valid pipeline from builder")
    }

    /// Build without validation succeeding, for error-path tests.
    pub fn try_build(self) -> Result<PipelineFile, batchdag::errors::BatchdagError> {
        PipelineFile::try_from(self.raw)
    }
}

impl Default for PipelineFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskSection`.
pub struct TaskSectionBuilder {
    task: TaskSection,
}

impl TaskSectionBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            task: TaskSection {
                cmd: Some(cmd.to_string()),
                cores: 1,
                after: vec![],
                stage: 0,
            },
        }
    }

    /// A task with no command: a pure synchronization point.
    pub fn barrier() -> Self {
        Self {
            task: TaskSection {
                cmd: None,
                cores: 1,
                after: vec![],
                stage: 0,
            },
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn cores(mut self, cores: usize) -> Self {
        self.task.cores = cores;
        self
    }

    pub fn stage(mut self, stage: u32) -> Self {
        self.task.stage = stage;
        self
    }

    pub fn build(self) -> TaskSection {
        self.task
    }
}
