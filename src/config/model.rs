// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

/// Top-level pipeline file as read from TOML, before semantic validation.
///
/// ```toml
/// [config]
/// total_cores = 8
///
/// [task.index_tumor]
/// cmd = "samtools index tumor.bam"
/// stage = 0
///
/// [task.normalize]
/// cmd = "normalize -t tumor.bam -n normal.bam -o out/"
/// cores = 2
/// after = ["index_tumor"]
/// stage = 2
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawPipelineFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// All tasks from `[task.<name>]`.
    ///
    /// Keys are the *task names* (e.g. `"normalize"`, `"segment_chr1"`).
    #[serde(default)]
    pub task: BTreeMap<String, TaskSection>,
}

/// A pipeline file that has passed semantic validation.
///
/// Constructed via `PipelineFile::try_from(raw)`; see `config::validate`.
#[derive(Debug, Clone)]
pub struct PipelineFile {
    pub config: ConfigSection,
    pub task: BTreeMap<String, TaskSection>,
}

impl PipelineFile {
    /// Internal constructor used by validation. Callers should go through
    /// `TryFrom<RawPipelineFile>` instead.
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        task: BTreeMap<String, TaskSection>,
    ) -> Self {
        Self { config, task }
    }
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Default total core budget; the `--cores` CLI flag overrides this.
    #[serde(default = "default_total_cores")]
    pub total_cores: usize,
}

fn default_total_cores() -> usize {
    8
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            total_cores: default_total_cores(),
        }
    }
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskSection {
    /// The command to execute.
    ///
    /// A task without `cmd` is a barrier: it succeeds immediately once its
    /// dependencies have succeeded, and is useful purely as a sync point.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Number of cores this task occupies while running.
    #[serde(default = "default_cores")]
    pub cores: usize,

    /// Dependency list: this task waits for all tasks listed here.
    #[serde(default)]
    pub after: Vec<String>,

    /// Logical pipeline stage this task belongs to.
    ///
    /// Stages group tasks for wall-clock reporting and for the `--step`
    /// start-stage selector; they have no effect on scheduling order.
    #[serde(default)]
    pub stage: u32,
}

fn default_cores() -> usize {
    1
}
