// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Every graph-construction error is raised before a single task has been
//! dispatched, so a failed build leaves no partial side effects behind.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Duplicate task name '{0}'")]
    DuplicateTask(String),

    #[error("task '{task}' depends on unknown task '{dep}' (dependencies must be added first)")]
    UnknownDependency { task: String, dep: String },

    #[error("task '{0}' has a core requirement of 0; every task must require at least one core")]
    InvalidCores(String),

    #[error("task '{task}' requires {cores} cores but the total budget is {total_slots}")]
    CoreBudgetExceeded {
        task: String,
        cores: usize,
        total_slots: usize,
    },

    #[error("Cycle detected in task DAG: {0}")]
    DagCycle(String),

    #[error(
        "inconsistent resume state: task '{task}' is marked done but its dependency '{dep}' is not"
    )]
    ResumeInconsistency { task: String, dep: String },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BatchdagError>;
