// src/config/validate.rs

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::{BatchdagError, Result};

impl TryFrom<RawPipelineFile> for PipelineFile {
    type Error = BatchdagError;

    fn try_from(raw: RawPipelineFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_pipeline(&raw)?;
        Ok(PipelineFile::new_unchecked(raw.config, raw.task))
    }
}

fn validate_raw_pipeline(cfg: &RawPipelineFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_global_config(cfg)?;
    validate_task_dependencies(cfg)?;
    validate_core_requirements(cfg)?;
    validate_dag(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawPipelineFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(BatchdagError::ConfigError(
            "pipeline must contain at least one [task.<name>] section".to_string(),
        ));
    }
    Ok(())
}

fn validate_global_config(cfg: &RawPipelineFile) -> Result<()> {
    if cfg.config.total_cores == 0 {
        return Err(BatchdagError::ConfigError(
            "[config].total_cores must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_task_dependencies(cfg: &RawPipelineFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            if !cfg.task.contains_key(dep) {
                return Err(BatchdagError::ConfigError(format!(
                    "task '{}' has unknown dependency '{}' in `after`",
                    name, dep
                )));
            }
            if dep == name {
                return Err(BatchdagError::ConfigError(format!(
                    "task '{}' cannot depend on itself in `after`",
                    name
                )));
            }
        }
    }
    Ok(())
}

fn validate_core_requirements(cfg: &RawPipelineFile) -> Result<()> {
    for (name, task) in cfg.task.iter() {
        if task.cores == 0 {
            return Err(BatchdagError::InvalidCores(name.clone()));
        }
    }
    Ok(())
}

fn validate_dag(cfg: &RawPipelineFile) -> Result<()> {
    // Build a petgraph graph from the tasks and their dependencies.
    //
    // Edge direction: dep -> task
    // For:
    //   [task.B]
    //   after = ["A"]
    // we add edge A -> B.
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for name in cfg.task.keys() {
        graph.add_node(name.as_str());
    }

    for (name, task) in cfg.task.iter() {
        for dep in task.after.iter() {
            graph.add_edge(dep.as_str(), name.as_str(), ());
        }
    }

    // A topological sort will fail if there is a cycle.
    match toposort(&graph, None) {
        Ok(_order) => Ok(()),
        Err(cycle) => {
            let node = cycle.node_id();
            Err(BatchdagError::DagCycle(format!(
                "cycle detected in task DAG involving task '{}'",
                node
            )))
        }
    }
}
