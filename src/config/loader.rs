// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{PipelineFile, RawPipelineFile};
use crate::errors::Result;

/// Load a pipeline file from a given path and return the raw `RawPipelineFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (dependency integrity, acyclicity, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawPipelineFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let raw: RawPipelineFile = toml::from_str(&contents)?;

    Ok(raw)
}

/// Load a pipeline file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - unknown or self `after` references,
///   - DAG cycles,
///   - zero core requirements,
///   - basic `[config]` sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<PipelineFile> {
    let raw = load_from_path(&path)?;
    let cfg = PipelineFile::try_from(raw)?;
    Ok(cfg)
}
