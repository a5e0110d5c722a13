// src/config/mod.rs

//! Pipeline file loading and validation.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigSection, PipelineFile, RawPipelineFile, TaskSection};
