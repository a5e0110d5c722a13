// src/outdir.rs

//! Output directory preparation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::errors::Result;

/// The pipeline's output directory: task outputs, resume markers, status log.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Ensure the output directory exists and is a directory.
    ///
    /// - If the path names a regular file, the file is removed first.
    /// - With `clean`, an existing directory is removed and recreated,
    ///   discarding all prior outputs and resume markers.
    /// - Otherwise existing contents are kept, which is what enables resume.
    pub fn prepare(path: &Path, clean: bool) -> Result<Self> {
        if path.is_file() {
            warn!(path = %path.display(), "output path is a file; removing it");
            fs::remove_file(path)?;
        } else if path.is_dir() && clean {
            info!(path = %path.display(), "clean flag is on; removing output directory");
            fs::remove_dir_all(path)?;
        }

        fs::create_dir_all(path)?;

        Ok(Self {
            root: path.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the append-only run log collecting every task's output.
    pub fn status_log_path(&self) -> PathBuf {
        self.root.join("status.log")
    }
}
