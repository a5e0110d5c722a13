// src/exec/status_log.rs

//! Append-only run log in the output directory.
//!
//! Every task contributes one `Running <command> ...` announcement plus the
//! command's own interleaved output lines, so failures stay diagnosable after
//! the process tree is long gone. Writes are best-effort: a log write that
//! fails is reported but never fails the task that produced it.

use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::warn;

use crate::errors::Result;

#[derive(Debug)]
pub struct StatusLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl StatusLog {
    /// Open the status log for appending, creating it if missing.
    pub async fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await?;

        Ok(Self {
            path: path.to_path_buf(),
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Announce that a task's command is starting.
    pub async fn announce(&self, command: &str) {
        self.append(&format!("Running {command} ...\n")).await;
    }

    /// Append one line of task output.
    pub async fn line(&self, line: &str) {
        self.append(&format!("{line}\n")).await;
    }

    async fn append(&self, text: &str) {
        let mut file = self.file.lock().await;
        if let Err(e) = file.write_all(text.as_bytes()).await {
            warn!(
                path = %self.path.display(),
                error = %e,
                "failed to append to status log"
            );
        }
    }
}
