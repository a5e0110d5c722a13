// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `batchdag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "batchdag",
    version,
    about = "Run a multi-stage batch pipeline as a task DAG under a global core budget.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the pipeline file (TOML).
    ///
    /// Default: `Batchdag.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Batchdag.toml")]
    pub pipeline: String,

    /// Output directory for task outputs, resume markers and the status log.
    #[arg(long, short = 'o', value_name = "DIR")]
    pub output_dir: PathBuf,

    /// Total core budget for concurrently running tasks.
    ///
    /// Overrides `[config].total_cores` from the pipeline file.
    #[arg(long, value_name = "N")]
    pub cores: Option<usize>,

    /// Start stage: tasks in earlier stages are kept in the graph as inert
    /// barriers and perform no work.
    #[arg(long, short = 's', value_name = "STAGE", default_value_t = 0)]
    pub step: u32,

    /// Delete and recreate the output directory before building the graph.
    ///
    /// This also discards resume markers, forcing a full re-run.
    #[arg(long)]
    pub clean: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BATCHDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the task graph, but don't execute any commands.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
