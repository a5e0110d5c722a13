// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod outdir;
pub mod pipeline;
pub mod resume;
pub mod timing;

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{error, info};

use crate::cli::CliArgs;
use crate::config::loader::load_and_validate;
use crate::config::PipelineFile;
use crate::dag::SlotScheduler;
use crate::engine::{CoreRuntime, Runtime, RuntimeEvent};
use crate::errors::{Error, Result};
use crate::exec::{RealExecutorBackend, StatusLog};
use crate::outdir::OutputDir;
use crate::resume::MarkerStore;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - pipeline file loading
/// - output directory preparation (force-clean, resume markers, status log)
/// - graph construction (start-step barriers)
/// - scheduler / runtime / executor
/// - Ctrl-C handling
///
/// Returns the process exit code: the first failing task's exit code, or 0
/// when every task succeeded.
pub async fn run(args: CliArgs) -> Result<i32> {
    let cfg = load_and_validate(&args.pipeline)?;

    let total_slots = args.cores.unwrap_or(cfg.config.total_cores);

    if args.dry_run {
        print_dry_run(&cfg, total_slots, args.step);
        return Ok(0);
    }

    // Output directory first: marker snapshot and status log live under it,
    // and --clean must wipe both before the graph consults them.
    let outdir = OutputDir::prepare(&args.output_dir, args.clean)?;
    let markers = Arc::new(MarkerStore::open(outdir.root())?);

    // Graph construction is fully eager; nothing has run yet if it fails.
    let graph = pipeline::build_graph(&cfg, args.step, total_slots)?;
    let scheduler = SlotScheduler::new(graph, markers.as_ref())?;

    let status_log = Arc::new(StatusLog::open(&outdir.status_log_path()).await?);
    let status_log_path = status_log.path().to_path_buf();

    // Runtime event channel.
    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(64);

    let executor = RealExecutorBackend::new(rt_tx.clone(), status_log, Some(markers));

    // Ctrl-C → graceful shutdown.
    {
        let tx = rt_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(RuntimeEvent::ShutdownRequested).await;
        });
    }

    info!(
        total_cores = total_slots,
        start_step = args.step,
        output_dir = %outdir.root().display(),
        "starting pipeline run"
    );
    rt_tx
        .send(RuntimeEvent::RunStarted)
        .await
        .map_err(Error::from)?;

    let core = CoreRuntime::new(scheduler);
    let runtime = Runtime::new(core, rt_rx, executor);
    let report = runtime.run().await?;

    if let Some(failed) = &report.failed {
        error!(
            task = %failed.name,
            exit_code = failed.exit_code,
            status_log = %status_log_path.display(),
            "pipeline failed; task output is in the status log"
        );
    }

    Ok(report.exit_code())
}

/// Simple dry-run output: print tasks, deps, commands, cores and stages.
fn print_dry_run(cfg: &PipelineFile, total_slots: usize, start_step: u32) {
    println!("batchdag dry-run");
    println!("  total_cores = {total_slots}");
    println!("  start_step = {start_step}");
    println!();

    println!("tasks ({}):", cfg.task.len());
    for (name, task) in cfg.task.iter() {
        println!("  - {name}");
        match &task.cmd {
            Some(cmd) if task.stage >= start_step => println!("      cmd: {cmd}"),
            Some(_) => println!("      cmd: (barrier; stage before start step)"),
            None => println!("      cmd: (barrier)"),
        }
        println!("      cores: {}", task.cores);
        println!("      stage: {}", task.stage);
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
    }
}
