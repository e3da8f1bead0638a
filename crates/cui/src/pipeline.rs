//! Parallel per-file execution shared by `migrate` and `lint`.
//!
//! Every file is an independent task: it is read, parsed and processed on a
//! rayon worker and produces exactly one [`TaskOutcome`]. Errors and panics
//! stay inside the task that raised them. Results come back in input order.

use std::any::Any;
use std::io::Write;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use cui_ast::SourceFile;
use log::{debug, warn};
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use similar::TextDiff;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Stop starting new file tasks on Ctrl-C. Tasks already running, including
/// their writes, complete normally.
pub fn install_interrupt_handler() {
    static INSTALL: Once = Once::new();
    INSTALL.call_once(|| {
        if let Err(e) = ctrlc::set_handler(|| INTERRUPTED.store(true, Ordering::SeqCst)) {
            warn!("Failed to set Ctrl+C handler: {e}");
        }
    });
}

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::SeqCst)
}

#[derive(Debug)]
pub enum TaskOutcome<T> {
    Done(T),
    Failed(String),
    /// Not started because the run was interrupted.
    Cancelled,
}

#[derive(Debug)]
pub struct FileResult<T> {
    pub path: PathBuf,
    pub outcome: TaskOutcome<T>,
}

pub fn build_pool(jobs: Option<usize>) -> Result<rayon::ThreadPool> {
    let jobs = jobs.filter(|&n| n > 0).unwrap_or_else(|| {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    });
    debug!("Using {jobs} worker threads");
    ThreadPoolBuilder::new()
        .num_threads(jobs)
        .thread_name(|idx| format!("cui-worker-{idx}"))
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build worker thread pool: {e}"))
}

/// Run `task` for every file on `pool`.
pub fn run_files<T, F>(pool: &rayon::ThreadPool, files: &[PathBuf], task: F) -> Vec<FileResult<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync,
{
    pool.install(|| {
        files
            .par_iter()
            .map(|path| {
                if interrupted() {
                    return FileResult {
                        path: path.clone(),
                        outcome: TaskOutcome::Cancelled,
                    };
                }
                debug!("Processing {}", path.display());
                let outcome = match catch_unwind(AssertUnwindSafe(|| task(path))) {
                    Ok(Ok(value)) => TaskOutcome::Done(value),
                    Ok(Err(e)) => TaskOutcome::Failed(format!("{e:#}")),
                    Err(payload) => TaskOutcome::Failed(format!(
                        "internal error: {}",
                        panic_message(payload.as_ref())
                    )),
                };
                FileResult {
                    path: path.clone(),
                    outcome,
                }
            })
            .collect()
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "panic"
    }
}

/// Read and parse a source file.
pub fn read_source(path: &Path) -> Result<SourceFile> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(SourceFile::parse(path, text)?)
}

/// Replace the contents of `path` without leaving a partial file behind.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| {
            f.write_all(contents.as_bytes())?;
            f.flush()
        })
        .map_err(|err| anyhow::anyhow!("Failed to write {}: {err}", path.display()))
}

pub fn unified_diff(display: &str, old: &str, new: &str) -> String {
    let diff = TextDiff::from_lines(old, new);
    format!(
        "{}",
        diff.unified_diff()
            .context_radius(3)
            .header(&format!("old/{display}"), &format!("new/{display}"))
    )
}

/// `path` relative to `base` with forward slashes, for output.
pub fn display_path(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .ok()
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
