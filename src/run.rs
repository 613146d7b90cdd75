//! Run coordinator: drive walk → filter → assemble across a whole tree.
//!
//! ## Containment policy
//!
//! Only input validation can fail a run up front. Once the walk begins,
//! every failure is contained to the directory that produced it: the
//! directory gets a [`DirectoryStatus::Failed`] entry and the run moves on.
//! A run therefore always reaches completion and always produces a final
//! [`RunStats`], even if every individual directory failed.
//!
//! ## Why spawn_blocking?
//!
//! The pipeline is CPU- and disk-bound (image decoding, JPEG encoding, PDF
//! serialisation). [`run`] moves the whole pass onto a blocking-pool thread
//! so an interactive caller's async runtime stays responsive; the returned
//! future is the task handle — awaiting it is "wait for completion".
//! Synchronous callers use [`run_sync`] and skip the runtime entirely.

use crate::config::RunConfig;
use crate::error::{BinderError, DirectoryError};
use crate::output::{DirectoryResult, DirectoryStatus, RunOutput, RunStats};
use crate::pipeline::{assemble, filter, walk};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};

/// Scan `root` and bundle every image-bearing directory into a PDF.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `root`   — existing directory to scan (validated before any work)
/// * `config` — run configuration
///
/// # Returns
/// `Ok(RunOutput)` on completion, even if some directories failed
/// (check `output.stats.failed_directories`).
///
/// # Errors
/// Returns `Err(BinderError)` only for fatal, before-any-work conditions:
/// the root does not exist, is not a directory, or cannot be read.
pub async fn run(
    root: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<RunOutput, BinderError> {
    let root = root.as_ref().to_path_buf();
    let config = config.clone();

    tokio::task::spawn_blocking(move || run_blocking(&root, &config))
        .await
        .map_err(|e| BinderError::Internal(format!("Run task panicked: {}", e)))?
}

/// Synchronous equivalent of [`run`] for callers without an async runtime.
pub fn run_sync(root: impl AsRef<Path>, config: &RunConfig) -> Result<RunOutput, BinderError> {
    run_blocking(root.as_ref(), config)
}

/// The single sequential worker: one pass over the tree.
fn run_blocking(root: &Path, config: &RunConfig) -> Result<RunOutput, BinderError> {
    let total_start = Instant::now();

    // ── Step 1: Validate the input root ──────────────────────────────────
    validate_root(root)?;
    info!("Starting run over {}", root.display());

    // ── Step 2: Enumerate candidate directories ──────────────────────────
    let scan_start = Instant::now();
    let (dirs, walk_failures) = walk::walk(root);
    let scan_duration_ms = scan_start.elapsed().as_millis() as u64;

    // An unreadable directory appears both as a yielded entry and as a walk
    // failure; keep only failures with no directory entry so each path is
    // reported exactly once (the listed copy fails again at filter time).
    let orphan_failures: Vec<walk::WalkFailure> = walk_failures
        .into_iter()
        .filter(|f| !dirs.contains(&f.path))
        .collect();

    let total_dirs = dirs.len() + orphan_failures.len();
    info!("Found {} candidate directories", total_dirs);

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_start(total_dirs);
    }

    // ── Step 3: Process each directory ───────────────────────────────────
    let assemble_start = Instant::now();
    let mut results = Vec::with_capacity(total_dirs);
    let mut index = 0usize;

    for dir in &dirs {
        index += 1;
        results.push(process_directory(dir, index, total_dirs, root, config));
    }

    for failure in orphan_failures {
        index += 1;
        warn!("{}: {}", failure.path.display(), failure.detail);
        let error = DirectoryError::Access {
            path: failure.path.clone(),
            detail: failure.detail,
        };
        if let Some(ref cb) = config.progress_callback {
            cb.on_directory_error(index, total_dirs, &failure.path, &error.to_string());
        }
        results.push(DirectoryResult {
            directory: failure.path,
            image_count: 0,
            status: DirectoryStatus::Failed { error },
        });
    }
    let assemble_duration_ms = assemble_start.elapsed().as_millis() as u64;

    // ── Step 4: Compute stats ────────────────────────────────────────────
    let mut stats = RunStats {
        directories_visited: results.len(),
        scan_duration_ms,
        assemble_duration_ms,
        ..Default::default()
    };
    for result in &results {
        match &result.status {
            DirectoryStatus::Succeeded { pages, .. } => {
                stats.documents_written += 1;
                stats.total_pages += pages;
            }
            DirectoryStatus::SkippedEmpty => stats.empty_directories += 1,
            DirectoryStatus::Failed { .. } => stats.failed_directories += 1,
        }
    }
    stats.total_duration_ms = total_start.elapsed().as_millis() as u64;

    info!(
        "Run complete: {} written, {} empty, {} failed, {}ms total",
        stats.documents_written,
        stats.empty_directories,
        stats.failed_directories,
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(total_dirs, stats.documents_written);
    }

    Ok(RunOutput { results, stats })
}

/// Filter and assemble one candidate directory, containing any failure.
fn process_directory(
    dir: &Path,
    index: usize,
    total_dirs: usize,
    root: &Path,
    config: &RunConfig,
) -> DirectoryResult {
    let images = match filter::list_images(dir) {
        Ok(images) => images,
        Err(e) => {
            let error = DirectoryError::Access {
                path: dir.to_path_buf(),
                detail: e.to_string(),
            };
            warn!("{}", error);
            if let Some(ref cb) = config.progress_callback {
                cb.on_directory_error(index, total_dirs, dir, &error.to_string());
            }
            return DirectoryResult {
                directory: dir.to_path_buf(),
                image_count: 0,
                status: DirectoryStatus::Failed { error },
            };
        }
    };

    let image_count = images.len();
    info!("{}: {} image(s) found", dir.display(), image_count);
    if let Some(ref cb) = config.progress_callback {
        cb.on_directory_start(index, total_dirs, dir, image_count);
    }

    if images.is_empty() {
        if let Some(ref cb) = config.progress_callback {
            cb.on_directory_empty(index, total_dirs, dir);
        }
        return DirectoryResult {
            directory: dir.to_path_buf(),
            image_count,
            status: DirectoryStatus::SkippedEmpty,
        };
    }

    let output = output_document_path(dir, root, config);
    match assemble::assemble(&images, &output, config) {
        Ok(pages) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_directory_complete(index, total_dirs, dir, &output, pages);
            }
            DirectoryResult {
                directory: dir.to_path_buf(),
                image_count,
                status: DirectoryStatus::Succeeded { output, pages },
            }
        }
        Err(error) => {
            warn!("{}", error);
            if let Some(ref cb) = config.progress_callback {
                cb.on_directory_error(index, total_dirs, dir, &error.to_string());
            }
            DirectoryResult {
                directory: dir.to_path_buf(),
                image_count,
                status: DirectoryStatus::Failed { error },
            }
        }
    }
}

/// `<output_dir>/<dir_basename>.pdf`, defaulting the output directory to
/// the input root. A root with no final component (the filesystem root)
/// falls back to the stem `"root"`.
fn output_document_path(dir: &Path, root: &Path, config: &RunConfig) -> PathBuf {
    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| root.to_path_buf());

    let mut name = dir
        .file_name()
        .unwrap_or_else(|| OsStr::new("root"))
        .to_os_string();
    name.push(".pdf");

    output_dir.join(name)
}

/// Fatal validation of the input root before any work begins.
fn validate_root(root: &Path) -> Result<(), BinderError> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(BinderError::InputNotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(BinderError::PermissionDenied {
                path: root.to_path_buf(),
            })
        }
        Err(_) => Err(BinderError::InputNotFound {
            path: root.to_path_buf(),
        }),
    }
}
