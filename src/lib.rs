//! # pdfbinder
//!
//! Bundle directories of images into multi-page PDF documents.
//!
//! ## Why this crate?
//!
//! Scanned books, comics, and photo shoots usually arrive as folders full of
//! numbered image files. Sharing or archiving them page-by-page is painful;
//! what you want is one PDF per folder with the pages in the right order.
//! This crate walks a directory tree and, for every directory that contains
//! images, produces exactly one PDF named after that directory — pages in
//! filename order, each page sized to its source image.
//!
//! ## Pipeline Overview
//!
//! ```text
//! input root
//!  │
//!  ├─ 1. Walk      enumerate root + every nested directory (walkdir)
//!  ├─ 2. Filter    regular files with a supported extension, sorted
//!  ├─ 3. Assemble  decode → RGB → one PDF page per image (printpdf)
//!  └─ 4. Report    per-directory status + run statistics
//! ```
//!
//! A directory with no images is skipped (reported, not an error). A failure
//! inside one directory — a corrupt image, an unwritable output path — never
//! aborts the run; it is recorded in that directory's
//! [`DirectoryStatus::Failed`] entry and the run continues.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfbinder::{run, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::default();
//!     let output = run("/scans/library", &config).await?;
//!     for result in &output.results {
//!         println!("{}", result);
//!     }
//!     eprintln!("{} documents written, {} directories failed",
//!         output.stats.documents_written,
//!         output.stats.failed_directories);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfbinder` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfbinder = { version = "0.3", default-features = false }
//! ```
//!
//! ## Supported input formats
//!
//! `.png`, `.jpg`, `.jpeg`, `.bmp` — matched case-insensitively on the file
//! extension. This set is a fixed contract; files with any other extension
//! are silently ignored.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{RunConfig, RunConfigBuilder};
pub use error::{BinderError, DirectoryError};
pub use output::{DirectoryResult, DirectoryStatus, RunOutput, RunStats};
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::{run, run_sync};
