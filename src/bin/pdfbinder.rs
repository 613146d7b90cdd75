//! CLI binary for pdfbinder.
//!
//! A thin shim over the library crate that maps CLI flags to `RunConfig`
//! and prints per-directory results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdfbinder::{
    run, DirectoryStatus, ProgressCallback, RunConfig, RunProgressCallback,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-directory
/// log lines using [indicatif]. The bar length is set dynamically once the
/// walk has counted the candidate directories.
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Count of directories that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_run_start` (called before any directory is processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_run_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Scanning");
        bar.set_message("Walking directory tree…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} dirs  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Bundling");
        self.bar.reset_eta();
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_dirs: usize) {
        self.activate_bar(total_dirs);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Scanning {total_dirs} directories…"))
        ));
    }

    fn on_directory_start(&self, _index: usize, _total: usize, dir: &Path, image_count: usize) {
        self.bar.set_message(format!(
            "{} ({} images)",
            dir.display(),
            image_count
        ));
    }

    fn on_directory_complete(
        &self,
        index: usize,
        total: usize,
        _dir: &Path,
        output: &Path,
        pages: usize,
    ) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            green("✓"),
            index,
            total,
            output.display(),
            dim(&format!("{pages} page(s)")),
        ));
        self.bar.inc(1);
    }

    fn on_directory_empty(&self, index: usize, total: usize, dir: &Path) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            dim("○"),
            index,
            total,
            dir.display(),
            dim("no images found"),
        ));
        self.bar.inc(1);
    }

    fn on_directory_error(&self, index: usize, total: usize, dir: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}  {}",
            red("✗"),
            index,
            total,
            dir.display(),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_dirs: usize, written_count: usize) {
        let failed = self.errors.load(Ordering::SeqCst);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} document(s) written from {} directories",
                green("✔"),
                bold(&written_count.to_string()),
                total_dirs,
            );
        } else {
            eprintln!(
                "{} {} document(s) written, {} directories failed",
                if written_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&written_count.to_string()),
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # One PDF per image-bearing folder, written next to the folders
  pdfbinder ~/scans/library

  # Collect all PDFs into a separate output directory
  pdfbinder ~/scans/library -o ~/pdfs

  # Print-sized pages from 300 DPI scans
  pdfbinder --dpi 300 ~/scans/library

  # Machine-readable run summary
  pdfbinder --json ~/scans/library > summary.json

BEHAVIOUR:
  Every directory below the input root (the root included) is visited once.
  A directory containing at least one .png/.jpg/.jpeg/.bmp file produces
  <output>/<directory-name>.pdf with one page per image, pages in filename
  order. Existing PDFs at the target path are overwritten. Directories with
  no images are reported and skipped. A corrupt image or unwritable output
  abandons that one directory's PDF; the run always continues.

ENVIRONMENT VARIABLES:
  PDFBINDER_OUTPUT_DIR    Default for --output-dir
  PDFBINDER_DPI           Default for --dpi
  PDFBINDER_JPEG_QUALITY  Default for --jpeg-quality
"#;

/// Bundle directories of images into multi-page PDF documents.
#[derive(Parser, Debug)]
#[command(
    name = "pdfbinder",
    version,
    about = "Bundle directories of images into multi-page PDF documents",
    long_about = "Recursively scan a directory tree and generate one multi-page PDF per \
directory that contains image files (.png, .jpg, .jpeg, .bmp). Pages follow filename \
order; each page is sized to its source image.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input directory to scan (must exist).
    input: PathBuf,

    /// Write PDFs into this directory instead of the input root.
    #[arg(short, long, env = "PDFBINDER_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Pixel density mapping image pixels to page size (36–600).
    #[arg(long, env = "PDFBINDER_DPI", default_value_t = 72.0,
          long_help = "Pixel density used to size pages. 72 means one pixel per PDF point \
(large pages, exact pixel mapping); 300 gives print-sized pages from typical scans.")]
    dpi: f32,

    /// JPEG quality (1–100) for re-encoded bitmaps.
    #[arg(long, env = "PDFBINDER_JPEG_QUALITY", default_value_t = 92,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    jpeg_quality: u8,

    /// Output a structured JSON run summary instead of log lines.
    #[arg(long, env = "PDFBINDER_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDFBINDER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDFBINDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDFBINDER_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn RunProgressCallback>)
    } else {
        None
    };

    let mut builder = RunConfig::builder()
        .dpi(cli.dpi)
        .jpeg_quality(cli.jpeg_quality);

    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir);
    }
    if let Some(cb) = progress_cb {
        builder = builder.progress_callback(cb);
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = run(&cli.input, &config)
        .await
        .with_context(|| format!("Cannot process '{}'", cli.input.display()))?;

    // ── Report ───────────────────────────────────────────────────────────
    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise summary")?;
        println!("{json}");
        return Ok(());
    }

    if !show_progress && !cli.quiet {
        // The progress callback already printed per-directory lines when the
        // bar was active; without it, print them here.
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        for result in &output.results {
            writeln!(handle, "{result}").context("Failed to write to stdout")?;
        }
        eprintln!(
            "{}/{} directories produced a document  {}ms",
            output.stats.documents_written,
            output.stats.directories_visited,
            output.stats.total_duration_ms,
        );
        if output.stats.failed_directories > 0 {
            eprintln!("  {} directories failed", output.stats.failed_directories);
        }
    } else if !cli.quiet {
        eprintln!(
            "   {} page(s) across {} document(s)  —  {}ms total",
            dim(&output.stats.total_pages.to_string()),
            dim(&output.stats.documents_written.to_string()),
            output.stats.total_duration_ms,
        );
    }

    // A run that wrote nothing and failed everywhere still exits 0: the run
    // itself completed, and per-directory failures were reported above.
    if cli.quiet {
        for result in &output.results {
            if let DirectoryStatus::Failed { error } = &result.status {
                eprintln!("{}: {}", result.directory.display(), error);
            }
        }
    }

    Ok(())
}
