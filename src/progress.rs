//! Progress-callback trait for per-directory run events.
//!
//! Inject an [`Arc<dyn RunProgressCallback>`] via
//! [`crate::config::RunConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline processes each directory.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a channel, a log file, a GUI widget, or a terminal
//! progress bar — without the library knowing anything about how the host
//! application communicates. The trait is `Send + Sync` so the pipeline can
//! run on a background worker while the host renders events on its own
//! thread. Progress fraction at any point is simply `index / total_dirs`.

use std::path::Path;
use std::sync::Arc;

/// Called by the run coordinator as it processes each candidate directory.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Events arrive strictly in order — the pipeline is a
/// single sequential worker — but implementations must still be
/// `Send + Sync` because the whole run executes on a background thread.
pub trait RunProgressCallback: Send + Sync {
    /// Called once before any directory is processed.
    ///
    /// # Arguments
    /// * `total_dirs` — number of candidate directories found by the walk
    fn on_run_start(&self, total_dirs: usize) {
        let _ = total_dirs;
    }

    /// Called when a directory's images have been listed, before assembly.
    ///
    /// # Arguments
    /// * `index`       — 1-indexed position in the visit order
    /// * `total_dirs`  — total candidate directories
    /// * `dir`         — the directory being processed
    /// * `image_count` — qualifying images found inside it
    fn on_directory_start(&self, index: usize, total_dirs: usize, dir: &Path, image_count: usize) {
        let _ = (index, total_dirs, dir, image_count);
    }

    /// Called when a directory's document has been written.
    ///
    /// # Arguments
    /// * `output` — path of the written PDF
    /// * `pages`  — page count of the document
    fn on_directory_complete(
        &self,
        index: usize,
        total_dirs: usize,
        dir: &Path,
        output: &Path,
        pages: usize,
    ) {
        let _ = (index, total_dirs, dir, output, pages);
    }

    /// Called when a directory contained no qualifying images.
    fn on_directory_empty(&self, index: usize, total_dirs: usize, dir: &Path) {
        let _ = (index, total_dirs, dir);
    }

    /// Called when a directory's document was abandoned.
    ///
    /// # Arguments
    /// * `error` — human-readable error description
    fn on_directory_error(&self, index: usize, total_dirs: usize, dir: &Path, error: &str) {
        let _ = (index, total_dirs, dir, error);
    }

    /// Called once after every directory has been attempted.
    ///
    /// # Arguments
    /// * `total_dirs`    — total candidate directories
    /// * `written_count` — directories that produced a document
    fn on_run_complete(&self, total_dirs: usize, written_count: usize) {
        let _ = (total_dirs, written_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl RunProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RunConfig`].
pub type ProgressCallback = Arc<dyn RunProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        empties: AtomicUsize,
        errors: AtomicUsize,
        total_seen: AtomicUsize,
        last_output: Mutex<Option<PathBuf>>,
    }

    impl RunProgressCallback for TrackingCallback {
        fn on_run_start(&self, total_dirs: usize) {
            self.total_seen.store(total_dirs, Ordering::SeqCst);
        }

        fn on_directory_start(&self, _i: usize, _n: usize, _dir: &Path, _count: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_directory_complete(
            &self,
            _i: usize,
            _n: usize,
            _dir: &Path,
            output: &Path,
            _pages: usize,
        ) {
            self.completes.fetch_add(1, Ordering::SeqCst);
            *self.last_output.lock().unwrap() = Some(output.to_path_buf());
        }

        fn on_directory_empty(&self, _i: usize, _n: usize, _dir: &Path) {
            self.empties.fetch_add(1, Ordering::SeqCst);
        }

        fn on_directory_error(&self, _i: usize, _n: usize, _dir: &Path, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(3);
        cb.on_directory_start(1, 3, Path::new("/a"), 2);
        cb.on_directory_complete(1, 3, Path::new("/a"), Path::new("/a.pdf"), 2);
        cb.on_directory_empty(2, 3, Path::new("/b"));
        cb.on_directory_error(3, 3, Path::new("/c"), "boom");
        cb.on_run_complete(3, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            empties: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            total_seen: AtomicUsize::new(0),
            last_output: Mutex::new(None),
        };

        tracker.on_run_start(3);
        assert_eq!(tracker.total_seen.load(Ordering::SeqCst), 3);

        tracker.on_directory_start(1, 3, Path::new("/scans/A"), 2);
        tracker.on_directory_complete(1, 3, Path::new("/scans/A"), Path::new("/scans/A.pdf"), 2);
        tracker.on_directory_start(2, 3, Path::new("/scans/B"), 0);
        tracker.on_directory_empty(2, 3, Path::new("/scans/B"));
        tracker.on_directory_start(3, 3, Path::new("/scans/C"), 1);
        tracker.on_directory_error(3, 3, Path::new("/scans/C"), "decode failure");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.empties.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(
            tracker.last_output.lock().unwrap().as_deref(),
            Some(Path::new("/scans/A.pdf"))
        );
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn RunProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_directory_start(1, 10, Path::new("/x"), 4);
        cb.on_run_complete(10, 9);
    }
}
