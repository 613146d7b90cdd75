//! Directory enumeration: the input root and every nested subdirectory.
//!
//! ## Why collect eagerly?
//!
//! The coordinator needs the total directory count before processing begins
//! so progress can be reported as a fraction of the whole run. Trees of
//! directory *entries* are tiny compared to the image data behind them, so
//! an eager `Vec` costs nothing that matters.
//!
//! Symbolic links are not followed (walkdir's default), which also rules
//! out revisiting a directory through a link cycle. An unreadable
//! subdirectory never aborts the walk — it is returned as a
//! [`WalkFailure`] so the coordinator can report it alongside the
//! directories that did get processed.

use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A directory that could not be entered during the walk.
#[derive(Debug, Clone)]
pub struct WalkFailure {
    pub path: PathBuf,
    pub detail: String,
}

/// Enumerate `root` and every directory nested beneath it, each exactly once.
///
/// The root itself is the first entry. Directories are yielded in walkdir's
/// depth-first order; sibling order is not significant to callers.
///
/// The caller validates that `root` exists and is a directory; this function
/// does not re-check.
pub fn walk(root: &Path) -> (Vec<PathBuf>, Vec<WalkFailure>) {
    let mut dirs = Vec::new();
    let mut failures = Vec::new();

    for entry in WalkDir::new(root) {
        match entry {
            Ok(e) if e.file_type().is_dir() => {
                debug!("Found directory: {}", e.path().display());
                dirs.push(e.path().to_path_buf());
            }
            Ok(_) => {}
            Err(e) => {
                let path = e
                    .path()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| root.to_path_buf());
                let detail = e
                    .io_error()
                    .map(|io| io.to_string())
                    .unwrap_or_else(|| e.to_string());
                warn!("Skipping unreadable entry {}: {}", path.display(), detail);
                failures.push(WalkFailure { path, detail });
            }
        }
    }

    (dirs, failures)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn walk_yields_root_first() {
        let tmp = TempDir::new().unwrap();
        let (dirs, failures) = walk(tmp.path());
        assert_eq!(dirs, vec![tmp.path().to_path_buf()]);
        assert!(failures.is_empty());
    }

    #[test]
    fn walk_finds_nested_directories_exactly_once() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/deep/deeper")).unwrap();
        fs::create_dir_all(tmp.path().join("b")).unwrap();
        fs::write(tmp.path().join("a/file.png"), b"x").unwrap();

        let (dirs, failures) = walk(tmp.path());
        assert!(failures.is_empty());
        assert_eq!(dirs.len(), 5, "root + a + a/deep + a/deep/deeper + b");

        let mut sorted = dirs.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), dirs.len(), "no directory is visited twice");
        assert!(dirs.contains(&tmp.path().join("a/deep/deeper")));
    }

    #[test]
    fn walk_ignores_plain_files() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("not_a_dir.jpg"), b"x").unwrap();
        let (dirs, _) = walk(tmp.path());
        assert_eq!(dirs.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn walk_reports_unreadable_subdirectory_and_continues() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        let locked = tmp.path().join("locked");
        let open = tmp.path().join("open");
        fs::create_dir(&locked).unwrap();
        fs::create_dir(&open).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let (dirs, failures) = walk(tmp.path());

        // restore so TempDir can clean up
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // Running as root bypasses permission checks entirely; only assert
        // the failure path when the walk actually failed.
        if !failures.is_empty() {
            assert!(failures.iter().any(|f| f.path == locked));
        }
        assert!(dirs.contains(&open), "sibling directories still walked");
    }
}
