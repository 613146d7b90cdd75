//! Image filtering: list the qualifying image files inside one directory.
//!
//! The filename sort here is a correctness invariant, not cosmetics — it
//! determines final page order. Sorting compares `OsStr` file names, which
//! is a plain ordinal (byte/codepoint) comparison, independent of locale
//! and of whatever order the filesystem happens to return entries in.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions recognised as images, matched case-insensitively.
///
/// This set is a fixed contract of the tool, not configuration.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

/// True if the path carries a supported image extension.
pub fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// List the image files directly inside `dir`, sorted by file name.
///
/// Non-recursive. Subdirectories, symlinks, and files with non-matching
/// extensions are excluded. Returns `Err` only when the directory itself
/// cannot be listed (permission denied, removed mid-walk).
pub fn list_images(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut images = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        // file_type() does not follow symlinks, so a symlink to an image
        // (or to a directory) is excluded here.
        let file_type = entry.file_type()?;
        if file_type.is_file() && is_image(&entry.path()) {
            images.push(entry.path());
        }
    }

    images.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!("{}: {} image(s) found", dir.display(), images.len());

    Ok(images)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::write(dir.join(name), b"stub").unwrap();
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert!(is_image(Path::new("a.png")));
        assert!(is_image(Path::new("a.PNG")));
        assert!(is_image(Path::new("a.Jpg")));
        assert!(is_image(Path::new("a.JPEG")));
        assert!(is_image(Path::new("a.bmp")));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        assert!(!is_image(Path::new("a.gif")));
        assert!(!is_image(Path::new("a.tiff")));
        assert!(!is_image(Path::new("a.webp")));
        assert!(!is_image(Path::new("a.pdf")));
        assert!(!is_image(Path::new("png"))); // no extension at all
        assert!(!is_image(Path::new("archive.png.zip")));
    }

    #[test]
    fn list_is_sorted_by_filename_not_listing_order() {
        let tmp = TempDir::new().unwrap();
        // created deliberately out of order
        touch(tmp.path(), "c.bmp");
        touch(tmp.path(), "a.png");
        touch(tmp.path(), "B.jpg");

        let names: Vec<String> = list_images(tmp.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        // ordinal order: uppercase sorts before lowercase
        assert_eq!(names, vec!["B.jpg", "a.png", "c.bmp"]);
    }

    #[test]
    fn subdirectories_and_other_files_are_excluded() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "keep.jpeg");
        touch(tmp.path(), "skip.gif");
        touch(tmp.path(), "notes.txt");
        fs::create_dir(tmp.path().join("nested.png")).unwrap(); // a directory, despite the name

        let images = list_images(tmp.path()).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].ends_with("keep.jpeg"));
    }

    #[test]
    fn empty_directory_lists_nothing() {
        let tmp = TempDir::new().unwrap();
        assert!(list_images(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let gone = tmp.path().join("vanished");
        assert!(list_images(&gone).is_err());
    }
}
