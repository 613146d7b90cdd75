//! Result types returned by a bundling run.
//!
//! A run never fails half-way: [`crate::run`] returns a [`RunOutput`] whose
//! `results` list carries one entry per candidate directory, each tagged
//! [`DirectoryStatus::Succeeded`], [`DirectoryStatus::SkippedEmpty`], or
//! [`DirectoryStatus::Failed`]. Aggregate counts live in [`RunStats`] so a
//! caller can print a one-line summary without re-walking the results.

use crate::error::DirectoryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Complete result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutput {
    /// One entry per candidate directory, in visit order.
    pub results: Vec<DirectoryResult>,
    /// Aggregate statistics for the run.
    pub stats: RunStats,
}

impl RunOutput {
    /// The first directory-level error, if any directory failed.
    pub fn first_error(&self) -> Option<&DirectoryError> {
        self.results.iter().find_map(|r| match &r.status {
            DirectoryStatus::Failed { error } => Some(error),
            _ => None,
        })
    }
}

/// Outcome for a single candidate directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectoryResult {
    /// The candidate directory that was visited.
    pub directory: PathBuf,
    /// Number of qualifying images found inside it.
    pub image_count: usize,
    /// What happened.
    pub status: DirectoryStatus,
}

/// Per-directory status: exactly one of skipped / succeeded / failed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DirectoryStatus {
    /// The directory contained no qualifying images; no document produced.
    SkippedEmpty,
    /// A document was written.
    Succeeded {
        /// Path of the written PDF.
        output: PathBuf,
        /// Page count — always equal to the directory's image count.
        pages: usize,
    },
    /// The directory's document was abandoned.
    Failed { error: DirectoryError },
}

impl fmt::Display for DirectoryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            DirectoryStatus::SkippedEmpty => {
                write!(f, "{}: no images found", self.directory.display())
            }
            DirectoryStatus::Succeeded { output, pages } => write!(
                f,
                "{}: {} page(s) → {}",
                self.directory.display(),
                pages,
                output.display()
            ),
            DirectoryStatus::Failed { error } => {
                write!(f, "{}: FAILED — {}", self.directory.display(), error)
            }
        }
    }
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Candidate directories visited (including unreadable ones).
    pub directories_visited: usize,
    /// Documents successfully written.
    pub documents_written: usize,
    /// Directories skipped because they contained no qualifying images.
    pub empty_directories: usize,
    /// Directories whose document was abandoned.
    pub failed_directories: usize,
    /// Total pages across all written documents.
    pub total_pages: usize,
    /// Wall-clock duration of the whole run in milliseconds.
    pub total_duration_ms: u64,
    /// Portion spent enumerating the tree.
    pub scan_duration_ms: u64,
    /// Portion spent decoding images and writing documents.
    pub assemble_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RunOutput {
        RunOutput {
            results: vec![
                DirectoryResult {
                    directory: PathBuf::from("/scans/A"),
                    image_count: 2,
                    status: DirectoryStatus::Succeeded {
                        output: PathBuf::from("/scans/A.pdf"),
                        pages: 2,
                    },
                },
                DirectoryResult {
                    directory: PathBuf::from("/scans/B"),
                    image_count: 0,
                    status: DirectoryStatus::SkippedEmpty,
                },
                DirectoryResult {
                    directory: PathBuf::from("/scans/C"),
                    image_count: 1,
                    status: DirectoryStatus::Failed {
                        error: DirectoryError::ImageDecode {
                            path: PathBuf::from("/scans/C/bad.png"),
                            detail: "truncated".into(),
                        },
                    },
                },
            ],
            stats: RunStats {
                directories_visited: 3,
                documents_written: 1,
                empty_directories: 1,
                failed_directories: 1,
                total_pages: 2,
                ..Default::default()
            },
        }
    }

    #[test]
    fn first_error_finds_the_failed_directory() {
        let out = sample();
        let err = out.first_error().expect("one directory failed");
        assert_eq!(err.kind(), "decode");
    }

    #[test]
    fn display_formats_each_status() {
        let out = sample();
        let lines: Vec<String> = out.results.iter().map(|r| r.to_string()).collect();
        assert!(lines[0].contains("2 page(s)"));
        assert!(lines[1].contains("no images found"));
        assert!(lines[2].contains("FAILED"));
    }

    #[test]
    fn output_serialises_to_json() {
        let out = sample();
        let json = serde_json::to_string_pretty(&out).unwrap();
        assert!(json.contains("skipped_empty"));
        assert!(json.contains("\"pages\": 2"));
        let back: RunOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.results.len(), 3);
    }
}
