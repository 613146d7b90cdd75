//! Pipeline stages for directory-to-PDF bundling.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the PDF backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! walk ──▶ filter ──▶ assemble
//! (dirs)   (images)   (one PDF per dir)
//! ```
//!
//! 1. [`walk`]     — enumerate the input root and every nested directory
//!    exactly once; unreadable subtrees are reported, not fatal
//! 2. [`filter`]   — list the qualifying image files directly inside one
//!    directory, sorted by filename (this order becomes page order)
//! 3. [`assemble`] — decode each image, normalise to RGB, and write the
//!    directory's multi-page document

pub mod assemble;
pub mod filter;
pub mod walk;
