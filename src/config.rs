//! Configuration types for a bundling run.
//!
//! All run behaviour is controlled through [`RunConfig`], built via its
//! [`RunConfigBuilder`]. Keeping every knob in one struct makes it trivial to
//! share a config across threads, log it, and diff two runs to understand why
//! their outputs differ.

use crate::error::BinderError;
use crate::progress::ProgressCallback;
use std::fmt;
use std::path::PathBuf;

/// Configuration for one bundling run.
///
/// Built via [`RunConfig::builder()`] or using [`RunConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfbinder::RunConfig;
///
/// let config = RunConfig::builder()
///     .output_dir("/tmp/pdfs")
///     .dpi(96.0)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct RunConfig {
    /// Where output documents are written. `None` means: write each PDF into
    /// the input root itself, mirroring the "output defaults to input"
    /// behaviour users expect from folder-level converters.
    pub output_dir: Option<PathBuf>,

    /// Pixel density used to map image pixels to physical page size.
    /// Range: 36.0–600.0. Default: 72.0.
    ///
    /// At 72 DPI one pixel maps to one PDF point, so a 1200×1600 px scan
    /// becomes a 1200×1600 pt page. Raise this to shrink the physical page
    /// without touching the pixel data (300 gives print-sized pages from
    /// typical scans).
    pub dpi: f32,

    /// JPEG quality (1–100) used when re-encoding decoded bitmaps into the
    /// document. Default: 92.
    ///
    /// JPEG files that are already 8-bit RGB are embedded verbatim and never
    /// pay this cost; the setting only applies to PNG/BMP sources and to
    /// JPEGs that decode to another colour model (grayscale, CMYK).
    pub jpeg_quality: u8,

    /// Progress callback fired per directory. `None` disables reporting.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            dpi: 72.0,
            jpeg_quality: 92,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("jpeg_quality", &self.jpeg_quality)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn RunProgressCallback>"),
            )
            .finish()
    }
}

impl RunConfig {
    /// Create a new builder for `RunConfig`.
    pub fn builder() -> RunConfigBuilder {
        RunConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RunConfig`].
#[derive(Debug)]
pub struct RunConfigBuilder {
    config: RunConfig,
}

impl RunConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn dpi(mut self, dpi: f32) -> Self {
        self.config.dpi = dpi.clamp(36.0, 600.0);
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q.clamp(1, 100);
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RunConfig, BinderError> {
        let c = &self.config;
        if !(36.0..=600.0).contains(&c.dpi) || !c.dpi.is_finite() {
            return Err(BinderError::InvalidConfig(format!(
                "DPI must be 36–600, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(BinderError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}
