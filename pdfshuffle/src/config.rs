//! Configuration module for pdfshuffle.
//!
//! This module holds the validated settings that drive a run: which files to
//! ingest, how to arrange them, and where the export lands. It handles:
//! - Validation of argument combinations
//! - Defaults for thumbnail scale and compression
//! - Derivation of the per-stage [`IngestOptions`] and [`ExportOptions`]

use anyhow::{Result, bail};

use crate::PdfShuffleError;
use crate::arrange::Edit;
use std::{fmt, path::PathBuf, str::FromStr};

/// File name prefix of exported documents.
pub const DEFAULT_FILE_PREFIX: &str = "merged_pdf";

/// Sources decoded at once during export unless configured otherwise.
pub const DEFAULT_LOAD_WORKERS: usize = 1;

/// Compression level for the output PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompressionLevel {
    /// No compression - streams are written as copied.
    None,
    /// Compress streams.
    #[default]
    Standard,
    /// Compress streams and drop unreferenced objects.
    Maximum,
}

impl FromStr for CompressionLevel {
    type Err = crate::PdfShuffleError;
    /// Parse compression level from string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not `none`, `standard` or `maximum`.
    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "standard" => Ok(Self::Standard),
            "maximum" => Ok(Self::Maximum),
            _ => Err(PdfShuffleError::InvalidConfig {
                message: format!(
                    "Invalid compression level: {s}. Must be one of: none, standard, maximum"
                ),
            }),
        }
    }
}

impl fmt::Display for CompressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Standard => "standard",
            Self::Maximum => "maximum",
        })
    }
}

/// Settings for ingestion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestOptions {
    /// Raster scale of thumbnails. Page dimensions are always reported at 1.0.
    pub thumbnail_scale: f32,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            thumbnail_scale: 1.0,
        }
    }
}

impl IngestOptions {
    /// Check that the thumbnail scale is finite and positive.
    pub fn validate(&self) -> Result<()> {
        if !self.thumbnail_scale.is_finite() || self.thumbnail_scale <= 0.0 {
            bail!(PdfShuffleError::invalid_config(format!(
                "Thumbnail scale must be a positive number, got {}",
                self.thumbnail_scale
            )));
        }
        Ok(())
    }
}

/// Settings for export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Compression applied to the merged document.
    pub compression: CompressionLevel,
    /// Prefix of the download file name, before the timestamp.
    pub file_prefix: String,
    /// How many source files are decoded concurrently.
    pub load_workers: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            compression: CompressionLevel::default(),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            load_workers: DEFAULT_LOAD_WORKERS,
        }
    }
}

/// Complete configuration for a command-line run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Input PDF file paths, in ingestion order.
    pub inputs: Vec<PathBuf>,

    /// Directory the exported document is written to.
    pub output_dir: PathBuf,

    /// Arrangement edits, applied in order after ingestion.
    pub edits: Vec<Edit>,

    /// Print the arranged collection.
    pub list: bool,

    /// Print the collection as JSON instead of text.
    pub json: bool,

    /// Directory to write page previews to.
    pub thumbnails_dir: Option<PathBuf>,

    /// Raster scale of thumbnails.
    pub thumbnail_scale: f32,

    /// Compression level for output.
    pub compression: CompressionLevel,

    /// Number of sources decoded concurrently during export (None = one at a time).
    pub jobs: Option<usize>,

    /// Dry run mode - arrange without writing the export.
    pub dry_run: bool,

    /// Verbose output mode.
    pub verbose: bool,

    /// Quiet mode - suppress non-error output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            output_dir: PathBuf::from("."),
            edits: Vec::new(),
            list: false,
            json: false,
            thumbnails_dir: None,
            thumbnail_scale: IngestOptions::default().thumbnail_scale,
            compression: CompressionLevel::default(),
            jobs: None,
            dry_run: false,
            verbose: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No input files are specified
    /// - Verbose and quiet modes are both enabled
    /// - The job count is zero
    /// - The thumbnail scale is not a positive number
    /// - The thumbnails directory is the download directory
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() {
            bail!(PdfShuffleError::invalid_config("No input files specified"));
        }

        if self.verbose && self.quiet {
            bail!(PdfShuffleError::invalid_config(
                "Cannot use both --verbose and --quiet"
            ));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            bail!(PdfShuffleError::invalid_config(
                "Number of jobs must be at least 1"
            ));
        }

        self.ingest_options().validate()?;

        if let Some(dir) = &self.thumbnails_dir
            && dir == &self.output_dir
        {
            bail!(PdfShuffleError::invalid_config(format!(
                "Thumbnails directory cannot be the download directory: {}",
                dir.display()
            )));
        }

        Ok(())
    }

    /// Options for the ingestion stage.
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            thumbnail_scale: self.thumbnail_scale,
        }
    }

    /// Options for the export stage.
    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            compression: self.compression,
            load_workers: self.effective_jobs(),
            ..ExportOptions::default()
        }
    }

    /// Get the effective number of parallel jobs.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or(DEFAULT_LOAD_WORKERS)
    }
}
