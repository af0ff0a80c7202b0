//! CLI argument parsing for pdfshuffle.
//!
//! This module defines the command-line interface structure using `clap`.
//! It handles argument parsing, input expansion, and conversion into a
//! validated [`Config`].

use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;

use pdfshuffle::arrange::Edit;
use pdfshuffle::config::{CompressionLevel, Config};
use pdfshuffle::error::{PdfShuffleError, Result};

/// Reorder, merge and delete pages across PDF files.
///
/// pdfshuffle loads every page of the given PDFs into one ordered list,
/// applies the requested moves and deletions, and writes the result as a
/// single new PDF named merged_pdf_<timestamp>.pdf.
#[derive(Parser, Debug)]
#[command(name = "pdfshuffle")]
#[command(version)]
#[command(about = "Reorder, merge and delete pages across PDF files", long_about = None)]
#[command(author)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Input PDF files or glob patterns (in order)
    ///
    /// Pages are added file by file, in the order given.
    ///
    /// Examples:
    ///   pdfshuffle a.pdf b.pdf
    ///   pdfshuffle 'scans/*.pdf' cover.pdf
    #[arg(value_name = "FILE", required_unless_present = "input_list")]
    pub inputs: Vec<String>,

    /// Read input file list from a file (one path per line)
    ///
    /// Lines starting with '#' and blank lines are ignored. Paths from the
    /// list are added after the direct inputs.
    #[arg(long, value_name = "FILE")]
    pub input_list: Option<PathBuf>,

    /// Number of parallel jobs for loading PDFs during export
    ///
    /// Controls how many source files are decoded concurrently. Default is 1,
    /// which keeps a single decoded source in memory at a time.
    #[arg(short, long, value_name = "N")]
    pub jobs: Option<usize>,

    /// Arrangement edit, applied in order (repeatable)
    ///
    /// Indices are 0-based positions in the current arrangement.
    /// - move:FROM:TO  take the page at FROM out and reinsert it at TO
    /// - delete:INDEX  remove the page at INDEX
    ///
    /// Example:
    ///   pdfshuffle a.pdf b.pdf -e move:4:0 -e delete:2
    #[arg(short, long = "edit", value_name = "EDIT")]
    pub edits: Vec<Edit>,

    /// Directory the merged PDF is written to
    ///
    /// An existing file is never replaced; a numeric suffix is added instead.
    #[arg(
        short,
        long,
        value_name = "DIR",
        env = "PDFSHUFFLE_OUTPUT_DIR",
        default_value = "."
    )]
    pub output_dir: PathBuf,

    /// Print the arranged pages
    #[arg(short, long)]
    pub list: bool,

    /// Print the listing as JSON (with --list)
    #[arg(long, requires = "list")]
    pub json: bool,

    /// Write a PNG preview of every arranged page into DIR
    #[arg(long, value_name = "DIR")]
    pub thumbnails: Option<PathBuf>,

    /// Raster scale of page previews
    #[arg(long, value_name = "SCALE", default_value_t = 1.0)]
    pub thumbnail_scale: f32,

    /// Compression level for output PDF
    ///
    /// - none: streams are written as copied
    /// - standard: compress streams (default)
    /// - maximum: compress streams and drop unreferenced objects
    #[arg(short, long, value_name = "LEVEL", default_value = "standard")]
    #[arg(value_parser = ["none", "standard", "maximum"])]
    pub compression: String,

    /// Dry run - load and arrange pages without writing the merged PDF
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Verbose output - show details and debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Convert CLI arguments into a validated Config.
    ///
    /// `inputs` are the expanded input paths, see
    /// [`get_all_inputs`](Self::get_all_inputs).
    pub fn to_config(&self, inputs: Vec<PathBuf>) -> Result<Config> {
        let compression = CompressionLevel::from_str(&self.compression)
            .map_err(|e| PdfShuffleError::invalid_config(e.to_string()))?;

        let config = Config {
            inputs,
            output_dir: self.output_dir.clone(),
            edits: self.edits.clone(),
            list: self.list,
            json: self.json,
            thumbnails_dir: self.thumbnails.clone(),
            thumbnail_scale: self.thumbnail_scale,
            compression,
            jobs: self.jobs,
            dry_run: self.dry_run,
            verbose: self.verbose,
            quiet: self.quiet,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate CLI arguments before processing.
    ///
    /// Checks that need no file I/O.
    pub fn validate(&self) -> Result<()> {
        if self.inputs.is_empty() && self.input_list.is_none() {
            return Err(PdfShuffleError::invalid_config("No input files specified"));
        }

        if let Some(jobs) = self.jobs
            && jobs == 0
        {
            return Err(PdfShuffleError::invalid_config(
                "Number of jobs must be at least 1",
            ));
        }

        if !["none", "standard", "maximum"].contains(&self.compression.as_str()) {
            return Err(PdfShuffleError::invalid_config(format!(
                "Invalid compression level: {}",
                self.compression
            )));
        }

        if !self.thumbnail_scale.is_finite() || self.thumbnail_scale <= 0.0 {
            return Err(PdfShuffleError::invalid_config(
                "Thumbnail scale must be a positive number",
            ));
        }

        Ok(())
    }

    /// Get all input paths: expanded patterns first, then the input list.
    ///
    /// A pattern that matches nothing is kept as a literal path so that it
    /// is reported as missing.
    pub async fn get_all_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut all_inputs = pdfshuffle::utils::collect_paths_for_patterns(&self.inputs)?;

        if let Some(ref input_list_path) = self.input_list {
            let additional_inputs = read_input_list(input_list_path).await?;
            all_inputs.extend(additional_inputs);
        }

        if all_inputs.is_empty() {
            return Err(PdfShuffleError::invalid_config("No input files specified"));
        }

        Ok(all_inputs)
    }
}

/// Read input paths from a file, one per line.
///
/// Lines starting with '#' are treated as comments. Empty lines are skipped.
async fn read_input_list(path: &PathBuf) -> Result<Vec<PathBuf>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PdfShuffleError::FailedToReadInputList {
            path: path.clone(),
            source: e,
        })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PathBuf::from)
        .collect())
}
