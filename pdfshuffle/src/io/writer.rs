//! Serializing the merged document and writing download artifacts.
//!
//! This module provides:
//! - Serialization of a `lopdf` document to bytes, with compression
//! - Atomic writes (write to temp file, then rename)
//! - Collision-free naming inside the download directory
//! - Write statistics
//!
//! # Examples
//!
//! ```no_run
//! use pdfshuffle::io::PdfWriter;
//! use std::path::Path;
//!
//! # async fn example(bytes: Vec<u8>) -> Result<(), Box<dyn std::error::Error>> {
//! let writer = PdfWriter::new();
//! let stats = writer
//!     .save_download(Path::new("downloads"), "merged_pdf_20250101120000.pdf", &bytes)
//!     .await?;
//! println!("Wrote {}", stats.output_path.display());
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::config::CompressionLevel;
use crate::error::{PdfShuffleError, Result};
use crate::utils::format_file_size;

const WRITE_BUFFER_SIZE: usize = 8192;

/// Statistics about a write operation.
#[derive(Debug, Clone)]
pub struct WriteStatistics {
    /// Time taken to write the file.
    pub write_time: Duration,

    /// Size of the written file in bytes.
    pub file_size: u64,

    /// Path where the file was written.
    pub output_path: PathBuf,
}

impl WriteStatistics {
    /// Format file size as human-readable string.
    pub fn format_file_size(&self) -> String {
        format_file_size(self.file_size)
    }
}

/// Writer for export artifacts.
///
/// Downloads are written atomically and never replace an existing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfWriter;

impl PdfWriter {
    /// Create a new writer.
    pub fn new() -> Self {
        Self
    }

    /// Compress and serialize a document on a blocking worker.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::SerializationFailure`] if `lopdf` cannot
    /// write the document.
    pub async fn serialize(
        &self,
        document: Document,
        compression: CompressionLevel,
    ) -> Result<Vec<u8>> {
        task::spawn_blocking(move || serialize_document(document, compression))
            .await
            .map_err(|e| {
                PdfShuffleError::serialization_failure(format!("Serialize task failed: {e}"))
            })?
    }

    /// Write `bytes` as `file_name` inside `dir`.
    ///
    /// An existing file is never replaced; a numeric suffix is added to the
    /// stem instead.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::FailedToWrite`] if the directory does not
    /// exist or the file cannot be written.
    pub async fn save_download(
        &self,
        dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<WriteStatistics> {
        let dir = dir.to_path_buf();
        let file_name = file_name.to_string();
        let bytes = bytes.to_vec();

        task::spawn_blocking(move || {
            let start = Instant::now();

            if !dir.is_dir() {
                return Err(PdfShuffleError::FailedToWrite {
                    path: dir.clone(),
                    source: std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "download directory does not exist",
                    ),
                });
            }

            let path_buf = unique_path(&dir, &file_name);
            write_atomic(&path_buf, &bytes)?;

            let file_size = std::fs::metadata(&path_buf).map(|m| m.len()).unwrap_or(0);
            debug!(path = %path_buf.display(), size = file_size, "wrote download");

            Ok::<_, PdfShuffleError>(WriteStatistics {
                write_time: start.elapsed(),
                file_size,
                output_path: path_buf,
            })
        })
        .await
        .map_err(|e| PdfShuffleError::other(format!("Write task failed: {e}")))?
    }

    /// Write one PNG per page into `dir`, creating it if needed.
    ///
    /// `previews` yields `(file_name, png_bytes)` pairs. Existing files with
    /// the same name are replaced.
    pub async fn save_thumbnails<I>(&self, dir: &Path, previews: I) -> Result<Vec<PathBuf>>
    where
        I: IntoIterator<Item = (String, Vec<u8>)>,
    {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| PdfShuffleError::FailedToWrite {
                path: dir.to_path_buf(),
                source: e,
            })?;

        let mut written = Vec::new();
        for (file_name, png) in previews {
            let path = dir.join(file_name);
            tokio::fs::write(&path, png)
                .await
                .map_err(|e| PdfShuffleError::FailedToWrite {
                    path: path.clone(),
                    source: e,
                })?;
            written.push(path);
        }

        Ok(written)
    }
}

fn serialize_document(mut document: Document, compression: CompressionLevel) -> Result<Vec<u8>> {
    match compression {
        CompressionLevel::None => {}
        CompressionLevel::Standard => document.compress(),
        CompressionLevel::Maximum => {
            document.prune_objects();
            document.compress();
        }
    }
    document.renumber_objects();

    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| PdfShuffleError::serialization_failure(e.to_string()))?;
    Ok(bytes)
}

/// First free path for `file_name` in `dir`: the name itself, then
/// `stem_1.ext`, `stem_2.ext`, ...
pub fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_name.to_string());
    let extension = name.extension().map(|e| e.to_string_lossy().into_owned());

    (1u32..)
        .map(|n| match &extension {
            Some(ext) => dir.join(format!("{stem}_{n}.{ext}")),
            None => dir.join(format!("{stem}_{n}")),
        })
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn write_atomic(path_buf: &Path, bytes: &[u8]) -> Result<()> {
    let name = path_buf
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp_path = path_buf.with_file_name(format!(".{name}.tmp"));

    let file = std::fs::File::create(&temp_path).map_err(|e| PdfShuffleError::FailedToWrite {
        path: temp_path.clone(),
        source: e,
    })?;

    let mut writer = std::io::BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
    writer
        .write_all(bytes)
        .and_then(|_| writer.flush())
        .map_err(|e| PdfShuffleError::FailedToWrite {
            path: temp_path.clone(),
            source: e,
        })?;
    drop(writer);

    std::fs::rename(&temp_path, path_buf).map_err(|e| {
        let _ = std::fs::remove_file(&temp_path);
        PdfShuffleError::FailedToWrite {
            path: path_buf.to_path_buf(),
            source: e,
        }
    })
}
