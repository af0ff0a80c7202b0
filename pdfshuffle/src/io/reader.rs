//! Loading source documents for export.
//!
//! Each source is read once and decoded with `lopdf` on a blocking worker.
//! Decoding distinguishes encrypted documents from otherwise broken ones so
//! callers can report them differently.
//!
//! # Examples
//!
//! ```no_run
//! use pdfshuffle::io::PdfReader;
//! use pdfshuffle::collection::InputFile;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let reader = PdfReader::new();
//! let input = InputFile::from_path("a.pdf")?;
//! let loaded = reader.load_input(&input).await?;
//! println!("{} has {} pages", loaded.file_name, loaded.page_count);
//! # Ok(())
//! # }
//! ```

use lopdf::Document;
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::debug;

use crate::collection::{InputFile, SourceContent, SourceFile};
use crate::error::{PdfShuffleError, Result};
use crate::utils::{has_encrypt_entry, mentions_encryption};

/// A decoded PDF document with load metadata.
#[derive(Debug)]
pub struct LoadedPdf {
    /// The PDF document.
    pub document: Document,

    /// Display name of the source file.
    pub file_name: String,

    /// Number of pages in the document.
    pub page_count: usize,

    /// Time taken to read and decode the document.
    pub load_time: Duration,

    /// Size of the source in bytes.
    pub file_size: u64,
}

/// PDF reader for export sources. Documents without pages are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfReader;

impl PdfReader {
    /// Create a new PDF reader.
    pub fn new() -> Self {
        Self
    }

    /// Load the document behind an ingested source.
    pub async fn load(&self, source: &SourceFile) -> Result<LoadedPdf> {
        self.load_content(source.name(), source.content()).await
    }

    /// Load the document behind an input file.
    pub async fn load_input(&self, input: &InputFile) -> Result<LoadedPdf> {
        self.load_content(&input.name, &input.content).await
    }

    /// Read `content` and decode it.
    ///
    /// # Errors
    ///
    /// - [`PdfShuffleError::FileNotFound`] if a path source has disappeared
    /// - [`PdfShuffleError::PasswordProtected`] for encrypted documents
    /// - [`PdfShuffleError::DecodeFailure`] for anything else that does not
    ///   decode, including a document with no pages
    pub async fn load_content(
        &self,
        file_name: &str,
        content: &SourceContent,
    ) -> Result<LoadedPdf> {
        let start = Instant::now();

        let bytes = content.read().await.map_err(|err| match (err.kind(), content) {
            (ErrorKind::NotFound, SourceContent::Path(path)) => {
                PdfShuffleError::file_not_found(path.clone())
            }
            _ => PdfShuffleError::decode_failure(file_name, err.to_string()),
        })?;

        let mut loaded = self.load_bytes(file_name, bytes).await?;
        loaded.load_time = start.elapsed();
        Ok(loaded)
    }

    /// Decode bytes already in memory.
    pub async fn load_bytes(&self, file_name: &str, bytes: Arc<Vec<u8>>) -> Result<LoadedPdf> {
        let start = Instant::now();
        let file_size = bytes.len() as u64;
        let name = file_name.to_string();

        let document = task::spawn_blocking(move || decode_document(&name, &bytes, true))
            .await
            .map_err(|e| PdfShuffleError::other(format!("Decode task failed: {e}")))??;

        let page_count = document.get_pages().len();
        debug!(file = file_name, pages = page_count, "decoded source document");

        Ok(LoadedPdf {
            document,
            file_name: file_name.to_string(),
            page_count,
            load_time: start.elapsed(),
            file_size,
        })
    }
}

/// Decode PDF bytes, classifying encryption separately from corruption.
pub fn decode_document(file_name: &str, bytes: &[u8], verify: bool) -> Result<Document> {
    let document = Document::load_mem(bytes).map_err(|e| {
        let err_msg = e.to_string();
        if mentions_encryption(&err_msg) || has_encrypt_entry(bytes) {
            PdfShuffleError::password_protected(file_name)
        } else {
            PdfShuffleError::decode_failure(file_name, err_msg)
        }
    })?;

    // Raw bytes only matter when parsing failed; page content may mention /Encrypt
    if document.trailer.get(b"Encrypt").is_ok() || document.encryption_state.is_some() {
        return Err(PdfShuffleError::password_protected(file_name));
    }

    if verify && document.get_pages().is_empty() {
        return Err(PdfShuffleError::decode_failure(file_name, "PDF has no pages"));
    }

    Ok(document)
}
