//! Assembling the arranged collection into one PDF.
//!
//! Export works on a snapshot of the session's collection:
//!
//! 1. Descriptors are grouped by source file, in order of first appearance.
//! 2. Each source is read and decoded once, one at a time unless
//!    [`ExportOptions::load_workers`] allows more. A source that cannot be decoded
//!    (corrupt or password protected) is recorded as a [`FileFailure`] and
//!    its pages are left out; the rest of the export continues.
//! 3. The requested pages are copied into a new document and arranged in
//!    collection order.
//! 4. The document is serialized; a serialization failure aborts the export.
//!
//! # Examples
//!
//! ```no_run
//! use pdfshuffle::{Exporter, Session};
//! use std::path::Path;
//!
//! # async fn example(session: Session) -> pdfshuffle::Result<()> {
//! let exporter = Exporter::new();
//! let saved = exporter.export_to(&session, Path::new(".")).await?;
//! println!(
//!     "Wrote {} pages to {}",
//!     saved.outcome.page_count,
//!     saved.write.output_path.display()
//! );
//! # Ok(())
//! # }
//! ```

pub mod pages;

pub use pages::DocumentAssembler;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::collection::{PageCollection, PageId, Session, SourceFile, SourceId};
use crate::config::ExportOptions;
use crate::error::{FileFailure, PdfShuffleError, Result};
use crate::io::{PdfReader, PdfWriter, WriteStatistics};

/// Result of a successful export.
#[derive(Debug)]
pub struct ExportOutcome {
    /// Suggested download file name.
    pub file_name: String,
    /// The serialized PDF.
    pub bytes: Vec<u8>,
    /// Pages in the exported document.
    pub page_count: usize,
    /// Pages in the snapshot that was exported.
    pub requested_pages: usize,
    /// Source files that contributed pages.
    pub files_used: usize,
    /// Source files that could not be decoded.
    pub failures: Vec<FileFailure>,
    /// Time taken by the whole export.
    pub elapsed: Duration,
}

impl ExportOutcome {
    /// Requested pages that did not make it into the document.
    pub fn skipped_pages(&self) -> usize {
        self.requested_pages.saturating_sub(self.page_count)
    }

    /// Whether every requested page was exported.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.skipped_pages() == 0
    }
}

/// An export written to the download directory.
#[derive(Debug)]
pub struct SavedExport {
    /// The export itself.
    pub outcome: ExportOutcome,
    /// Where and how the file was written.
    pub write: WriteStatistics,
}

/// Turns a session's collection into a merged PDF.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    options: ExportOptions,
    reader: PdfReader,
    writer: PdfWriter,
}

impl Exporter {
    /// Create an exporter with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an exporter with custom options.
    pub fn with_options(options: ExportOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Export options in use.
    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// Build the merged document for the current arrangement.
    ///
    /// The session's export flag is raised for the duration and always
    /// cleared before returning.
    ///
    /// # Errors
    ///
    /// - [`PdfShuffleError::EmptyCollectionExport`] if there are no pages
    /// - [`PdfShuffleError::ExportInProgress`] if another export is running
    /// - [`PdfShuffleError::NothingToExport`] if no page could be copied
    /// - [`PdfShuffleError::SerializationFailure`] if writing the PDF fails
    pub async fn export(&self, session: &Session) -> Result<ExportOutcome> {
        let snapshot = session.snapshot();
        if snapshot.is_empty() {
            return Err(PdfShuffleError::EmptyCollectionExport);
        }

        let _guard = session.begin_export()?;
        self.assemble(&snapshot).await
    }

    /// Export and write the result into `dir` as a download.
    ///
    /// The export flag stays raised until the file is written.
    pub async fn export_to(&self, session: &Session, dir: &Path) -> Result<SavedExport> {
        let snapshot = session.snapshot();
        if snapshot.is_empty() {
            return Err(PdfShuffleError::EmptyCollectionExport);
        }

        let _guard = session.begin_export()?;
        let outcome = self.assemble(&snapshot).await?;
        let write = self
            .writer
            .save_download(dir, &outcome.file_name, &outcome.bytes)
            .await?;

        info!(
            path = %write.output_path.display(),
            size = write.file_size,
            "download written"
        );

        Ok(SavedExport { outcome, write })
    }

    async fn assemble(&self, snapshot: &PageCollection) -> Result<ExportOutcome> {
        let start = Instant::now();
        let mut assembler = DocumentAssembler::new();
        let mut imported: HashMap<PageId, lopdf::ObjectId> = HashMap::new();
        let mut failures = Vec::new();
        let mut files_used = 0;

        // Buffered keeps first-appearance order; at most `load_workers`
        // decoded sources are held at once.
        let mut loads = stream::iter(group_by_source(snapshot).into_iter().map(
            |(source, page_numbers)| {
                let reader = self.reader.clone();
                async move {
                    let loaded = reader.load(&source).await;
                    (source, page_numbers, loaded)
                }
            },
        ))
        .buffered(self.options.load_workers.max(1));

        while let Some((source, page_numbers, loaded)) = loads.next().await {
            let loaded = match loaded {
                Ok(loaded) => loaded,
                Err(err) => {
                    warn!(file = source.name(), error = %err, "skipping source file");
                    failures.push(FileFailure::new(source.name(), err));
                    continue;
                }
            };
            debug!(file = source.name(), pages = page_numbers.len(), "importing pages");

            let ids = assembler.import_pages(loaded.document, &page_numbers);
            if !ids.is_empty() {
                files_used += 1;
            }
            for (page_number, object_id) in ids {
                imported.insert(PageId::new(source.id(), page_number - 1), object_id);
            }
        }

        for page in snapshot {
            if let Some(object_id) = imported.get(&page.id()) {
                assembler.push_page(*object_id);
            }
        }

        let page_count = assembler.page_count();
        if page_count == 0 {
            return Err(PdfShuffleError::NothingToExport { failures });
        }

        let document = assembler.finish(&producer());
        let bytes = self
            .writer
            .serialize(document, self.options.compression)
            .await?;
        let file_name = download_file_name(&self.options.file_prefix, Utc::now());

        info!(
            file = %file_name,
            pages = page_count,
            requested = snapshot.len(),
            failed_files = failures.len(),
            "export assembled"
        );

        Ok(ExportOutcome {
            file_name,
            bytes,
            page_count,
            requested_pages: snapshot.len(),
            files_used,
            failures,
            elapsed: start.elapsed(),
        })
    }
}

/// Page numbers per source, in order of first appearance.
fn group_by_source(collection: &PageCollection) -> Vec<(Arc<SourceFile>, Vec<u32>)> {
    let mut order: Vec<SourceId> = Vec::new();
    let mut groups: HashMap<SourceId, (Arc<SourceFile>, Vec<u32>)> = HashMap::new();

    for page in collection {
        let source = page.source();
        groups
            .entry(source.id())
            .or_insert_with(|| {
                order.push(source.id());
                (Arc::clone(source), Vec::new())
            })
            .1
            .push(page.page_number());
    }

    order
        .into_iter()
        .filter_map(|id| groups.remove(&id))
        .collect()
}

/// Download name for an export finished at `at`: `<prefix>_<YYYYMMDDHHMMSS>.pdf`.
pub fn download_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}_{}.pdf", at.format("%Y%m%d%H%M%S"))
}

fn producer() -> String {
    format!("{} {}", crate::NAME, crate::VERSION)
}
