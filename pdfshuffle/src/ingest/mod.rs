//! Turning input files into page descriptors.
//!
//! Files are processed one at a time in the order given. Each file is read,
//! opened with the configured [`PdfRenderer`] and rendered page by page on a
//! blocking worker. A file that cannot be read or rendered is reported as a
//! [`FileFailure`] and contributes no pages; the batch carries on with the
//! next file. Pages from the whole batch are appended to the session once the
//! batch is done.

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task;
use tracing::{debug, info, warn};

use crate::collection::{InputFile, PageDescriptor, Session, SourceContent, SourceFile};
use crate::config::IngestOptions;
use crate::error::{FileFailure, PdfShuffleError, Result};
use crate::render::{HayroRenderer, PdfRenderer, RenderError, RenderedPage, render_pages};

/// Summary of one ingestion batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Files that contributed pages.
    pub files_loaded: usize,
    /// Pages appended to the collection.
    pub pages_added: usize,
    /// Files that were skipped, with the reason.
    pub failures: Vec<FileFailure>,
    /// Time taken by the batch.
    pub elapsed: Duration,
}

impl IngestReport {
    /// Whether every file in the batch was ingested.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Ingests files into a session.
#[derive(Clone)]
pub struct Ingestor {
    renderer: Arc<dyn PdfRenderer>,
    options: IngestOptions,
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Ingestor {
    fn default() -> Self {
        Self::new()
    }
}

impl Ingestor {
    /// Create an ingestor rendering with [`HayroRenderer`].
    pub fn new() -> Self {
        Self::with_renderer(Arc::new(HayroRenderer::new()))
    }

    /// Create an ingestor with a custom renderer.
    pub fn with_renderer(renderer: Arc<dyn PdfRenderer>) -> Self {
        Self {
            renderer,
            options: IngestOptions::default(),
        }
    }

    /// Replace the ingestion options.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::InvalidConfig`] if the thumbnail scale is
    /// not a positive number.
    pub fn with_options(mut self, options: IngestOptions) -> Result<Self> {
        options.validate()?;
        self.options = options;
        Ok(self)
    }

    /// Ingestion options in use.
    pub fn options(&self) -> &IngestOptions {
        &self.options
    }

    /// Ingest `inputs` and append their pages to the session.
    ///
    /// The session's loading flag is raised for the duration of a non-empty
    /// batch and cleared on every path.
    pub async fn ingest(&self, session: &mut Session, inputs: Vec<InputFile>) -> IngestReport {
        if inputs.is_empty() {
            return IngestReport::default();
        }

        let _loading = session.begin_loading();
        let start = Instant::now();
        let mut report = IngestReport::default();
        let mut batch: Vec<PageDescriptor> = Vec::new();

        for input in inputs {
            let file_name = input.name.clone();
            let source = Arc::new(SourceFile::new(session.allocate_source_id(), input));

            match self.render_source(&source).await {
                Ok(pages) => {
                    debug!(file = %file_name, pages = pages.len(), "rendered source");
                    report.files_loaded += 1;
                    batch.extend(pages.into_iter().zip(1u32..).map(|(page, number)| {
                        PageDescriptor::new(
                            Arc::clone(&source),
                            number,
                            page.thumbnail,
                            page.width,
                            page.height,
                        )
                    }));
                }
                Err(err) => {
                    warn!(file = %file_name, error = %err, "failed to load file");
                    report.failures.push(FileFailure::new(file_name, err));
                }
            }
        }

        report.pages_added = batch.len();
        session.append(batch);
        report.elapsed = start.elapsed();

        info!(
            files = report.files_loaded,
            pages = report.pages_added,
            failed = report.failures.len(),
            "ingestion finished"
        );

        report
    }

    async fn render_source(&self, source: &SourceFile) -> Result<Vec<RenderedPage>> {
        let name = source.name().to_string();
        let bytes = source.content().read().await.map_err(|err| match source.content() {
            SourceContent::Path(path) if err.kind() == std::io::ErrorKind::NotFound => {
                PdfShuffleError::file_not_found(path.clone())
            }
            _ => PdfShuffleError::decode_failure(&name, err.to_string()),
        })?;

        let renderer = Arc::clone(&self.renderer);
        let scale = self.options.thumbnail_scale;

        task::spawn_blocking(move || render_pages(renderer.as_ref(), bytes, scale))
            .await
            .map_err(|e| PdfShuffleError::other(format!("Render task failed: {e}")))?
            .map_err(|err| match err {
                RenderError::PasswordRequired => PdfShuffleError::password_protected(&name),
                other => PdfShuffleError::decode_failure(&name, other.to_string()),
            })
    }
}
