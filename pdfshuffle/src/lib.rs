//! pdfshuffle - Reorder, merge and delete pages across PDF files.
//!
//! This library keeps an ordered collection of pages drawn from any number of
//! source PDFs and exports that arrangement as a single new document. It
//! provides:
//!
//! - Ingestion of files into page descriptors with rendered thumbnails
//! - Move and delete operations on the page collection
//! - A drag gesture model for interactive front ends
//! - Export that copies only the arranged pages into a new PDF
//! - Per-file error reporting that never aborts a whole batch
//!
//! # Examples
//!
//! ```no_run
//! use pdfshuffle::{Exporter, Ingestor, Session};
//! use pdfshuffle::collection::InputFile;
//! use std::path::Path;
//!
//! # async fn example() -> pdfshuffle::Result<()> {
//! let mut session = Session::new();
//! let inputs = vec![InputFile::from_path("a.pdf")?, InputFile::from_path("b.pdf")?];
//!
//! let report = Ingestor::new().ingest(&mut session, inputs).await;
//! println!("Loaded {} pages", report.pages_added);
//!
//! let last = session.collection().len() - 1;
//! session.move_page(last, 0)?;
//! session.delete_page(2)?;
//!
//! let saved = Exporter::new().export_to(&session, Path::new(".")).await?;
//! println!("Wrote {}", saved.write.output_path.display());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arrange;
pub mod collection;
pub mod config;
pub mod error;
pub mod export;
pub mod ingest;
pub mod io;
pub mod output;
pub mod render;
pub mod utils;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use arrange::{DragGesture, Edit, HoverBounds, PageMove};
pub use collection::{InputFile, PageCollection, PageDescriptor, PageId, Session};
pub use config::Config;
pub use error::{FileFailure, PdfShuffleError, Result};
pub use export::{ExportOutcome, Exporter, SavedExport};
pub use ingest::{IngestReport, Ingestor};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
