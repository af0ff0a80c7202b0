//! Output formatting and display for pdfshuffle.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Per-file failure notices
//! - Ingestion and export summaries
//! - Listings of the current arrangement
//!
//! # Examples
//!
//! ```no_run
//! use pdfshuffle::output::OutputFormatter;
//! use pdfshuffle::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Loading files");
//! formatter.success("Export written");
//! # }
//! ```

pub mod formatter;

pub use formatter::{MessageLevel, OutputFormatter};

use std::path::Path;

use crate::collection::{PageCollection, PageDescriptor};
use crate::error::{FileFailure, Result};
use crate::export::ExportOutcome;
use crate::ingest::IngestReport;
use crate::io::WriteStatistics;
use crate::utils::format_file_size;

/// Warn about every file that was skipped.
pub fn display_failures(formatter: &OutputFormatter, failures: &[FileFailure]) {
    for failure in failures {
        formatter.warning(&format!("Skipped {}: {}", failure.file_name, failure.error));
    }
}

/// Display the outcome of an ingestion batch.
pub fn display_ingest_report(formatter: &OutputFormatter, report: &IngestReport) {
    display_failures(formatter, &report.failures);

    formatter.info(&format!(
        "Loaded {} file(s) in {:.2}s: {} page(s)",
        report.files_loaded,
        report.elapsed.as_secs_f64(),
        report.pages_added
    ));
}

/// Display the outcome of an export.
pub fn display_export_outcome(formatter: &OutputFormatter, outcome: &ExportOutcome) {
    display_failures(formatter, &outcome.failures);

    if outcome.skipped_pages() > 0 {
        formatter.warning(&format!(
            "{} of {} page(s) could not be exported",
            outcome.skipped_pages(),
            outcome.requested_pages
        ));
    }

    formatter.detail("Pages", &outcome.page_count.to_string());
    formatter.detail("Source files", &outcome.files_used.to_string());
    formatter.detail("Size", &format_file_size(outcome.bytes.len() as u64));
    formatter.detail(
        "Export time",
        &format!("{:.2}s", outcome.elapsed.as_secs_f64()),
    );
}

/// Display where a download was written.
pub fn display_download(
    formatter: &OutputFormatter,
    outcome: &ExportOutcome,
    write: &WriteStatistics,
) {
    formatter.success(&format!(
        "Created {} ({} page(s), {})",
        write.output_path.display(),
        outcome.page_count,
        write.format_file_size()
    ));
}

/// Print the arrangement as a numbered list.
pub fn display_collection(formatter: &OutputFormatter, collection: &PageCollection) {
    if collection.is_empty() {
        formatter.info("No pages");
        return;
    }

    for (index, page) in collection.iter().enumerate() {
        formatter.list_item(index, &page.label());
        formatter.detail("id", &page.key());
    }
}

/// Serialize the arrangement as pretty JSON.
pub fn collection_json(collection: &PageCollection) -> Result<String> {
    serde_json::to_string_pretty(&collection.summaries())
        .map_err(|e| crate::PdfShuffleError::other(format!("Failed to encode listing: {e}")))
}

/// File name of a page preview: position in the arrangement, source stem and
/// page number, e.g. `003_report_p2.png`.
pub fn thumbnail_file_name(position: usize, page: &PageDescriptor) -> String {
    let stem = Path::new(page.file_name())
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| page.file_name().to_string());

    format!("{:03}_{stem}_p{}.png", position + 1, page.page_number())
}
