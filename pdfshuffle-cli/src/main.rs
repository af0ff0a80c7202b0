//! pdfshuffle - Reorder, merge and delete pages across PDF files.
//!
//! Loads the given PDFs into one page list, applies the requested edits and
//! writes the arrangement as a new merged PDF.

mod cli;

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use pdfshuffle::collection::InputFile;
use pdfshuffle::config::Config;
use pdfshuffle::error::{FileFailure, PdfShuffleError};
use pdfshuffle::io::PdfWriter;
use pdfshuffle::output::{
    OutputFormatter, collection_json, display_collection, display_download,
    display_export_outcome, display_failures, display_ingest_report, thumbnail_file_name,
};
use pdfshuffle::{Exporter, Ingestor, Session};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err}");
        process::exit(err.exit_code());
    }
}

/// Log to stderr. `RUST_LOG` overrides the level picked from the flags.
fn init_tracing(verbose: bool, quiet: bool) {
    let default_directive = if verbose {
        "pdfshuffle=debug"
    } else if quiet {
        "pdfshuffle=error"
    } else {
        "pdfshuffle=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directive.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}

/// Main application logic.
async fn run(cli: Cli) -> Result<(), PdfShuffleError> {
    cli.validate()?;

    let all_inputs = cli.get_all_inputs().await?;
    let config = cli.to_config(all_inputs)?;

    // JSON listings own stdout
    let formatter = if config.list && config.json {
        OutputFormatter::quiet()
    } else {
        OutputFormatter::from_config(&config)
    };

    if formatter.should_print() {
        formatter.section(&format!("{} v{}", pdfshuffle::NAME, pdfshuffle::VERSION));
        formatter.blank_line();
    }

    formatter.debug(&config_summary(&config));

    let (inputs, missing) = resolve_inputs(&config.inputs);
    display_failures(&formatter, &missing);

    formatter.info("Loading files...");
    let ingestor = Ingestor::new().with_options(config.ingest_options())?;
    let mut session = Session::new();
    let report = ingestor.ingest(&mut session, inputs).await;
    display_ingest_report(&formatter, &report);

    session.apply_edits(&config.edits)?;
    if !config.edits.is_empty() {
        formatter.debug(&format!(
            "Applied {} edit(s), {} page(s) remain",
            config.edits.len(),
            session.collection().len()
        ));
    }

    if config.list {
        if config.json {
            println!("{}", collection_json(session.collection())?);
        } else {
            formatter.blank_line();
            display_collection(&formatter, session.collection());
        }
    }

    if let Some(dir) = &config.thumbnails_dir {
        write_thumbnails(&session, dir, &formatter).await?;
    }

    if config.dry_run {
        formatter.blank_line();
        formatter.success("Dry run completed successfully");
        formatter.info(&format!(
            "  Export would contain {} page(s)",
            session.collection().len()
        ));
        formatter.info("  Run without --dry-run to create the merged PDF");
        return Ok(());
    }

    formatter.blank_line();
    formatter.info("Exporting pages...");

    let exporter = Exporter::with_options(config.export_options());
    let saved = exporter.export_to(&session, &config.output_dir).await?;

    display_export_outcome(&formatter, &saved.outcome);
    formatter.blank_line();
    display_download(&formatter, &saved.outcome, &saved.write);

    Ok(())
}

/// Split paths into ingestable inputs and failures for paths that do not
/// exist.
fn resolve_inputs(paths: &[PathBuf]) -> (Vec<InputFile>, Vec<FileFailure>) {
    let mut inputs = Vec::with_capacity(paths.len());
    let mut missing = Vec::new();

    for path in paths {
        match InputFile::from_path(path) {
            Ok(input) => inputs.push(input),
            Err(err) => missing.push(FileFailure::new(path.display().to_string(), err)),
        }
    }

    (inputs, missing)
}

/// Write the preview of every arranged page into `dir`.
async fn write_thumbnails(
    session: &Session,
    dir: &std::path::Path,
    formatter: &OutputFormatter,
) -> Result<(), PdfShuffleError> {
    let previews = session
        .collection()
        .iter()
        .enumerate()
        .map(|(position, page)| {
            (
                thumbnail_file_name(position, page),
                page.thumbnail().png().to_vec(),
            )
        });

    let written = PdfWriter::new().save_thumbnails(dir, previews).await?;
    formatter.info(&format!(
        "Wrote {} preview(s) to {}",
        written.len(),
        dir.display()
    ));

    Ok(())
}

/// One-line description of a run, shown in verbose mode.
fn config_summary(config: &Config) -> String {
    format!(
        "{} input(s), {} edit(s), compression {}",
        config.inputs.len(),
        config.edits.len(),
        config.compression
    )
}
