//! Ingestion of real files, including broken and protected ones.

use pdfshuffle::collection::InputFile;
use pdfshuffle::config::IngestOptions;
use pdfshuffle::{Exporter, Ingestor, PdfShuffleError, Session};
use tempfile::TempDir;

use crate::common::{encrypted_pdf_bytes, ingestor, labels, markers, pdf_bytes, write_fixture};

#[tokio::test]
async fn test_mixed_batch_keeps_good_files() {
    let dir = TempDir::new().unwrap();
    let good = write_fixture(dir.path(), "good.pdf", &pdf_bytes("G", 2));
    let broken = write_fixture(dir.path(), "broken.pdf", b"%PDF-1.5\nthis is not a pdf body");
    let locked = write_fixture(dir.path(), "locked.pdf", &encrypted_pdf_bytes("L", 1));
    let other = write_fixture(dir.path(), "other.pdf", &pdf_bytes("O", 1));

    let inputs = [&good, &broken, &locked, &other]
        .into_iter()
        .map(|p| InputFile::from_path(p).unwrap())
        .collect();

    let mut session = Session::new();
    let report = ingestor().ingest(&mut session, inputs).await;

    assert_eq!(report.files_loaded, 2);
    assert_eq!(report.pages_added, 3);
    assert_eq!(labels(&session), ["good.pdf:1", "good.pdf:2", "other.pdf:1"]);

    let failed: Vec<_> = report.failures.iter().map(|f| f.file_name.as_str()).collect();
    assert_eq!(failed, ["broken.pdf", "locked.pdf"]);
    assert!(!report.failures[0].error.is_password_protected());
    assert!(report.failures[1].error.is_password_protected());
    assert!(!session.is_loading());
}

#[tokio::test]
async fn test_file_removed_before_ingestion_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_fixture(dir.path(), "gone.pdf", &pdf_bytes("X", 1));
    let input = InputFile::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let mut session = Session::new();
    let report = ingestor().ingest(&mut session, vec![input]).await;

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        report.failures[0].error,
        PdfShuffleError::FileNotFound { .. }
    ));
    assert!(session.collection().is_empty());
}

#[test]
fn test_missing_path_is_rejected_up_front() {
    let err = InputFile::from_path("/nonexistent/input.pdf").unwrap_err();
    assert!(matches!(err, PdfShuffleError::FileNotFound { .. }));
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_in_memory_inputs_are_ingested() {
    let mut session = Session::new();
    let report = ingestor()
        .ingest(
            &mut session,
            vec![InputFile::from_bytes("upload.pdf", pdf_bytes("U", 3))],
        )
        .await;

    assert_eq!(report.pages_added, 3);
    let page = session.collection().get(2).unwrap();
    assert_eq!(page.label(), "upload.pdf - Page 3");
    assert_eq!((page.width(), page.height()), (612.0, 792.0));
}

#[tokio::test]
async fn test_default_renderer_ingests_and_exports() {
    let dir = TempDir::new().unwrap();
    let plain = write_fixture(dir.path(), "plain.pdf", &pdf_bytes("P", 2));
    let locked = write_fixture(dir.path(), "locked.pdf", &encrypted_pdf_bytes("L", 1));
    let inputs = [&plain, &locked]
        .into_iter()
        .map(|p| InputFile::from_path(p).unwrap())
        .collect();

    let ingestor = Ingestor::new()
        .with_options(IngestOptions {
            thumbnail_scale: 0.25,
        })
        .unwrap();
    let mut session = Session::new();
    let report = ingestor.ingest(&mut session, inputs).await;

    assert_eq!(report.files_loaded, 1);
    assert_eq!(labels(&session), ["plain.pdf:1", "plain.pdf:2"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].error.is_password_protected());

    let page = session.collection().get(0).unwrap();
    assert_eq!((page.width(), page.height()), (612.0, 792.0));
    let thumbnail = page.thumbnail();
    assert_eq!((thumbnail.width(), thumbnail.height()), (153, 198));

    session.move_page(1, 0).unwrap();
    let outcome = Exporter::new().export(&session).await.unwrap();
    assert_eq!(markers(&outcome.bytes), ["P2", "P1"]);
}
