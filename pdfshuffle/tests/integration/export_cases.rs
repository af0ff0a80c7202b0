//! Export preconditions and partial failures.

use pdfshuffle::collection::InputFile;
use pdfshuffle::{Exporter, Ingestor, PdfShuffleError, Session};
use tempfile::TempDir;

use crate::common::{ingestor, markers, pdf_bytes, pdf_mentioning_encrypt_bytes, write_fixture};

#[tokio::test]
async fn test_empty_collection_creates_no_download() {
    let out = TempDir::new().unwrap();
    let session = Session::new();

    let err = Exporter::new()
        .export_to(&session, out.path())
        .await
        .unwrap_err();

    assert!(matches!(err, PdfShuffleError::EmptyCollectionExport));
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn test_deleting_every_page_leaves_nothing_to_export() {
    let mut session = Session::new();
    ingestor()
        .ingest(
            &mut session,
            vec![InputFile::from_bytes("a.pdf", pdf_bytes("A", 2))],
        )
        .await;
    session.delete_page(1).unwrap();
    session.delete_page(0).unwrap();

    assert!(!session.can_export());
    let err = Exporter::new().export(&session).await.unwrap_err();
    assert!(matches!(err, PdfShuffleError::EmptyCollectionExport));
}

#[tokio::test]
async fn test_source_changed_after_ingestion_is_skipped() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", &pdf_bytes("A", 2));
    let b = write_fixture(dir.path(), "b.pdf", &pdf_bytes("B", 1));

    let mut session = Session::new();
    ingestor()
        .ingest(
            &mut session,
            vec![
                InputFile::from_path(&a).unwrap(),
                InputFile::from_path(&b).unwrap(),
            ],
        )
        .await;
    session.move_page(2, 0).unwrap();

    std::fs::write(&a, b"no longer a pdf").unwrap();

    let outcome = Exporter::new().export(&session).await.unwrap();

    assert_eq!(markers(&outcome.bytes), ["B1"]);
    assert_eq!(outcome.requested_pages, 3);
    assert_eq!(outcome.skipped_pages(), 2);
    assert_eq!(outcome.failures.len(), 1);
    assert_eq!(outcome.failures[0].file_name, "a.pdf");
}

#[tokio::test]
async fn test_every_source_failing_is_fatal() {
    let dir = TempDir::new().unwrap();
    let a = write_fixture(dir.path(), "a.pdf", &pdf_bytes("A", 1));

    let mut session = Session::new();
    ingestor()
        .ingest(&mut session, vec![InputFile::from_path(&a).unwrap()])
        .await;
    std::fs::remove_file(&a).unwrap();

    let out = TempDir::new().unwrap();
    let err = Exporter::new()
        .export_to(&session, out.path())
        .await
        .unwrap_err();

    match err {
        PdfShuffleError::NothingToExport { ref failures } => {
            assert_eq!(failures.len(), 1);
            assert!(matches!(
                failures[0].error,
                PdfShuffleError::FileNotFound { .. }
            ));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(err.is_fatal());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_download_directory() {
    let session = {
        let mut session = Session::new();
        ingestor()
            .ingest(
                &mut session,
                vec![InputFile::from_bytes("a.pdf", pdf_bytes("A", 1))],
            )
            .await;
        session
    };

    let err = Exporter::new()
        .export_to(&session, std::path::Path::new("/nonexistent/downloads"))
        .await
        .unwrap_err();

    assert!(matches!(err, PdfShuffleError::FailedToWrite { .. }));
    assert!(!session.is_exporting());
}

#[tokio::test]
async fn test_encrypt_text_in_page_content_is_exported() {
    let mut session = Session::new();
    let report = Ingestor::new()
        .ingest(
            &mut session,
            vec![
                InputFile::from_bytes("notes.pdf", pdf_mentioning_encrypt_bytes("N", 1)),
                InputFile::from_bytes("plain.pdf", pdf_bytes("P", 1)),
            ],
        )
        .await;
    assert!(report.failures.is_empty());

    let outcome = Exporter::new().export(&session).await.unwrap();

    assert_eq!(markers(&outcome.bytes), ["N1", "P1"]);
    assert!(outcome.failures.is_empty());
}
