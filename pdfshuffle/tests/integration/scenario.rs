//! End-to-end flow: files on disk, edits, export, download.

use pdfshuffle::collection::InputFile;
use pdfshuffle::config::{CompressionLevel, ExportOptions};
use pdfshuffle::{Edit, Exporter, Session};
use tempfile::TempDir;

use crate::common::{ingestor, labels, markers, pdf_bytes, write_fixture};

async fn session_with_a_and_b(dir: &TempDir) -> Session {
    let a = write_fixture(dir.path(), "fileA.pdf", &pdf_bytes("A", 3));
    let b = write_fixture(dir.path(), "fileB.pdf", &pdf_bytes("B", 2));

    let mut session = Session::new();
    let report = ingestor()
        .ingest(
            &mut session,
            vec![
                InputFile::from_path(&a).unwrap(),
                InputFile::from_path(&b).unwrap(),
            ],
        )
        .await;

    assert!(report.is_complete(), "ingestion failed: {:?}", report.failures);
    session
}

#[tokio::test]
async fn test_move_delete_export_scenario() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_a_and_b(&dir).await;

    assert_eq!(
        labels(&session),
        ["fileA.pdf:1", "fileA.pdf:2", "fileA.pdf:3", "fileB.pdf:1", "fileB.pdf:2"]
    );

    session.move_page(4, 0).unwrap();
    assert_eq!(
        labels(&session),
        ["fileB.pdf:2", "fileA.pdf:1", "fileA.pdf:2", "fileA.pdf:3", "fileB.pdf:1"]
    );

    session.delete_page(2).unwrap();
    assert_eq!(
        labels(&session),
        ["fileB.pdf:2", "fileA.pdf:1", "fileA.pdf:3", "fileB.pdf:1"]
    );

    let out = TempDir::new().unwrap();
    let saved = Exporter::new().export_to(&session, out.path()).await.unwrap();

    assert_eq!(saved.outcome.page_count, 4);
    let written = std::fs::read(&saved.write.output_path).unwrap();
    assert_eq!(markers(&written), ["B2", "A1", "A3", "B1"]);
}

#[tokio::test]
async fn test_parsed_edits_match_direct_calls() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_a_and_b(&dir).await;

    let edits: Vec<Edit> = ["move:4:0", "delete:2"]
        .iter()
        .map(|s| s.parse().unwrap())
        .collect();
    session.apply_edits(&edits).unwrap();

    let outcome = Exporter::new().export(&session).await.unwrap();
    assert_eq!(markers(&outcome.bytes), ["B2", "A1", "A3", "B1"]);
}

#[tokio::test]
async fn test_single_page_files_export_in_collection_order() {
    let dir = TempDir::new().unwrap();
    let inputs = ["P", "Q", "R", "S"]
        .iter()
        .map(|label| {
            let path = write_fixture(dir.path(), &format!("{label}.pdf"), &pdf_bytes(label, 1));
            InputFile::from_path(path).unwrap()
        })
        .collect();

    let mut session = Session::new();
    ingestor().ingest(&mut session, inputs).await;
    session.move_page(0, 3).unwrap();

    let outcome = Exporter::new().export(&session).await.unwrap();
    assert_eq!(markers(&outcome.bytes), ["Q1", "R1", "S1", "P1"]);
    assert_eq!(outcome.files_used, 4);
}

#[tokio::test]
async fn test_every_compression_level_keeps_page_order() {
    let dir = TempDir::new().unwrap();
    let mut session = session_with_a_and_b(&dir).await;
    session.move_page(0, 4).unwrap();

    for compression in [
        CompressionLevel::None,
        CompressionLevel::Standard,
        CompressionLevel::Maximum,
    ] {
        let exporter = Exporter::with_options(ExportOptions {
            compression,
            ..ExportOptions::default()
        });
        let outcome = exporter.export(&session).await.unwrap();
        assert_eq!(
            markers(&outcome.bytes),
            ["A2", "A3", "B1", "B2", "A1"],
            "compression {compression}"
        );
    }
}

#[tokio::test]
async fn test_repeated_exports_get_distinct_downloads() {
    let dir = TempDir::new().unwrap();
    let session = session_with_a_and_b(&dir).await;
    let out = TempDir::new().unwrap();
    let exporter = Exporter::new();

    let first = exporter.export_to(&session, out.path()).await.unwrap();
    let second = exporter.export_to(&session, out.path()).await.unwrap();

    assert_ne!(first.write.output_path, second.write.output_path);
    assert!(first.write.output_path.exists());
    assert!(second.write.output_path.exists());
}
