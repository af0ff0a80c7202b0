//! Drag gestures driving moves on an ingested session.

use pdfshuffle::collection::InputFile;
use pdfshuffle::{DragGesture, HoverBounds, Session};

use crate::common::{ingestor, labels, pdf_bytes};

async fn three_pages() -> Session {
    let mut session = Session::new();
    ingestor()
        .ingest(
            &mut session,
            vec![InputFile::from_bytes("doc.pdf", pdf_bytes("D", 3))],
        )
        .await;
    session
}

#[tokio::test]
async fn test_drag_first_page_to_the_end() {
    let mut session = three_pages().await;
    let mut gesture = DragGesture::start(session.collection(), 0).unwrap();
    let dragged = gesture.dragged();

    // Each slot is 100 wide; the pointer crosses the middle of each target.
    for hover_index in 1..3 {
        let left = hover_index as f32 * 100.0;
        let bounds = HoverBounds::new(left, left + 100.0);
        let step = gesture
            .hover(hover_index, bounds, left + 60.0)
            .expect("crossing the middle moves the page");
        session.move_page(step.from, step.to).unwrap();
    }

    assert_eq!(gesture.drop(), 2);
    assert_eq!(labels(&session), ["doc.pdf:2", "doc.pdf:3", "doc.pdf:1"]);
    assert_eq!(session.collection().position(dragged), Some(2));
}

#[tokio::test]
async fn test_hover_before_middle_does_nothing() {
    let session = three_pages().await;
    let mut gesture = DragGesture::start(session.collection(), 0).unwrap();

    let step = gesture.hover(1, HoverBounds::new(100.0, 200.0), 120.0);

    assert!(step.is_none());
    assert_eq!(gesture.index(), 0);
}

#[tokio::test]
async fn test_drag_cannot_start_past_the_end() {
    let session = three_pages().await;
    assert!(DragGesture::start(session.collection(), 3).is_err());
}
