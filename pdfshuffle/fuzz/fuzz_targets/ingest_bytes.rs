#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfshuffle::collection::InputFile;
use pdfshuffle::io::reader::decode_document;
use pdfshuffle::{Ingestor, Session};
use std::sync::OnceLock;
use tokio::runtime::{Builder, Runtime};

static RUNTIME: OnceLock<Runtime> = OnceLock::new();

fn runtime() -> &'static Runtime {
    RUNTIME.get_or_init(|| Builder::new_multi_thread().enable_all().build().unwrap())
}

fuzz_target!(|data: &[u8]| {
    // Decoding must classify, never panic
    let decoded = decode_document("fuzz.pdf", data, true);

    let mut session = Session::new();
    let inputs = vec![InputFile::from_bytes("fuzz.pdf", data.to_vec())];
    let report = runtime().block_on(Ingestor::new().ingest(&mut session, inputs));

    assert_eq!(report.files_loaded + report.failures.len(), 1);
    assert_eq!(report.pages_added, session.collection().len());
    assert!(!session.is_loading());

    if decoded.is_err() && report.failures.is_empty() {
        // hayro accepted bytes lopdf could not read; export must still not panic
        let _ = runtime().block_on(pdfshuffle::Exporter::new().export(&session));
    }
});
