//! Shared helpers for the integration tests.
//!
//! Fixtures are generated with `lopdf` instead of being checked in. Every
//! page's content stream starts with a `% <label><n>` comment so a page can be
//! recognised after it went through export.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use lopdf::{Document, Object, Stream, dictionary};
use pdfshuffle::PdfShuffleError;
use pdfshuffle::io::reader::decode_document;
use pdfshuffle::render::{PdfRenderer, RenderDocument, RenderError, RgbaFrame};

const PLAIN_BODY: &str = "0 0 m 10 10 l S";

fn build(label: &str, pages: u32) -> Document {
    build_with_body(label, pages, PLAIN_BODY)
}

fn build_with_body(label: &str, pages: u32, body: &str) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => "Helvetica",
            },
        },
    });

    let kids: Vec<Object> = (1..=pages)
        .map(|n| {
            let content = format!("% {label}{n}\n{body}\n").into_bytes();
            let content_id = doc.add_object(Stream::new(dictionary! {}, content));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => pages as i64,
        }
        .into(),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn to_bytes(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// A PDF whose pages are marked `<label>1`, `<label>2`, ...
pub fn pdf_bytes(label: &str, pages: u32) -> Vec<u8> {
    to_bytes(build(label, pages))
}

/// An unencrypted PDF whose page text mentions `/Encrypt`.
pub fn pdf_mentioning_encrypt_bytes(label: &str, pages: u32) -> Vec<u8> {
    to_bytes(build_with_body(
        label,
        pages,
        "BT /F1 12 Tf 72 720 Td (See the /Encrypt entry) Tj ET",
    ))
}

/// A PDF that declares standard-security encryption.
pub fn encrypted_pdf_bytes(label: &str, pages: u32) -> Vec<u8> {
    let mut doc = build(label, pages);
    let encrypt_id = doc.add_object(dictionary! {
        "Filter" => "Standard",
        "V" => 1,
        "R" => 2,
        "O" => Object::string_literal(vec![0x4fu8; 32]),
        "U" => Object::string_literal(vec![0x55u8; 32]),
        "P" => -4,
    });
    doc.trailer.set("Encrypt", encrypt_id);
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(vec![1u8; 16]),
            Object::string_literal(vec![1u8; 16]),
        ],
    );
    to_bytes(doc)
}

/// Write a fixture into `dir` and return its path.
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Page markers of a serialized PDF, in page order.
pub fn markers(bytes: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(bytes).expect("Exported PDF does not parse");
    doc.get_pages()
        .values()
        .map(|page_id| {
            let content = doc.get_page_content(*page_id).unwrap_or_default();
            String::from_utf8_lossy(&content)
                .lines()
                .find_map(|line| line.strip_prefix("% "))
                .unwrap_or_default()
                .trim()
                .to_string()
        })
        .collect()
}

/// Renderer that opens documents with `lopdf` and produces blank 2x2 frames.
///
/// Keeps ingestion tests independent of rasterizer output.
pub struct LopdfRenderer;

struct LopdfDocument {
    pages: usize,
}

impl RenderDocument for LopdfDocument {
    fn page_count(&self) -> usize {
        self.pages
    }

    fn page_dimensions(&self, page: usize) -> Result<(f32, f32), RenderError> {
        if page >= self.pages {
            return Err(RenderError::PageOutOfRange(page));
        }
        Ok((612.0, 792.0))
    }

    fn render_page(&self, page: usize, _scale: f32) -> Result<RgbaFrame, RenderError> {
        if page >= self.pages {
            return Err(RenderError::PageOutOfRange(page));
        }
        Ok(RgbaFrame {
            width: 2,
            height: 2,
            pixels: vec![255u8; 16].into(),
        })
    }
}

impl PdfRenderer for LopdfRenderer {
    fn open(&self, bytes: Arc<Vec<u8>>) -> Result<Box<dyn RenderDocument>, RenderError> {
        match decode_document("fixture", &bytes, false) {
            Ok(doc) => Ok(Box::new(LopdfDocument {
                pages: doc.get_pages().len(),
            })),
            Err(PdfShuffleError::PasswordProtected { .. }) => Err(RenderError::PasswordRequired),
            Err(err) => Err(RenderError::Invalid(err.to_string())),
        }
    }
}

/// An ingestor using [`LopdfRenderer`].
pub fn ingestor() -> pdfshuffle::Ingestor {
    pdfshuffle::Ingestor::with_renderer(Arc::new(LopdfRenderer))
}

/// `<file>:<page>` for every page of the collection.
pub fn labels(session: &pdfshuffle::Session) -> Vec<String> {
    session
        .collection()
        .iter()
        .map(|page| format!("{}:{}", page.file_name(), page.page_number()))
        .collect()
}
