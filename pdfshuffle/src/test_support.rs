//! Fixtures for unit tests.
//!
//! Every generated page carries a `% <label><n>` comment at the start of its
//! content stream so page identity survives a round trip through export.

use lopdf::{Document, Object, ObjectId, Stream, dictionary};
use std::sync::Arc;

use crate::collection::{InputFile, PageCollection, PageDescriptor, SourceFile, SourceId};
use crate::render::{RgbaFrame, Thumbnail};

const PLAIN_BODY: &str = "0 0 m 10 10 l S";

fn page_content(marker: &str, body: &str) -> Vec<u8> {
    format!("% {marker}\n{body}\n").into_bytes()
}

fn build(label: &str, pages: u32, inherited: bool) -> Document {
    build_with_body(label, pages, inherited, PLAIN_BODY)
}

fn build_with_body(label: &str, pages: u32, inherited: bool, body: &str) -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let media_box = vec![0.into(), 0.into(), 612.into(), 792.into()];

    let mut kids = Vec::new();
    for n in 1..=pages {
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            page_content(&format!("{label}{n}"), body),
        ));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        };
        if !inherited {
            page.set("MediaBox", media_box.clone());
            page.set("Resources", resources_id);
        }
        kids.push(Object::Reference(doc.add_object(page)));
    }

    let mut pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => pages as i64,
    };
    if inherited {
        pages_dict.set("MediaBox", media_box);
        pages_dict.set("Resources", resources_id);
        pages_dict.set("Rotate", 90);
    }
    doc.objects.insert(pages_id, pages_dict.into());

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc
}

fn save(mut doc: Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

/// A PDF whose pages are marked `<label>1`, `<label>2`, ...
pub(crate) fn pdf_with_pages(label: &str, pages: u32) -> Vec<u8> {
    save(build(label, pages, false))
}

/// Like [`pdf_with_pages`], but `MediaBox`, `Resources` and `Rotate` live on
/// the page tree node instead of the pages.
pub(crate) fn pdf_with_inherited_attributes(label: &str, pages: u32) -> Vec<u8> {
    save(build(label, pages, true))
}

/// An unencrypted PDF whose page text mentions `/Encrypt`.
pub(crate) fn pdf_mentioning_encrypt(label: &str, pages: u32) -> Vec<u8> {
    save(build_with_body(
        label,
        pages,
        false,
        "BT /F1 12 Tf 72 720 Td (See the /Encrypt entry) Tj ET",
    ))
}

/// A PDF that declares standard-security encryption.
pub(crate) fn encrypted_pdf(label: &str, pages: u32) -> Vec<u8> {
    let mut doc = build(label, pages, false);
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
    save(doc)
}

/// Marker of a page, read from the start of its content stream.
pub(crate) fn page_marker(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    text.lines()
        .find_map(|line| line.strip_prefix("% "))
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Markers of every page, in page order.
pub(crate) fn page_markers(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .values()
        .map(|page_id| page_marker(doc, *page_id))
        .collect()
}

fn blank_thumbnail() -> Thumbnail {
    Thumbnail::encode(&RgbaFrame {
        width: 1,
        height: 1,
        pixels: vec![255u8; 4].into(),
    })
    .unwrap()
}

/// Descriptors for `pages` pages of an in-memory source named `name`.
pub(crate) fn descriptors(token: u64, name: &str, pages: u32) -> Vec<PageDescriptor> {
    descriptors_with_bytes(token, name, Vec::new(), pages)
}

/// Like [`descriptors`], with the source content set to `bytes`.
pub(crate) fn descriptors_with_bytes(
    token: u64,
    name: &str,
    bytes: Vec<u8>,
    pages: u32,
) -> Vec<PageDescriptor> {
    let source = Arc::new(SourceFile::new(
        SourceId::new(token),
        InputFile::from_bytes(name, bytes),
    ));
    (1..=pages)
        .map(|n| PageDescriptor::new(Arc::clone(&source), n, blank_thumbnail(), 612.0, 792.0))
        .collect()
}

/// First letter of the file name plus page number, e.g. `A1`.
pub(crate) fn labels(collection: &PageCollection) -> Vec<String> {
    collection
        .iter()
        .map(|p| format!("{}{}", &p.file_name()[..1], p.page_number()))
        .collect()
}
