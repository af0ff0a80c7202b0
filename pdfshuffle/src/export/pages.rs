//! Page copying between documents.
//!
//! [`DocumentAssembler`] builds the output document one source at a time.
//! Each source is renumbered past the objects already in the output, so
//! object ids never collide, and only the requested pages plus whatever they
//! reference are copied.

use lopdf::{Dictionary, Document, Object, ObjectId, dictionary};
use std::collections::BTreeMap;
use tracing::warn;

use crate::utils::copy_references;

/// Page attributes a page may inherit from its ancestors in the page tree.
pub const INHERITED_ATTRIBUTES: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// US Letter, used when neither a page nor its ancestors carry a `MediaBox`.
const DEFAULT_MEDIA_BOX: [i64; 4] = [0, 0, 612, 792];

/// Limit on page tree depth while resolving inherited attributes.
const MAX_TREE_DEPTH: usize = 64;

/// Builds the merged output document.
#[derive(Debug)]
pub struct DocumentAssembler {
    document: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl DocumentAssembler {
    /// Start an empty output document.
    pub fn new() -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        document.objects.insert(
            pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => Vec::<Object>::new(),
                "Count" => 0,
            }
            .into(),
        );

        Self {
            document,
            pages_id,
            kids: Vec::new(),
        }
    }

    /// Copy pages `page_numbers` (1-based) out of `source`.
    ///
    /// Returns the output object id of every page that was found, keyed by
    /// page number. Copied pages are not yet part of the page tree; add them
    /// with [`push_page`](Self::push_page) in the order they should appear.
    pub fn import_pages(
        &mut self,
        mut source: Document,
        page_numbers: &[u32],
    ) -> BTreeMap<u32, ObjectId> {
        source.renumber_objects_with(self.document.max_id + 1);
        let source_pages = source.get_pages();
        let mut imported = BTreeMap::new();

        for &page_number in page_numbers {
            if imported.contains_key(&page_number) {
                continue;
            }

            let Some(&page_id) = source_pages.get(&page_number) else {
                warn!(page = page_number, "page no longer present in source");
                continue;
            };

            let Ok(page) = source.get_dictionary(page_id) else {
                warn!(page = page_number, "page object is not a dictionary");
                continue;
            };

            let page = self.prepare_page(&source, page);
            self.document
                .objects
                .insert(page_id, Object::Dictionary(page.clone()));
            copy_references(&mut self.document, &source, &Object::Dictionary(page));

            imported.insert(page_number, page_id);
        }

        self.document.max_id = self.document.max_id.max(source.max_id);
        imported
    }

    /// Append an imported page to the end of the page tree.
    pub fn push_page(&mut self, page_id: ObjectId) {
        self.kids.push(Object::Reference(page_id));
    }

    /// Number of pages in the page tree so far.
    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Close the page tree and add catalog and document information.
    pub fn finish(mut self, producer: &str) -> Document {
        let count = self.kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }
            .into(),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        let created = chrono::Utc::now().format("D:%Y%m%d%H%M%SZ").to_string();
        let info_id = self.document.add_object(dictionary! {
            "Producer" => Object::string_literal(producer),
            "CreationDate" => Object::string_literal(created),
        });

        self.document.trailer.set("Root", catalog_id);
        self.document.trailer.set("Info", info_id);
        self.document
    }

    /// Clone a page with its inherited attributes made explicit and its
    /// parent pointed at the output page tree.
    fn prepare_page(&self, source: &Document, page: &Dictionary) -> Dictionary {
        let mut prepared = page.clone();

        for key in INHERITED_ATTRIBUTES {
            if prepared.has(key) {
                continue;
            }
            if let Some(value) = inherited_attribute(source, page, key) {
                prepared.set(key, value);
            }
        }

        if !prepared.has(b"MediaBox") {
            let media_box: Vec<Object> = DEFAULT_MEDIA_BOX
                .iter()
                .map(|v| Object::Integer(*v))
                .collect();
            prepared.set("MediaBox", media_box);
        }

        prepared.set("Parent", self.pages_id);
        prepared
    }
}

impl Default for DocumentAssembler {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up `key` on the ancestors of `page`, nearest first.
pub fn inherited_attribute(source: &Document, page: &Dictionary, key: &[u8]) -> Option<Object> {
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let node = source.get_dictionary(parent?).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    None
}
