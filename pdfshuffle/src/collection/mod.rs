//! The page collection model.
//!
//! A [`PageCollection`] is an ordered list of [`PageDescriptor`]s drawn from
//! any number of source files. Its order is what the user sees and what the
//! export reproduces. Collections are values: arranging one returns a new
//! collection and leaves the input untouched.
//!
//! # Examples
//!
//! ```no_run
//! # use pdfshuffle::collection::PageCollection;
//! # fn example(pages: PageCollection) -> pdfshuffle::Result<()> {
//! let last = pages.len() - 1;
//! let arranged = pages.moved(last, 0)?.removed(2)?;
//! assert_eq!(arranged.len(), pages.len() - 1);
//! # Ok(())
//! # }
//! ```

mod session;
mod source;

pub use session::{ActivityGuard, ActivityMonitor, Session};
pub use source::{InputFile, SourceContent, SourceFile, SourceId};

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use crate::error::{PdfShuffleError, Result};
use crate::render::Thumbnail;

/// Identity of a page: its source token and zero-based index in that source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId {
    source: SourceId,
    index: u32,
}

impl PageId {
    /// Build an id from a source token and zero-based page index.
    pub fn new(source: SourceId, index: u32) -> Self {
        Self { source, index }
    }

    /// The owning source token.
    pub fn source(&self) -> SourceId {
        self.source
    }

    /// Zero-based page index within the source.
    pub fn index(&self) -> u32 {
        self.index
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.index)
    }
}

/// One page available for arrangement and export.
///
/// Descriptors are immutable; clones share the source handle and thumbnail.
#[derive(Debug, Clone, PartialEq)]
pub struct PageDescriptor {
    id: PageId,
    page_number: u32,
    source: Arc<SourceFile>,
    thumbnail: Arc<Thumbnail>,
    width: f32,
    height: f32,
}

impl PageDescriptor {
    /// Describe page `page_number` (1-based) of `source`.
    ///
    /// # Panics
    ///
    /// Panics if `page_number` is zero.
    pub fn new(
        source: Arc<SourceFile>,
        page_number: u32,
        thumbnail: Thumbnail,
        width: f32,
        height: f32,
    ) -> Self {
        assert!(page_number >= 1, "page numbers are 1-based");
        Self {
            id: PageId::new(source.id(), page_number - 1),
            page_number,
            source,
            thumbnail: Arc::new(thumbnail),
            width,
            height,
        }
    }

    /// Unique id of this page within the session.
    pub fn id(&self) -> PageId {
        self.id
    }

    /// 1-based page number within the source file.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Display name of the source file.
    pub fn file_name(&self) -> &str {
        self.source.name()
    }

    /// The source file handle.
    pub fn source(&self) -> &Arc<SourceFile> {
        &self.source
    }

    /// Preview rendered at ingestion.
    pub fn thumbnail(&self) -> &Thumbnail {
        &self.thumbnail
    }

    /// Width at scale 1.0.
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height at scale 1.0.
    pub fn height(&self) -> f32 {
        self.height
    }

    /// Stable key combining file name, page index and source token, e.g.
    /// `report.pdf-2#7`.
    pub fn key(&self) -> String {
        format!("{}-{}#{}", self.file_name(), self.id.index, self.id.source)
    }

    /// Human-readable label, e.g. `report.pdf - Page 3`.
    pub fn label(&self) -> String {
        format!("{} - Page {}", self.file_name(), self.page_number)
    }

    /// Serializable view of this descriptor.
    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.key(),
            file_name: self.file_name().to_string(),
            page_number: self.page_number,
            width: self.width,
            height: self.height,
        }
    }
}

/// Serializable description of a page, without thumbnail or content.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSummary {
    /// Page key, see [`PageDescriptor::key`].
    pub id: String,
    /// Source file name.
    pub file_name: String,
    /// 1-based page number in the source.
    pub page_number: u32,
    /// Width at scale 1.0.
    pub width: f32,
    /// Height at scale 1.0.
    pub height: f32,
}

/// Ordered sequence of pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageCollection {
    pages: Vec<PageDescriptor>,
}

impl PageCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pages.
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the collection has no pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Page at `index`.
    pub fn get(&self, index: usize) -> Option<&PageDescriptor> {
        self.pages.get(index)
    }

    /// Position of the page with `id`.
    pub fn position(&self, id: PageId) -> Option<usize> {
        self.pages.iter().position(|page| page.id == id)
    }

    /// Iterate in order.
    pub fn iter(&self) -> std::slice::Iter<'_, PageDescriptor> {
        self.pages.iter()
    }

    /// Pages as a slice.
    pub fn as_slice(&self) -> &[PageDescriptor] {
        &self.pages
    }

    /// Serializable view of every page, in order.
    pub fn summaries(&self) -> Vec<PageSummary> {
        self.pages.iter().map(PageDescriptor::summary).collect()
    }

    /// A new collection with `batch` appended at the end.
    pub fn appended<I>(&self, batch: I) -> Self
    where
        I: IntoIterator<Item = PageDescriptor>,
    {
        let mut pages = self.pages.clone();
        pages.extend(batch);
        Self { pages }
    }

    /// A new collection with the page at `from` taken out and reinserted at
    /// `to` in the shortened sequence.
    ///
    /// This is a single splice, not a swap. `moved(i, i)` returns an equal
    /// collection.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::InvalidIndex`] if either index is not in
    /// `[0, len)`.
    pub fn moved(&self, from: usize, to: usize) -> Result<Self> {
        self.check_index(from)?;
        self.check_index(to)?;

        let mut pages = self.pages.clone();
        let page = pages.remove(from);
        pages.insert(to, page);
        Ok(Self { pages })
    }

    /// A new collection without the page at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`PdfShuffleError::InvalidIndex`] if `index` is not in
    /// `[0, len)`.
    pub fn removed(&self, index: usize) -> Result<Self> {
        self.check_index(index)?;

        let mut pages = self.pages.clone();
        pages.remove(index);
        Ok(Self { pages })
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.pages.len() {
            return Err(PdfShuffleError::InvalidIndex {
                index,
                len: self.pages.len(),
            });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a PageCollection {
    type Item = &'a PageDescriptor;
    type IntoIter = std::slice::Iter<'a, PageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.pages.iter()
    }
}

impl FromIterator<PageDescriptor> for PageCollection {
    fn from_iter<T: IntoIterator<Item = PageDescriptor>>(iter: T) -> Self {
        Self {
            pages: iter.into_iter().collect(),
        }
    }
}
